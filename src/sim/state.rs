//! Game state and core simulation types
//!
//! `GameState` owns everything that changes during a session. Nothing here
//! is shared; the tick function mutates it in a fixed order.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aim::AimSegment;
use super::brick::{BrickGrid, GridLayout};
use super::geometry::Rect;
use crate::consts::*;
use crate::highscores::HighScore;
use crate::settings::ArkanoidSettings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Balls resting on the paddle, waiting for launch input
    Start,
    /// Active gameplay
    Playing,
    /// Run ended (bricks cleared or lives exhausted)
    GameOver,
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Speed restored on every paddle bounce
    pub initial_speed: f32,
    /// False once the ball has passed the paddle line
    pub active: bool,
    /// Resting on the paddle before launch
    pub on_start: bool,
    /// Horizontal offset from the paddle center while resting
    pub start_offset: f32,
}

impl Ball {
    /// A ball resting on the paddle center
    pub fn resting(paddle: &Paddle, radius: f32, initial_speed: f32) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            initial_speed,
            active: true,
            on_start: true,
            start_offset: 0.0,
        };
        ball.update_resting(paddle);
        ball
    }

    /// Keep a resting ball on top of the paddle
    pub fn update_resting(&mut self, paddle: &Paddle) {
        if self.on_start {
            let half = paddle.width * 0.5;
            self.start_offset = self.start_offset.clamp(-half, half);
            self.pos = Vec2::new(
                paddle.center_x() + self.start_offset,
                paddle.pos.y - self.radius,
            );
        }
    }

    /// Launch a resting ball using the paddle bounce rule
    pub fn launch(&mut self, paddle: &Paddle) {
        if !self.on_start {
            return;
        }
        let dist = paddle.center_x() - self.pos.x;
        self.vel = super::aim::bounce_vector(self.initial_speed, paddle.width, dist)
            .normalize_or_zero()
            * self.initial_speed;
        self.on_start = false;
    }

    /// Horizontal collision radius
    #[inline]
    pub fn horizontal_radius(&self, ratio: f32) -> f32 {
        self.radius * ratio
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub basic_height: f32,
    /// World units moved per tick while an input is held
    pub sensitivity: f32,
}

impl Paddle {
    /// Paddle centered near the bottom of the world
    pub fn centered(world_size: Vec2, width: f32, sensitivity: f32) -> Self {
        Self {
            pos: Vec2::new(
                (world_size.x - width) * 0.5,
                world_size.y - PADDLE_BOTTOM_GAP - PADDLE_HEIGHT,
            ),
            width,
            basic_height: PADDLE_HEIGHT,
            sensitivity,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width * 0.5
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.basic_height))
    }

    /// Move by `dir` steps of `sensitivity`, staying inside the world
    pub fn shift(&mut self, dir: f32, world_width: f32) {
        let max_x = (world_width - self.width).max(0.0);
        self.pos.x = (self.pos.x + dir * self.sensitivity).clamp(0.0, max_x);
    }
}

/// Bonus types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    AnotherBall,
    ExtraLife,
    TurnBrickIntoExplosive,
    Jackpot,
}

impl BonusKind {
    pub const ALL: [BonusKind; 4] = [
        BonusKind::AnotherBall,
        BonusKind::ExtraLife,
        BonusKind::TurnBrickIntoExplosive,
        BonusKind::Jackpot,
    ];
}

/// A falling bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub pos: Vec2,
    pub size: Vec2,
    pub falling_speed: f32,
    pub kind: BonusKind,
}

impl Bonus {
    /// Spawn directly below a destroyed brick's footprint
    pub fn from_brick(brick: Rect, falling_speed: f32, kind: BonusKind) -> Self {
        Self {
            pos: Vec2::new(brick.pos.x, brick.pos.y + brick.size.y),
            size: Vec2::new(brick.size.x, brick.size.y * 2.0),
            falling_speed,
            kind,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Score bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoring {
    pub score: u64,
    /// Bricks destroyed since the last paddle bounce
    pub combo: u32,
    pub use_multiplier: bool,
    /// Bricks brought to zero hits this session
    pub destroyed: usize,
}

impl Scoring {
    pub fn new(use_multiplier: bool) -> Self {
        Self {
            use_multiplier,
            ..Default::default()
        }
    }

    #[inline]
    pub fn multiplier(&self) -> u64 {
        if self.use_multiplier {
            self.combo.max(1) as u64
        } else {
            1
        }
    }

    /// Count a destroyed brick and award its score. Returns the points gained.
    pub fn brick_destroyed(&mut self, base: u32) -> u64 {
        self.combo += 1;
        self.destroyed += 1;
        let gained = base as u64 * self.multiplier();
        self.score += gained;
        gained
    }

    /// Add a flat bonus (scaled by the multiplier)
    pub fn add_bonus(&mut self, base: u64) -> u64 {
        let gained = base * self.multiplier();
        self.score += gained;
        gained
    }

    pub fn paddle_hit(&mut self) {
        self.combo = 0;
    }
}

/// A recorded collision point for debug drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugHit {
    /// World position
    pub pos: Vec2,
    /// Unit surface normal
    pub normal: Vec2,
    /// Seconds since the hit
    pub time: f32,
}

/// Capped, expiring list of recent hits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugTrail {
    pub hits: Vec<DebugHit>,
    pub timeout: f32,
}

impl DebugTrail {
    pub fn new(timeout: f32) -> Self {
        Self {
            hits: Vec::new(),
            timeout,
        }
    }

    pub fn push(&mut self, pos: Vec2, normal: Vec2) {
        if self.hits.len() >= MAX_DEBUG_HITS {
            self.hits.remove(0);
        }
        self.hits.push(DebugHit {
            pos,
            normal,
            time: 0.0,
        });
    }

    /// Age every hit and drop the expired ones
    pub fn age(&mut self, elapsed: f32) {
        for hit in &mut self.hits {
            hit.time += elapsed;
        }
        let timeout = self.timeout;
        self.hits.retain(|h| h.time <= timeout);
    }

    pub fn clear(&mut self) {
        self.hits.clear();
    }
}

/// World-to-display transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub world_size: Vec2,
    pub world_to_screen: Vec2,
    /// `world_to_screen.y / world_to_screen.x`
    pub to_horizontal_radius: f32,
}

impl Viewport {
    /// Identity transform (display matches the world)
    pub fn new(world_size: Vec2) -> Self {
        Self {
            world_size,
            world_to_screen: Vec2::ONE,
            to_horizontal_radius: 1.0,
        }
    }

    /// Fit the world to a display. Returns the previous horizontal ratio if it changed.
    pub fn resize(&mut self, display_size: Vec2) -> Option<f32> {
        if display_size.x <= 0.0 || display_size.y <= 0.0 {
            return None;
        }
        self.world_to_screen = display_size / self.world_size;
        let ratio = self.world_to_screen.y / self.world_to_screen.x;
        if (ratio - self.to_horizontal_radius).abs() <= f32::EPSILON {
            return None;
        }
        let old = self.to_horizontal_radius;
        self.to_horizontal_radius = ratio;
        Some(old)
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: ArkanoidSettings,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub lives: u32,
    pub scoring: Scoring,
    pub high_score: HighScore,
    pub viewport: Viewport,
    pub paddle: Paddle,
    /// Balls in insertion order
    pub balls: Vec<Ball>,
    pub grid: BrickGrid,
    pub bonuses: Vec<Bonus>,
    /// Bricks present at reset
    pub initial_brick_count: usize,
    pub god_mode: bool,
    pub trail: DebugTrail,
    /// Aim helpers from the last tick
    pub aim_helpers: Vec<AimSegment>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a session seeded from `settings.seed`
    pub fn new(settings: ArkanoidSettings) -> Self {
        let rng = Pcg32::seed_from_u64(settings.seed);
        Self::with_rng(settings, rng)
    }

    /// Create a session with an injected generator
    pub fn with_rng(settings: ArkanoidSettings, rng: Pcg32) -> Self {
        let viewport = Viewport::new(settings.world_size);
        let layout = GridLayout::fit(settings.world_size.x, 0.0, 1, 1, Vec2::ZERO);
        let mut state = Self {
            paddle: Paddle::centered(
                settings.world_size,
                settings.racket_width,
                settings.racket_sensitivity,
            ),
            phase: GamePhase::Start,
            lives: settings.starting_lives,
            scoring: Scoring::new(settings.multiplier),
            high_score: HighScore::new(),
            viewport,
            balls: Vec::new(),
            grid: BrickGrid::empty(0, 0, layout),
            bonuses: Vec::new(),
            initial_brick_count: 0,
            god_mode: settings.god_mode,
            trail: DebugTrail::new(settings.debug_draw_timeout),
            aim_helpers: Vec::new(),
            time_ticks: 0,
            rng,
            settings,
        };
        let settings = state.settings.clone();
        state.reset(&settings);
        state
    }

    /// Rebuild the whole world. The best score survives.
    pub fn reset(&mut self, settings: &ArkanoidSettings) {
        self.high_score.record(self.scoring.score);

        self.settings = settings.clone();
        // Keep the current display transform across resets
        let world_to_screen = self.viewport.world_to_screen;
        self.viewport = Viewport::new(settings.world_size);
        self.viewport.resize(world_to_screen * settings.world_size);

        self.phase = GamePhase::Start;
        self.lives = settings.starting_lives;
        self.scoring = Scoring::new(settings.multiplier);
        self.god_mode = settings.god_mode;
        self.paddle = Paddle::centered(
            settings.world_size,
            settings.racket_width,
            settings.racket_sensitivity,
        );
        self.balls.clear();
        self.bonuses.clear();
        self.trail = DebugTrail::new(settings.debug_draw_timeout);
        self.aim_helpers.clear();
        self.time_ticks = 0;

        super::tick::generate_bricks(self);
        self.initial_brick_count = self.grid.occupied();
        self.spawn_ball_resting();

        log::info!(
            "Session reset: {}x{} bricks, {} lives, world {}x{}",
            self.grid.rows(),
            self.grid.cols(),
            self.lives,
            settings.world_size.x,
            settings.world_size.y
        );
    }

    /// Spawn a ball resting on the paddle center
    pub fn spawn_ball_resting(&mut self) {
        let ball = Ball::resting(&self.paddle, self.settings.ball_radius, self.settings.ball_speed);
        self.balls.push(ball);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn score(&self) -> u64 {
        self.scoring.score
    }

    /// Horizontal radius ratio currently applied to hulls
    #[inline]
    pub fn horizontal_ratio(&self) -> f32 {
        self.viewport.to_horizontal_radius
    }

    /// Enter the terminal phase and fold the score into the best score
    pub(crate) fn finish(&mut self, reason: &str) {
        self.phase = GamePhase::GameOver;
        self.high_score.record(self.scoring.score);
        log::info!("Game over ({}): score {}", reason, self.scoring.score);
    }
}
