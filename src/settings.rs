//! Session settings
//!
//! Consumed as-is by `GameState::reset`. Callers run `clamped()` first; the
//! simulation never re-validates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BRICK_AREA_FRACTION, MIN_BRICK_SIZE};

/// Configuration for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArkanoidSettings {
    /// World size in world units (width, height)
    pub world_size: Vec2,

    // === Bricks ===
    pub bricks_columns_count: u32,
    pub bricks_rows_count: u32,
    pub bricks_columns_padding: f32,
    pub bricks_rows_padding: f32,
    /// Hits a freshly built brick can take
    pub hits_for_brick_to_destroy: u32,
    /// Bricks get a random score from 100..=500
    pub random_bricks: bool,
    /// Allow explosive bricks at reset
    pub explosive_bricks: bool,
    /// Chance (0-1) of a slot being explosive when enabled
    pub explosive_brick_chance: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_speed: f32,

    // === Paddle ===
    pub racket_width: f32,
    /// World units per tick while a move input is held
    pub racket_sensitivity: f32,

    // === Bonuses ===
    /// Chance (0-1) of a destroyed brick dropping a bonus
    pub bonus_chance: f32,
    /// Bonus falling speed (world units per second)
    pub bonus_speed: f32,

    // === Game mode ===
    pub starting_lives: u32,
    /// Score multiplier grows with consecutive destructions
    pub multiplier: bool,
    /// Bottom wall reflects instead of killing the ball
    pub god_mode: bool,

    // === Debug ===
    /// Seconds a debug hit stays in the trail
    pub debug_draw_timeout: f32,

    /// RNG seed for the session
    pub seed: u64,
}

impl ArkanoidSettings {
    pub const BRICKS_COLUMNS_MIN: u32 = 10;
    pub const BRICKS_COLUMNS_MAX: u32 = 30;
    pub const BRICKS_ROWS_MIN: u32 = 3;
    pub const BRICKS_ROWS_MAX: u32 = 10;

    pub const BRICKS_COLUMNS_PADDING_MIN: f32 = 5.0;
    pub const BRICKS_COLUMNS_PADDING_MAX: f32 = 20.0;
    pub const BRICKS_ROWS_PADDING_MIN: f32 = 5.0;
    pub const BRICKS_ROWS_PADDING_MAX: f32 = 20.0;

    pub const BALL_RADIUS_MIN: f32 = 5.0;
    pub const BALL_RADIUS_MAX: f32 = 50.0;
    pub const BALL_SPEED_MIN: f32 = 1.0;
    pub const BALL_SPEED_MAX: f32 = 1000.0;

    pub const RACKET_WIDTH_MIN: f32 = 50.0;
    pub const RACKET_SENS_MIN: f32 = 1.0;
    pub const RACKET_SENS_MAX: f32 = 30.0;

    pub const EXPLOSIVE_BRICK_CHANCE_MIN: f32 = 0.0;
    pub const EXPLOSIVE_BRICK_CHANCE_MAX: f32 = 1.0;
    pub const BONUS_CHANCE_MIN: f32 = 0.0;
    pub const BONUS_CHANCE_MAX: f32 = 1.0;
    pub const BONUS_FALLING_SPEED_MIN: f32 = 10.0;
    pub const BONUS_FALLING_SPEED_MAX: f32 = 500.0;

    pub const STARTING_LIVES_MIN: u32 = 1;
    pub const STARTING_LIVES_MAX: u32 = 9;
    pub const HITS_FOR_BRICK_TO_DESTROY_MIN: u32 = 1;
    pub const HITS_FOR_BRICK_TO_DESTROY_MAX: u32 = 5;

    /// Return a copy with every option forced into its valid range
    pub fn clamped(&self) -> Self {
        let mut s = self.clone();

        s.bricks_columns_count = s
            .bricks_columns_count
            .clamp(Self::BRICKS_COLUMNS_MIN, Self::BRICKS_COLUMNS_MAX);
        s.bricks_rows_count = s
            .bricks_rows_count
            .clamp(Self::BRICKS_ROWS_MIN, Self::BRICKS_ROWS_MAX);
        s.bricks_columns_padding = s
            .bricks_columns_padding
            .clamp(Self::BRICKS_COLUMNS_PADDING_MIN, Self::BRICKS_COLUMNS_PADDING_MAX);
        s.bricks_rows_padding = s
            .bricks_rows_padding
            .clamp(Self::BRICKS_ROWS_PADDING_MIN, Self::BRICKS_ROWS_PADDING_MAX);
        s.hits_for_brick_to_destroy = s.hits_for_brick_to_destroy.clamp(
            Self::HITS_FOR_BRICK_TO_DESTROY_MIN,
            Self::HITS_FOR_BRICK_TO_DESTROY_MAX,
        );
        s.explosive_brick_chance = s
            .explosive_brick_chance
            .clamp(Self::EXPLOSIVE_BRICK_CHANCE_MIN, Self::EXPLOSIVE_BRICK_CHANCE_MAX);

        s.ball_radius = s.ball_radius.clamp(Self::BALL_RADIUS_MIN, Self::BALL_RADIUS_MAX);
        s.ball_speed = s.ball_speed.clamp(Self::BALL_SPEED_MIN, Self::BALL_SPEED_MAX);

        s.racket_sensitivity = s
            .racket_sensitivity
            .clamp(Self::RACKET_SENS_MIN, Self::RACKET_SENS_MAX);

        s.bonus_chance = s.bonus_chance.clamp(Self::BONUS_CHANCE_MIN, Self::BONUS_CHANCE_MAX);
        s.bonus_speed = s
            .bonus_speed
            .clamp(Self::BONUS_FALLING_SPEED_MIN, Self::BONUS_FALLING_SPEED_MAX);

        s.starting_lives = s
            .starting_lives
            .clamp(Self::STARTING_LIVES_MIN, Self::STARTING_LIVES_MAX);
        s.debug_draw_timeout = s.debug_draw_timeout.clamp(0.1, 10.0);

        // World must fit the paddle, the ball and a little launch headroom,
        // and leave every brick a positive footprint after padding
        let cols = s.bricks_columns_count as f32;
        let rows = s.bricks_rows_count as f32;
        let lattice_width = cols * (s.bricks_columns_padding + MIN_BRICK_SIZE) + s.bricks_columns_padding;
        let lattice_height = rows * (s.bricks_rows_padding + MIN_BRICK_SIZE) + s.bricks_rows_padding;

        s.world_size.x = s.world_size.x.max(Self::RACKET_WIDTH_MIN).max(lattice_width);
        s.racket_width = s.racket_width.clamp(Self::RACKET_WIDTH_MIN, s.world_size.x);
        let min_height = s.ball_radius * 2.0 + s.ball_speed * 0.3 + 50.0;
        s.world_size.y = s.world_size.y.max(min_height).max(lattice_height / BRICK_AREA_FRACTION);

        s
    }

    /// Parse settings from JSON (missing fields take their defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for ArkanoidSettings {
    fn default() -> Self {
        Self {
            world_size: Vec2::new(800.0, 600.0),

            bricks_columns_count: 15,
            bricks_rows_count: 7,
            bricks_columns_padding: 5.0,
            bricks_rows_padding: 5.0,
            hits_for_brick_to_destroy: 1,
            random_bricks: false,
            explosive_bricks: true,
            explosive_brick_chance: 0.1,

            ball_radius: 10.0,
            ball_speed: 150.0,

            racket_width: 100.0,
            racket_sensitivity: 8.0,

            bonus_chance: 0.1,
            bonus_speed: 100.0,

            starting_lives: 3,
            multiplier: true,
            god_mode: false,

            debug_draw_timeout: 0.5,

            seed: 0x5eed,
        }
    }
}
