//! Simulation tick
//!
//! Advances the session by one variable time step in a fixed order:
//! rescale, input, balls, brick sweep, bonus sweep, lives, debug aging.

use glam::Vec2;
use rand::Rng;

use super::aim::{AimBounds, aim_segment, bounce_vector};
use super::brick::{Brick, BrickGrid, BrickKind, Explosion, ExplosionType, GridLayout};
use super::collision::{resolve_brick_hits, resolve_paddle, resolve_walls};
use super::state::{Ball, Bonus, BonusKind, GamePhase, GameState, Paddle};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move the paddle left by its sensitivity
    pub move_left: bool,
    /// Move the paddle right by its sensitivity
    pub move_right: bool,
    /// Launch every resting ball
    pub launch: bool,
    /// Shift resting balls along the paddle
    pub nudge_left: bool,
    pub nudge_right: bool,
    /// Current display size, if known
    pub display_size: Option<Vec2>,
}

/// Advance the game state by `elapsed` seconds
pub fn tick(state: &mut GameState, input: &TickInput, elapsed: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    // 1. Display transform
    if let Some(old_ratio) = input.display_size.and_then(|d| state.viewport.resize(d)) {
        let new_ratio = state.viewport.to_horizontal_radius;
        state
            .grid
            .rescale_hulls(old_ratio, new_ratio, state.settings.ball_radius);
        log::debug!("Horizontal ratio {} -> {}", old_ratio, new_ratio);
    }

    // 2. Input
    apply_input(state, input);

    if !elapsed.is_finite() || elapsed <= 0.0 {
        refresh_aim_helpers(state);
        return;
    }
    let elapsed = elapsed.min(MAX_ELAPSED);
    state.time_ticks += 1;

    // 3. Balls
    if update_balls(state, elapsed) {
        return;
    }

    // 4. Bricks
    sweep_bricks(state);

    // 5. Bonuses
    sweep_bonuses(state, elapsed);

    // 6. Lives
    if state.balls.is_empty() {
        lose_life(state);
    }

    // 7. Debug trail and aim
    state.trail.age(elapsed);
    refresh_aim_helpers(state);
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let dir = input.move_right as i32 - input.move_left as i32;
    if dir != 0 {
        state.paddle.shift(dir as f32, state.viewport.world_size.x);
    }

    let nudge = input.nudge_right as i32 - input.nudge_left as i32;
    let sensitivity = state.paddle.sensitivity;
    for ball in state.balls.iter_mut().filter(|b| b.on_start) {
        ball.start_offset += nudge as f32 * sensitivity;
        ball.update_resting(&state.paddle);
    }

    if input.launch {
        let mut launched = 0;
        for ball in state.balls.iter_mut().filter(|b| b.on_start) {
            ball.launch(&state.paddle);
            launched += 1;
        }
        if launched > 0 && state.phase == GamePhase::Start {
            state.phase = GamePhase::Playing;
            log::debug!("Launched {} ball(s)", launched);
        }
    }
}

/// Move every flying ball and resolve its contacts.
///
/// Returns true if the last brick fell and the session ended.
fn update_balls(state: &mut GameState, elapsed: f32) -> bool {
    let ratio = state.viewport.to_horizontal_radius;
    let world_size = state.viewport.world_size;

    let mut i = 0;
    while i < state.balls.len() {
        let ball = &mut state.balls[i];
        if ball.on_start {
            i += 1;
            continue;
        }

        let from = ball.pos;
        ball.pos += ball.vel * elapsed;

        // The paddle sees the unclamped move, before the bottom bound can
        // kill or reflect the ball
        let contact = resolve_paddle(ball, from, &state.paddle, ratio);
        if contact.is_none() && ball.vel.y > 0.0 && ball.pos.y > state.paddle.pos.y {
            ball.active = false;
        }

        if !resolve_walls(ball, world_size, ratio, state.god_mode, &mut state.trail) {
            log::debug!("Ball lost at {:?}", ball.pos);
            state.balls.remove(i);
            continue;
        }

        if let Some(contact) = contact {
            state.scoring.paddle_hit();
            state.trail.push(contact + Vec2::new(0.0, ball.radius), Vec2::NEG_Y);
        } else {
            resolve_brick_hits(
                ball,
                from,
                elapsed,
                &mut state.grid,
                &mut state.scoring,
                ratio,
                &mut state.trail,
            );
        }

        if state.initial_brick_count > 0 && state.scoring.destroyed >= state.initial_brick_count {
            state.finish("all bricks destroyed");
            return true;
        }
        i += 1;
    }
    false
}

/// Run countdowns and remove finished bricks, rolling for bonuses
fn sweep_bricks(state: &mut GameState) {
    let mut finished = Vec::new();
    for (row, col, brick) in state.grid.iter_mut() {
        if brick.is_armed() {
            brick.ticks_before_explosion -= 1;
        }
        if !brick.is_alive() && !brick.is_armed() {
            finished.push((row, col));
        }
    }

    for (row, col) in finished {
        let Some(brick) = state.grid.clear(row, col) else {
            continue;
        };
        if roll(&mut state.rng, state.settings.bonus_chance) {
            let kind = BonusKind::ALL[state.rng.random_range(0..BonusKind::ALL.len())];
            log::debug!("Bonus {:?} dropped from ({}, {})", kind, row, col);
            state
                .bonuses
                .push(Bonus::from_brick(brick.rect(), state.settings.bonus_speed, kind));
        }
    }
}

fn sweep_bonuses(state: &mut GameState, elapsed: f32) {
    let paddle = state.paddle.rect();
    let bottom = state.viewport.world_size.y;
    let mut caught = Vec::new();

    state.bonuses.retain_mut(|bonus| {
        bonus.pos.y += bonus.falling_speed * elapsed;
        if bonus.rect().overlaps(&paddle) {
            caught.push(bonus.kind);
            return false;
        }
        bonus.pos.y <= bottom
    });

    for kind in caught {
        apply_bonus(state, kind);
    }
}

fn apply_bonus(state: &mut GameState, kind: BonusKind) {
    log::debug!("Bonus caught: {:?}", kind);
    match kind {
        BonusKind::AnotherBall => state.spawn_ball_resting(),
        BonusKind::ExtraLife => state.lives = (state.lives + 1).min(MAX_LIVES),
        BonusKind::TurnBrickIntoExplosive => {
            let candidates: Vec<(usize, usize)> = state
                .grid
                .iter()
                .filter(|(_, _, b)| b.is_alive() && !b.is_explosive())
                .map(|(r, c, _)| (r, c))
                .collect();
            if candidates.is_empty() {
                return;
            }
            let (row, col) = candidates[state.rng.random_range(0..candidates.len())];
            let explosion = random_explosion(&mut state.rng);
            if let Some(brick) = state.grid.get_mut(row as isize, col as isize) {
                brick.kind = BrickKind::Explosive(explosion);
            }
        }
        BonusKind::Jackpot => {
            state.scoring.add_bonus(JACKPOT_SCORE);
        }
    }
}

fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    log::debug!("Life lost, {} left", state.lives);
    if state.lives == 0 {
        state.finish("out of lives");
        return;
    }
    state.spawn_ball_resting();
    state.phase = GamePhase::Start;
}

fn refresh_aim_helpers(state: &mut GameState) {
    let bounds = AimBounds {
        world_size: state.viewport.world_size,
        paddle_top: state.paddle.pos.y,
        paddle_span: (state.paddle.pos.x, state.paddle.pos.x + state.paddle.width),
        radius: state.settings.ball_radius,
        ratio: state.viewport.to_horizontal_radius,
    };
    let paddle = state.paddle;

    state.aim_helpers.clear();
    state.aim_helpers.extend(
        state
            .balls
            .iter()
            .filter(|b| b.active)
            .take(MAX_AIM_HELPERS)
            .map(|ball| {
                let vel = if ball.on_start {
                    launch_velocity(ball, &paddle)
                } else {
                    ball.vel
                };
                aim_segment(ball.pos, vel, &bounds)
            }),
    );
}

/// Velocity a resting ball would leave the paddle with
fn launch_velocity(ball: &Ball, paddle: &Paddle) -> Vec2 {
    let dist = paddle.center_x() - ball.pos.x;
    bounce_vector(ball.initial_speed, paddle.width, dist)
}

/// Probability roll that treats non-positive (and NaN) chances as never
fn roll(rng: &mut impl Rng, chance: f32) -> bool {
    chance > 0.0 && rng.random::<f32>() < chance
}

fn random_explosion(rng: &mut impl Rng) -> Explosion {
    Explosion {
        explosion_type: ExplosionType::ALL[rng.random_range(0..ExplosionType::ALL.len())],
        explosion_dist: rng.random_range(1..=2),
        damage: rng.random_range(1..=2),
    }
}

/// Lay out a fresh brick lattice for the current settings
pub fn generate_bricks(state: &mut GameState) {
    let settings = &state.settings;
    let world = settings.world_size;
    let cols = settings.bricks_columns_count as usize;
    let rows = settings.bricks_rows_count as usize;
    let layout = GridLayout::fit(
        world.x,
        world.y * BRICK_AREA_FRACTION,
        cols,
        rows,
        Vec2::new(settings.bricks_columns_padding, settings.bricks_rows_padding),
    );
    let hits = settings.hits_for_brick_to_destroy.max(1);
    let radius = settings.ball_radius;
    let ratio = state.viewport.to_horizontal_radius;

    let mut grid = BrickGrid::empty(rows, cols, layout);
    let mut explosive = 0;
    for row in 0..rows {
        for col in 0..cols {
            let mut brick = Brick::new(layout.cell_rect(row, col), hits, radius, ratio);
            if settings.random_bricks {
                brick = brick.with_score(state.rng.random_range(1..=5u32) * BASE_BRICK_SCORE);
            }
            if settings.explosive_bricks && roll(&mut state.rng, settings.explosive_brick_chance) {
                brick = brick.with_kind(BrickKind::Explosive(random_explosion(&mut state.rng)));
                explosive += 1;
            }
            grid.place(row, col, brick);
        }
    }

    log::debug!("Generated {}x{} bricks ({} explosive)", rows, cols, explosive);
    state.grid = grid;
}
