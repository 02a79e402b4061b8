//! Arkanoid headless runner
//!
//! Plays one seeded session with a simple autopilot and logs the outcome.
//! Usage: `arkanoid [settings.json] [max_ticks]`

#[cfg(not(target_arch = "wasm32"))]
use arkanoid::ArkanoidSettings;
#[cfg(not(target_arch = "wasm32"))]
use arkanoid::sim::{AimBounds, GamePhase, GameState, TickInput, aim_point, tick};

/// Simulated frame time (seconds)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 5;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Arkanoid (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    log::error!("Failed to read settings file {}: {}", path, e);
                    return std::process::ExitCode::FAILURE;
                }
            };
            match ArkanoidSettings::from_json(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("Invalid settings JSON in {} ({:?}): {}", path, e.classify(), e);
                    return std::process::ExitCode::FAILURE;
                }
            }
        }
        None => ArkanoidSettings::default(),
    };
    let max_ticks = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);

    let settings = settings.clamped();
    log::info!("Game initialized with seed: {}", settings.seed);
    let mut state = GameState::new(settings);

    while state.phase != GamePhase::GameOver && state.time_ticks < max_ticks {
        let input = autopilot(&state);
        tick(&mut state, &input, FRAME_DT);
    }

    let snap = state.snapshot();
    log::info!(
        "Finished after {} ticks: phase {:?}, score {}, lives {}, bricks left {}",
        state.time_ticks,
        snap.phase(),
        snap.score(),
        snap.lives(),
        state.grid.alive()
    );
    log::info!("Best score: {}", snap.high_score());
    std::process::ExitCode::SUCCESS
}

/// Follow the lowest descending ball's predicted landing point
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput {
        launch: state.balls.iter().any(|b| b.on_start),
        ..Default::default()
    };

    let bounds = AimBounds {
        world_size: state.viewport.world_size,
        paddle_top: state.paddle.pos.y,
        paddle_span: (state.paddle.pos.x, state.paddle.pos.x + state.paddle.width),
        radius: state.settings.ball_radius,
        ratio: state.horizontal_ratio(),
    };
    let target = state
        .balls
        .iter()
        .filter(|ball| ball.active && !ball.on_start && ball.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|ball| aim_point(ball.pos, ball.vel, &bounds).x)
        .or_else(|| state.bonuses.first().map(|b| b.rect().center().x));

    if let Some(x) = target {
        // Aim slightly off center so the ball keeps an angle
        let offset = (state.time_ticks as f32 * 0.05).sin() * state.paddle.width * 0.25;
        let delta = x + offset - state.paddle.center_x();
        input.move_left = delta < -state.paddle.sensitivity;
        input.move_right = delta > state.paddle.sensitivity;
    }
    input
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library on the web; there is no headless runner
}
