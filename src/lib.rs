//! Arkanoid - a deterministic brick-breaker simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hulls, hit detection, cascades, game state)
//! - `settings`: Session configuration with validation
//! - `highscores`: In-process best score tracking

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::ArkanoidSettings;

/// Game configuration constants
pub mod consts {
    /// Longest elapsed time a single tick will simulate (seconds)
    pub const MAX_ELAPSED: f32 = 1.0;

    /// Fraction of the world height occupied by the brick lattice
    pub const BRICK_AREA_FRACTION: f32 = 0.4;
    /// Smallest brick side a layout will produce
    pub const MIN_BRICK_SIZE: f32 = 1.0;
    /// Base score of a brick when random scores are off
    pub const BASE_BRICK_SCORE: u32 = 100;

    /// Paddle defaults
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Gap between the paddle bottom and the world's lower bound
    pub const PADDLE_BOTTOM_GAP: f32 = 30.0;

    /// Shallowest paddle bounce angle (radians) so shots never go flat
    pub const MIN_BOUNCE_ANGLE: f32 = 0.5;

    /// Safety cap on brick hits resolved for one ball in one tick
    pub const MAX_BRICK_HITS_PER_TICK: usize = 32;

    /// Countdown applied to bricks caught in a blast (ticks)
    pub const EXPLOSION_COUNTDOWN_TICKS: i32 = 6;

    /// Lives cap for the ExtraLife bonus
    pub const MAX_LIVES: u32 = 9;
    /// Flat score granted by the Jackpot bonus (before multiplier)
    pub const JACKPOT_SCORE: u64 = 1000;

    /// Debug trail capacity
    pub const MAX_DEBUG_HITS: usize = 128;
    /// Aim helpers exposed per tick
    pub const MAX_AIM_HELPERS: usize = 3;

    /// Velocity components below this are treated as zero
    pub const VELOCITY_EPSILON: f32 = 1e-4;
}
