//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied elapsed time, clamped per tick
//! - Seeded RNG only, owned by the game state
//! - Stable iteration order (balls by insertion, bricks row-major)
//! - No rendering or platform dependencies

pub mod aim;
pub mod brick;
pub mod collision;
pub mod explosion;
pub mod geometry;
pub mod hull;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use aim::{AimBounds, AimSegment, aim_point, aim_segment, bounce_vector};
pub use brick::{Brick, BrickGrid, BrickKind, CellRange, Explosion, ExplosionType, GridLayout};
pub use collision::{BrickHit, detect_brick_hit, resolve_brick_hits, resolve_paddle, resolve_walls};
pub use explosion::{blast_offsets, detonate, hit_brick};
pub use geometry::{Rect, SegmentHit, line_intersection, quadratic_distance, segment_intersection};
pub use hull::{BrickCollision, EdgeFace, HULL_POINTS};
pub use snapshot::{BallView, BrickView, HitView, Snapshot};
pub use state::{
    Ball, Bonus, BonusKind, DebugHit, DebugTrail, GamePhase, GameState, Paddle, Scoring, Viewport,
};
pub use tick::{TickInput, generate_bricks, tick};
