//! Brick damage and explosion cascades
//!
//! A ball hit removes one hit from a brick. When an explosive brick reaches
//! zero it blasts a pattern of cells around it; blasted bricks are armed
//! with a short countdown before the sweep removes them, and explosive
//! victims chain their own blasts immediately.

use super::brick::{BrickGrid, Explosion, ExplosionType};
use super::state::Scoring;
use crate::consts::EXPLOSION_COUNTDOWN_TICKS;

/// Cell offsets (row, col) covered by an explosion
pub fn blast_offsets(explosion: &Explosion) -> Vec<(isize, isize)> {
    let d = explosion.explosion_dist.max(0) as isize;
    match explosion.explosion_type {
        ExplosionType::Radial => {
            let mut cells: Vec<(isize, isize)> = (-d..=d).map(|k| (0, k)).collect();
            cells.extend((-d..=d).filter(|&k| k != 0).map(|k| (k, 0)));
            cells
        }
        ExplosionType::Vertical => (-2 * d..=2 * d).map(|k| (k, 0)).collect(),
        ExplosionType::Horizontal => (-2 * d..=2 * d).map(|k| (0, k)).collect(),
        ExplosionType::Diagonal => {
            let mut cells: Vec<(isize, isize)> = (-d..=d).map(|k| (k, k)).collect();
            cells.extend((-d..=d).filter(|&k| k != 0).map(|k| (k, -k)));
            cells
        }
    }
}

/// Apply a direct ball hit to (row, col).
///
/// Returns true if this hit destroyed the brick. Destruction scores the
/// brick and runs its cascade when it is explosive.
pub fn hit_brick(grid: &mut BrickGrid, row: usize, col: usize, scoring: &mut Scoring) -> bool {
    let (row, col) = (row as isize, col as isize);
    let Some(brick) = grid.get_mut(row, col) else {
        return false;
    };
    if !brick.take_damage(1) {
        return false;
    }
    let gained = scoring.brick_destroyed(brick.score);
    log::debug!("Brick ({}, {}) destroyed, +{}", row, col, gained);
    if brick.is_explosive() {
        detonate(grid, row, col, scoring);
    }
    true
}

/// Run the cascade of the explosive brick at (row, col).
///
/// The brick must already be at zero hits. Each brick detonates at most
/// once; a second call is a no-op.
pub fn detonate(grid: &mut BrickGrid, row: isize, col: isize, scoring: &mut Scoring) {
    let Some(brick) = grid.get_mut(row, col) else {
        return;
    };
    let Some(explosion) = brick.explosion() else {
        return;
    };
    debug_assert_eq!(brick.hits_left, 0, "detonating a live brick");
    if brick.exploded || brick.hits_left > 0 {
        log::warn!("Brick ({}, {}) refused to detonate twice", row, col);
        return;
    }
    brick.exploded = true;

    log::debug!(
        "Brick ({}, {}) explodes: {:?} dist {} dmg {}",
        row,
        col,
        explosion.explosion_type,
        explosion.explosion_dist,
        explosion.damage
    );

    for (dr, dc) in blast_offsets(&explosion) {
        blast_cell(grid, row + dr, col + dc, explosion.damage, scoring);
    }
}

/// Blast damage on one cell. Missing, empty and already-dead cells are skipped.
fn blast_cell(grid: &mut BrickGrid, row: isize, col: isize, damage: u32, scoring: &mut Scoring) {
    let Some(target) = grid.get_mut(row, col) else {
        return;
    };
    if !target.is_alive() {
        return;
    }
    target.ticks_before_explosion = EXPLOSION_COUNTDOWN_TICKS;
    if !target.take_damage(damage) {
        return;
    }
    let gained = scoring.brick_destroyed(target.score);
    log::debug!("Brick ({}, {}) caught in blast, +{}", row, col, gained);
    if target.is_explosive() {
        detonate(grid, row, col, scoring);
    }
}
