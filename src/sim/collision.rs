//! Collision detection and response
//!
//! The tricky part of the game: finding the first brick hull edge a ball
//! center crosses during a tick, reflecting off it, and spending the rest of
//! the tick along the new direction. Walls and the paddle are simple
//! axis-aligned tests that run before the brick pass.

use glam::Vec2;

use super::aim::bounce_vector;
use super::brick::BrickGrid;
use super::explosion::hit_brick;
use super::geometry::{Rect, line_intersection, quadratic_distance};
use super::hull::{EdgeFace, HULL_POINTS};
use super::state::{Ball, DebugTrail, Paddle, Scoring};
use crate::consts::MAX_BRICK_HITS_PER_TICK;

/// Hits closer than this to the segment start (as a fraction of the
/// segment) are the contact the ball is leaving
const MIN_HIT_T: f32 = 1e-5;

/// A detected ball/brick contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickHit {
    pub row: usize,
    pub col: usize,
    /// Ball center at contact
    pub point: Vec2,
    /// Component-wise velocity multiplier, (-1, 1) or (1, -1)
    pub axis: Vec2,
    /// Unit outward normal of the struck edge
    pub normal: Vec2,
    pub face: EdgeFace,
}

/// Find the first brick edge crossed by the ball center moving `from -> to`.
///
/// Candidate cells are scanned row-major and the first cell with an
/// acceptable edge wins, even if a later cell holds a nearer one. Inside a
/// cell the edge nearest to `from` wins.
pub fn detect_brick_hit(
    grid: &BrickGrid,
    from: Vec2,
    to: Vec2,
    radius: f32,
    ratio: f32,
) -> Option<BrickHit> {
    let dir = to - from;
    let max_dist = dir.length_squared();
    if max_dist <= 0.0 {
        return None;
    }

    let area = Rect::from_corners(from, to).inflate(Vec2::new(radius * ratio, radius));
    let range = grid.cells_touching(area)?;

    for (row, col) in range.iter() {
        let Some(brick) = grid.get(row as isize, col as isize) else {
            continue;
        };
        if !brick.is_alive() {
            continue;
        }

        let hull = &brick.collision;
        let mut best: Option<(f32, usize, Vec2)> = None;
        for i in 0..HULL_POINTS {
            let normal = hull.outward_normal(i);
            if dir.dot(normal) >= 0.0 {
                continue;
            }
            let (a, b) = hull.edge(i);
            let Some(hit) = line_intersection(from, to, a, b) else {
                continue;
            };
            if !(0.0..=1.0).contains(&hit.u) || hit.t < MIN_HIT_T {
                continue;
            }
            let dist = quadratic_distance(from, hit.point);
            if dist > max_dist || best.is_some_and(|(d, _, _)| dist >= d) {
                continue;
            }
            best = Some((dist, i, hit.point));
        }

        if let Some((_, edge, point)) = best {
            let face = EdgeFace::of_edge(edge);
            let normal = hull.outward_normal(edge).normalize_or_zero();
            return Some(BrickHit {
                row,
                col,
                point,
                axis: reflection_axis(face, point, brick.rect(), dir, normal, radius, ratio),
                normal,
                face,
            });
        }
    }

    None
}

/// Velocity multiplier for a hit on `face` at `point`.
///
/// The reflected direction never points back into the struck edge.
fn reflection_axis(
    face: EdgeFace,
    point: Vec2,
    rect: Rect,
    dir: Vec2,
    normal: Vec2,
    radius: f32,
    ratio: f32,
) -> Vec2 {
    const INVERT_X: Vec2 = Vec2::new(-1.0, 1.0);
    const INVERT_Y: Vec2 = Vec2::new(1.0, -1.0);

    let (top, left) = match face {
        EdgeFace::Left | EdgeFace::Right => return INVERT_X,
        EdgeFace::Top | EdgeFace::Bottom => return INVERT_Y,
        EdgeFace::TopLeft => (true, true),
        EdgeFace::TopRight => (true, false),
        EdgeFace::BottomLeft => (false, true),
        EdgeFace::BottomRight => (false, false),
    };

    // Point on the diagonal where the vertical and horizontal offsets from
    // the brick faces are equal
    let checker = radius * radius * ratio / (radius + radius * ratio);
    let dy_out = if top {
        rect.min().y - point.y
    } else {
        point.y - rect.max().y
    };
    let into_y = if top { dir.y > 0.0 } else { dir.y < 0.0 };
    let into_x = if left { dir.x > 0.0 } else { dir.x < 0.0 };

    let axis = if (dy_out >= checker && into_y) || !into_x {
        INVERT_Y
    } else {
        INVERT_X
    };

    // Steep hits near the far end of a diagonal; the other axis always leaves
    if (dir * axis).dot(normal) < 0.0 {
        if axis == INVERT_X { INVERT_Y } else { INVERT_X }
    } else {
        axis
    }
}

/// Resolve every brick hit along `from -> ball.pos` within `elapsed`.
///
/// The ball is expected to have already moved to `from + vel * elapsed`
/// (possibly clamped by walls). Returns the number of hits resolved.
pub fn resolve_brick_hits(
    ball: &mut Ball,
    from: Vec2,
    elapsed: f32,
    grid: &mut BrickGrid,
    scoring: &mut Scoring,
    ratio: f32,
    trail: &mut DebugTrail,
) -> usize {
    let mut from = from;
    let mut remaining = elapsed.max(0.0);
    let mut hits = 0;

    while remaining > 0.0 {
        let Some(hit) = detect_brick_hit(grid, from, ball.pos, ball.radius, ratio) else {
            break;
        };
        hits += 1;

        let travel = ball.pos - from;
        let fraction = if travel.x.abs() >= travel.y.abs() {
            (hit.point.x - from.x) / travel.x
        } else {
            (hit.point.y - from.y) / travel.y
        };
        remaining = (remaining - remaining * fraction.clamp(0.0, 1.0)).max(0.0);

        log::trace!(
            "Ball hit brick ({}, {}) {:?} at {:?}, {:.4}s left",
            hit.row,
            hit.col,
            hit.face,
            hit.point,
            remaining
        );
        hit_brick(grid, hit.row, hit.col, scoring);
        trail.push(hit.point, hit.normal);

        ball.vel *= hit.axis;
        from = hit.point;
        ball.pos = hit.point + ball.vel * remaining;

        if hits >= MAX_BRICK_HITS_PER_TICK {
            log::debug!("Brick hit cap reached, ball parked at {:?}", hit.point);
            ball.pos = hit.point;
            break;
        }
    }

    hits
}

/// Keep the ball inside the side and top walls.
///
/// Returns false when the ball left through the bottom (never in god mode).
pub fn resolve_walls(ball: &mut Ball, world_size: Vec2, ratio: f32, god_mode: bool, trail: &mut DebugTrail) -> bool {
    let rx = ball.horizontal_radius(ratio);
    let r = ball.radius;

    if ball.pos.x < rx {
        ball.pos.x = rx;
        ball.vel.x = ball.vel.x.abs();
        trail.push(Vec2::new(0.0, ball.pos.y), Vec2::X);
    } else if ball.pos.x > world_size.x - rx {
        ball.pos.x = world_size.x - rx;
        ball.vel.x = -ball.vel.x.abs();
        trail.push(Vec2::new(world_size.x, ball.pos.y), Vec2::NEG_X);
    }

    if ball.pos.y < r {
        ball.pos.y = r;
        ball.vel.y = ball.vel.y.abs();
        trail.push(Vec2::new(ball.pos.x, 0.0), Vec2::Y);
    } else if ball.pos.y > world_size.y - r {
        if !god_mode {
            return false;
        }
        ball.pos.y = world_size.y - r;
        ball.vel.y = -ball.vel.y.abs();
        ball.active = true;
        trail.push(Vec2::new(ball.pos.x, world_size.y), Vec2::NEG_Y);
    }

    true
}

/// Bounce the ball off the paddle if it reached the paddle surface this tick.
///
/// `prev` is the ball center at the start of the tick. Returns the contact
/// point on a bounce.
pub fn resolve_paddle(ball: &mut Ball, prev: Vec2, paddle: &Paddle, ratio: f32) -> Option<Vec2> {
    if !ball.active || ball.vel.y <= 0.0 {
        return None;
    }
    let r = ball.radius;
    let rx = ball.horizontal_radius(ratio);
    let top = paddle.pos.y;

    // Started above the surface and reached it
    if prev.y + r > top || ball.pos.y + r < top {
        return None;
    }

    let contact_x = if ball.pos.y + r <= top + paddle.basic_height {
        ball.pos.x
    } else {
        // Tunneled through: back-solve the crossing along Y
        let travel = ball.pos - prev;
        let t = ((top - r - prev.y) / travel.y).clamp(0.0, 1.0);
        prev.x + travel.x * t
    };

    let overlaps = contact_x + rx >= paddle.pos.x && contact_x - rx <= paddle.pos.x + paddle.width;
    if !overlaps {
        return None;
    }

    ball.pos = Vec2::new(contact_x, top - r);
    let dist = paddle.center_x() - contact_x;
    ball.vel = bounce_vector(ball.initial_speed, paddle.width, dist).normalize_or_zero() * ball.initial_speed;
    Some(ball.pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::brick::{Brick, GridLayout};
    use proptest::prelude::*;

    const R: f32 = 10.0;

    fn layout() -> GridLayout {
        GridLayout {
            origin: Vec2::new(100.0, 100.0),
            brick_size: Vec2::new(40.0, 20.0),
            padding: Vec2::new(10.0, 10.0),
        }
    }

    /// Grid with bricks only at the listed cells
    fn grid_with(rows: usize, cols: usize, cells: &[(usize, usize)], hits: u32) -> BrickGrid {
        let layout = layout();
        let mut grid = BrickGrid::empty(rows, cols, layout);
        for &(r, c) in cells {
            grid.place(r, c, Brick::new(layout.cell_rect(r, c), hits, R, 1.0));
        }
        grid
    }

    /// Largest signed distance from `p` to a hull edge line; negative when
    /// `p` is strictly inside the hull
    fn hull_clearance(brick: &Brick, p: Vec2) -> f32 {
        (0..HULL_POINTS)
            .map(|i| {
                let (a, _) = brick.collision.edge(i);
                (p - a).dot(brick.collision.outward_normal(i).normalize_or_zero())
            })
            .fold(f32::NEG_INFINITY, f32::max)
    }

    fn ball(pos: Vec2, vel: Vec2) -> Ball {
        Ball {
            pos,
            vel,
            radius: R,
            initial_speed: vel.length(),
            active: true,
            on_start: false,
            start_offset: 0.0,
        }
    }

    #[test]
    fn test_detect_bottom_face() {
        // Brick (0, 0) spans x 100..140, y 100..120; hull bottom at y = 130
        let grid = grid_with(1, 1, &[(0, 0)], 1);
        let hit = detect_brick_hit(&grid, Vec2::new(120.0, 150.0), Vec2::new(120.0, 120.0), R, 1.0).unwrap();
        assert_eq!((hit.row, hit.col), (0, 0));
        assert_eq!(hit.face, EdgeFace::Bottom);
        assert!((hit.point - Vec2::new(120.0, 130.0)).length() < 1e-4);
        assert_eq!(hit.axis, Vec2::new(1.0, -1.0));
        assert!((hit.normal - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_detect_side_face() {
        // Moving right into the left face at x = 90
        let grid = grid_with(1, 1, &[(0, 0)], 1);
        let hit = detect_brick_hit(&grid, Vec2::new(70.0, 110.0), Vec2::new(95.0, 110.0), R, 1.0).unwrap();
        assert_eq!(hit.face, EdgeFace::Left);
        assert_eq!(hit.axis, Vec2::new(-1.0, 1.0));
        assert!((hit.point.x - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_detect_ignores_back_faces_and_short_segments() {
        let grid = grid_with(1, 1, &[(0, 0)], 1);
        // Moving away from the bottom face
        assert!(detect_brick_hit(&grid, Vec2::new(120.0, 135.0), Vec2::new(120.0, 160.0), R, 1.0).is_none());
        // Stops short of the hull
        assert!(detect_brick_hit(&grid, Vec2::new(120.0, 150.0), Vec2::new(120.0, 135.0), R, 1.0).is_none());
        // Zero-length motion
        assert!(detect_brick_hit(&grid, Vec2::new(120.0, 150.0), Vec2::new(120.0, 150.0), R, 1.0).is_none());
    }

    #[test]
    fn test_detect_skips_dead_bricks() {
        let mut grid = grid_with(1, 1, &[(0, 0)], 1);
        grid.get_mut(0, 0).unwrap().hits_left = 0;
        assert!(detect_brick_hit(&grid, Vec2::new(120.0, 150.0), Vec2::new(120.0, 120.0), R, 1.0).is_none());
    }

    #[test]
    fn test_corner_hit_from_above_inverts_y() {
        // Falling onto the top-left diagonal close to the top face
        let grid = grid_with(1, 1, &[(0, 0)], 1);
        let hit = detect_brick_hit(&grid, Vec2::new(98.0, 80.0), Vec2::new(98.0, 100.0), R, 1.0).unwrap();
        assert_eq!(hit.face, EdgeFace::TopLeft);
        // Diagonal from (100, 90) to (90, 100): x = 98 gives y = 92, 8 above the face
        assert!((hit.point - Vec2::new(98.0, 92.0)).length() < 1e-4);
        assert_eq!(hit.axis, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_corner_hit_from_side_inverts_x() {
        // Moving right onto the top-left diagonal close to the left face
        let grid = grid_with(1, 1, &[(0, 0)], 1);
        let hit = detect_brick_hit(&grid, Vec2::new(80.0, 98.0), Vec2::new(100.0, 98.0), R, 1.0).unwrap();
        assert_eq!(hit.face, EdgeFace::TopLeft);
        assert!((hit.point - Vec2::new(92.0, 98.0)).length() < 1e-4);
        assert_eq!(hit.axis, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_corner_hit_moving_away_on_x_inverts_y() {
        // Moving up-left onto the bottom-left diagonal: never moving into the left face
        let grid = grid_with(1, 1, &[(0, 0)], 1);
        let hit = detect_brick_hit(&grid, Vec2::new(97.0, 140.0), Vec2::new(93.0, 120.0), R, 1.0).unwrap();
        assert_eq!(hit.face, EdgeFace::BottomLeft);
        assert_eq!(hit.axis, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_steep_corner_hit_leaves_the_edge() {
        // Rising onto the bottom-left diagonal (90, 120) -> (100, 130) close to
        // the left face: inverting X here would keep the ball inside the hull
        let grid = grid_with(1, 1, &[(0, 0)], 1);
        let from = Vec2::new(92.0, 140.0);
        let to = Vec2::new(94.0, 110.0);
        let hit = detect_brick_hit(&grid, from, to, R, 1.0).unwrap();
        assert_eq!(hit.face, EdgeFace::BottomLeft);
        assert!((hit.point - Vec2::new(93.125, 123.125)).length() < 1e-3);
        assert_eq!(hit.axis, Vec2::new(1.0, -1.0));
        assert!(((to - from) * hit.axis).dot(hit.normal) > 0.0);
    }

    #[test]
    fn test_steep_corner_hit_bounces_back_down() {
        let mut grid = grid_with(1, 1, &[(0, 0)], 3);
        let mut scoring = Scoring::new(false);
        let mut trail = DebugTrail::new(1.0);
        let from = Vec2::new(92.0, 140.0);
        let vel = Vec2::new(20.0, -300.0);
        let mut b = ball(from + vel * 0.1, vel);

        let hits = resolve_brick_hits(&mut b, from, 0.1, &mut grid, &mut scoring, 1.0, &mut trail);
        assert_eq!(hits, 1);
        assert_eq!(b.vel, Vec2::new(20.0, 300.0));
        assert!((b.pos - Vec2::new(94.0, 136.25)).length() < 1e-3);
        assert!(hull_clearance(grid.get(0, 0).unwrap(), b.pos) > 0.0);
    }

    #[test]
    fn test_first_cell_wins_over_nearer_later_cell() {
        // Row 0 and row 1 in the same column; the upward segment crosses row 1 first
        // but row 0 is scanned first
        let grid = grid_with(2, 1, &[(0, 0), (1, 0)], 1);
        let hit = detect_brick_hit(&grid, Vec2::new(120.0, 175.0), Vec2::new(120.0, 40.0), R, 1.0).unwrap();
        assert_eq!((hit.row, hit.col), (0, 0));
    }

    #[test]
    fn test_brick_reflection_conserves_speed() {
        let mut grid = grid_with(1, 1, &[(0, 0)], 3);
        let mut scoring = Scoring::new(false);
        let mut trail = DebugTrail::new(1.0);
        let from = Vec2::new(120.0, 150.0);
        let mut b = ball(from + Vec2::new(30.0, -300.0) * 0.1, Vec2::new(30.0, -300.0));
        let speed = b.vel.length();

        let hits = resolve_brick_hits(&mut b, from, 0.1, &mut grid, &mut scoring, 1.0, &mut trail);
        assert_eq!(hits, 1);
        assert!((b.vel.length() - speed).abs() < 1e-3);
        assert_eq!(b.vel, Vec2::new(30.0, 300.0));
        assert_eq!(grid.get(0, 0).unwrap().hits_left, 2);
        assert_eq!(trail.hits.len(), 1);
        // Ended below the hull
        assert!(b.pos.y > 130.0);
    }

    #[test]
    fn test_single_tick_multi_hit() {
        // Brick (0, 1): x 150..190, y 100..120. Brick (1, 0): x 100..140, y 130..150
        let mut grid = grid_with(2, 3, &[(0, 1), (1, 0)], 1);
        let mut scoring = Scoring::new(false);
        let mut trail = DebugTrail::new(1.0);
        // Moving left: strikes the right face of (1, 0), then the bottom of (0, 1)
        let from = Vec2::new(160.0, 133.0);
        let vel = Vec2::new(-200.0, -40.0);
        let mut b = ball(from + vel * 0.1, vel);

        let hits = resolve_brick_hits(&mut b, from, 0.1, &mut grid, &mut scoring, 1.0, &mut trail);
        assert_eq!(hits, 2);
        assert_eq!(scoring.destroyed, 2);
        assert_eq!(b.vel, Vec2::new(200.0, 40.0));
        assert_eq!(trail.hits.len(), 2);
        assert!((trail.hits[0].pos - Vec2::new(150.0, 131.0)).length() < 1e-3);
        assert!((trail.hits[1].pos - Vec2::new(155.0, 130.0)).length() < 1e-3);
    }

    #[test]
    fn test_destroyed_brick_scores_with_multiplier() {
        let mut grid = grid_with(1, 1, &[(0, 0)], 1);
        let mut scoring = Scoring::new(true);
        scoring.combo = 2;
        let mut trail = DebugTrail::new(1.0);
        let from = Vec2::new(120.0, 150.0);
        let mut b = ball(Vec2::new(120.0, 120.0), Vec2::new(0.0, -300.0));

        resolve_brick_hits(&mut b, from, 0.1, &mut grid, &mut scoring, 1.0, &mut trail);
        // Combo becomes 3 on this destruction
        assert_eq!(scoring.score, 300);
        assert!(!grid.get(0, 0).unwrap().collision.visible);
    }

    #[test]
    fn test_straight_up_hits_top_wall() {
        let mut trail = DebugTrail::new(1.0);
        let mut b = ball(Vec2::new(400.0, 20.0), Vec2::new(0.0, -150.0));
        b.pos += b.vel * 0.1;
        assert!(resolve_walls(&mut b, Vec2::new(800.0, 600.0), 1.0, false, &mut trail));
        assert_eq!(b.vel, Vec2::new(0.0, 150.0));
        assert_eq!(b.pos.y, 10.0);
        assert_eq!(trail.hits[0].normal, Vec2::Y);
    }

    #[test]
    fn test_side_walls_use_horizontal_radius() {
        let mut trail = DebugTrail::new(1.0);
        let mut b = ball(Vec2::new(2.0, 300.0), Vec2::new(-100.0, 50.0));
        assert!(resolve_walls(&mut b, Vec2::new(800.0, 600.0), 0.5, false, &mut trail));
        assert_eq!(b.pos.x, 5.0);
        assert_eq!(b.vel, Vec2::new(100.0, 50.0));

        let mut b = ball(Vec2::new(799.0, 300.0), Vec2::new(100.0, 50.0));
        resolve_walls(&mut b, Vec2::new(800.0, 600.0), 2.0, false, &mut trail);
        assert_eq!(b.pos.x, 780.0);
        assert_eq!(b.vel.x, -100.0);
    }

    #[test]
    fn test_bottom_wall_kills_or_reflects() {
        let mut trail = DebugTrail::new(1.0);
        let mut b = ball(Vec2::new(400.0, 595.0), Vec2::new(0.0, 150.0));
        assert!(!resolve_walls(&mut b, Vec2::new(800.0, 600.0), 1.0, false, &mut trail));

        b.active = false;
        assert!(resolve_walls(&mut b, Vec2::new(800.0, 600.0), 1.0, true, &mut trail));
        assert_eq!(b.pos.y, 590.0);
        assert_eq!(b.vel.y, -150.0);
        assert!(b.active);
    }

    fn paddle() -> Paddle {
        Paddle::centered(Vec2::new(800.0, 600.0), 100.0, 8.0)
    }

    #[test]
    fn test_paddle_center_bounce() {
        let p = paddle();
        let prev = Vec2::new(400.0, 530.0);
        let mut b = ball(Vec2::new(400.0, 545.0), Vec2::new(0.0, 150.0));
        let contact = resolve_paddle(&mut b, prev, &p, 1.0).unwrap();
        assert_eq!(contact, Vec2::new(400.0, 545.0));
        assert!(b.vel.x.is_sign_negative());
        assert!(b.vel.y < 0.0);
        assert!((b.vel.length() - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_edge_bounce_is_biased() {
        let p = paddle();
        // Right edge of the paddle (x = 450): dist < 0, goes right
        let mut b = ball(Vec2::new(450.0, 546.0), Vec2::new(-20.0, 150.0));
        resolve_paddle(&mut b, Vec2::new(452.0, 531.0), &p, 1.0).unwrap();
        assert!(b.vel.x > 0.0);
        assert!((b.vel.length() - b.initial_speed).abs() < 1e-3);

        let mut b = ball(Vec2::new(352.0, 546.0), Vec2::new(20.0, 150.0));
        resolve_paddle(&mut b, Vec2::new(350.0, 531.0), &p, 1.0).unwrap();
        assert!(b.vel.x < 0.0);
    }

    #[test]
    fn test_paddle_tunnel_back_solve() {
        let p = paddle();
        // From y = 500 to y = 600 in one tick, moving right 100
        let prev = Vec2::new(330.0, 500.0);
        let mut b = ball(Vec2::new(430.0, 600.0), Vec2::new(1000.0, 1000.0));
        let contact = resolve_paddle(&mut b, prev, &p, 1.0).unwrap();
        // Surface line y = 545 is crossed at 45% of the way
        assert!((contact - Vec2::new(375.0, 545.0)).length() < 1e-3);
        assert!(b.vel.y < 0.0);
        assert!((b.vel.length() - b.initial_speed).abs() < 1e-2);
    }

    #[test]
    fn test_paddle_misses() {
        let p = paddle();
        // Beside the paddle
        let mut b = ball(Vec2::new(200.0, 546.0), Vec2::new(0.0, 150.0));
        assert!(resolve_paddle(&mut b, Vec2::new(200.0, 531.0), &p, 1.0).is_none());
        // Rising through the paddle
        let mut b = ball(Vec2::new(400.0, 546.0), Vec2::new(0.0, -150.0));
        assert!(resolve_paddle(&mut b, Vec2::new(400.0, 561.0), &p, 1.0).is_none());
        // Already below the surface at the start of the tick
        let mut b = ball(Vec2::new(400.0, 560.0), Vec2::new(0.0, 150.0));
        assert!(resolve_paddle(&mut b, Vec2::new(400.0, 550.0), &p, 1.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_reflection_leaves_struck_edge(
            angle in 0.0f32..std::f32::consts::TAU,
            target_x in 80.0f32..160.0,
            target_y in 80.0f32..140.0,
        ) {
            // Every direction into brick (0, 0) from outside its hull
            let grid = grid_with(1, 1, &[(0, 0)], 1);
            let from = Vec2::new(120.0, 110.0) + Vec2::from_angle(angle) * 80.0;
            let to = Vec2::new(target_x, target_y);
            if let Some(hit) = detect_brick_hit(&grid, from, to, R, 1.0) {
                let dir = to - from;
                prop_assert!(
                    (dir * hit.axis).dot(hit.normal) >= -1e-3 * dir.length(),
                    "{:?} hit from {:?} reflects into the hull", hit.face, from
                );
            }
        }

        #[test]
        fn prop_brick_resolution_leaves_ball_outside_hulls(
            x in 60.0f32..460.0,
            y in 60.0f32..310.0,
            vx in -1000.0f32..1000.0,
            vy in -1000.0f32..1000.0,
            elapsed in 0.001f32..(1.0 / 30.0),
        ) {
            // Padding wider than the ball keeps neighbouring hulls apart
            let layout = GridLayout {
                padding: Vec2::new(30.0, 30.0),
                ..layout()
            };
            let mut grid = BrickGrid::empty(4, 5, layout);
            for r in 0..4 {
                for c in 0..5 {
                    grid.place(r, c, Brick::new(layout.cell_rect(r, c), 2, R, 1.0));
                }
            }
            let from = Vec2::new(x, y);
            prop_assume!(grid.iter().all(|(_, _, brick)| hull_clearance(brick, from) > 1e-2));

            let mut scoring = Scoring::new(true);
            let mut trail = DebugTrail::new(1.0);
            let vel = Vec2::new(vx, vy);
            let mut b = ball(from + vel * elapsed, vel);

            let hits = resolve_brick_hits(&mut b, from, elapsed, &mut grid, &mut scoring, 1.0, &mut trail);
            prop_assert!(hits < MAX_BRICK_HITS_PER_TICK);
            prop_assert_eq!(trail.hits.len(), hits);
            prop_assert!(b.pos.is_finite());
            prop_assert!((b.vel.length() - vel.length()).abs() <= vel.length() * 1e-4 + 1e-3);
            for (row, col, brick) in grid.iter().filter(|(_, _, brick)| brick.is_alive()) {
                prop_assert!(
                    hull_clearance(brick, b.pos) > -1e-3,
                    "ball ended at {:?} inside brick ({}, {})", b.pos, row, col
                );
            }
            if let Some(last) = trail.hits.last() {
                prop_assert!(b.vel.dot(last.normal) >= -1e-3 * vel.length().max(1.0));
            }
        }
    }
}
