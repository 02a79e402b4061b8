//! Collision hull for bricks
//!
//! A brick is collided against as an octagon: the brick rectangle grown by
//! the ball radius, with the four corners cut diagonally. Testing the ball's
//! *center* against this octagon approximates testing the ball's circle
//! against the real brick.
//!
//! Horizontally the radius is scaled by the world's horizontal ratio so the
//! footprint stays circular on a non-square display.
//!
//! Vertex layout (Y grows downward):
//!
//! ```text
//!        p0 _______ p7
//!        /           \
//!      p1             p6
//!      |    brick     |
//!      p2             p5
//!        \ _______ /
//!        p3        p4
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Number of hull vertices
pub const HULL_POINTS: usize = 8;

/// Which face of the brick a hull edge belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFace {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    BottomLeft,
    BottomRight,
    TopRight,
}

impl EdgeFace {
    /// Face of edge `i` (from `points[i]` to `points[(i + 1) % 8]`)
    pub fn of_edge(i: usize) -> Self {
        match i % HULL_POINTS {
            0 => EdgeFace::TopLeft,
            1 => EdgeFace::Left,
            2 => EdgeFace::BottomLeft,
            3 => EdgeFace::Bottom,
            4 => EdgeFace::BottomRight,
            5 => EdgeFace::Right,
            6 => EdgeFace::TopRight,
            _ => EdgeFace::Top,
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            EdgeFace::TopLeft | EdgeFace::BottomLeft | EdgeFace::BottomRight | EdgeFace::TopRight
        )
    }
}

/// Octagonal collision hull of one brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickCollision {
    pub points: [Vec2; HULL_POINTS],
    /// False once the owning brick is destroyed
    pub visible: bool,
}

impl BrickCollision {
    /// Build the hull for `rect` inflated by `radius` (X scaled by `ratio`)
    pub fn build(rect: Rect, radius: f32, ratio: f32) -> Self {
        let rx = radius * ratio;
        let size = rect.size;
        let mut points = [Vec2::ZERO; HULL_POINTS];
        points[0] = Vec2::new(rect.pos.x, rect.pos.y - radius);
        points[1] = points[0] + Vec2::new(-rx, radius);
        points[2] = points[1] + Vec2::new(0.0, size.y);
        points[3] = points[2] + Vec2::new(rx, radius);
        points[4] = points[3] + Vec2::new(size.x, 0.0);
        points[5] = points[4] + Vec2::new(rx, -radius);
        points[6] = points[5] + Vec2::new(0.0, -size.y);
        points[7] = points[6] + Vec2::new(-rx, -radius);
        Self {
            points,
            visible: true,
        }
    }

    /// Follow a horizontal ratio change without rebuilding.
    ///
    /// Only the side vertices move; top and bottom edges keep their X.
    pub fn rescale(&mut self, old_ratio: f32, new_ratio: f32, radius: f32) {
        let diff = radius * (old_ratio - new_ratio);
        self.points[1].x += diff;
        self.points[2].x += diff;
        self.points[5].x -= diff;
        self.points[6].x -= diff;
    }

    /// Endpoints of edge `i`
    #[inline]
    pub fn edge(&self, i: usize) -> (Vec2, Vec2) {
        (self.points[i % HULL_POINTS], self.points[(i + 1) % HULL_POINTS])
    }

    /// Outward normal of edge `i` (not normalized)
    #[inline]
    pub fn outward_normal(&self, i: usize) -> Vec2 {
        let (a, b) = self.edge(i);
        let d = b - a;
        Vec2::new(-d.y, d.x)
    }

    /// Project the hull into screen space
    pub fn screen_points(&self, world_to_screen: Vec2) -> [Vec2; HULL_POINTS] {
        self.points.map(|p| p * world_to_screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn brick_rect() -> Rect {
        Rect::new(Vec2::new(100.0, 50.0), Vec2::new(48.0, 20.0))
    }

    #[test]
    fn test_build_layout() {
        let hull = BrickCollision::build(brick_rect(), 10.0, 1.0);
        assert_eq!(hull.points[0], Vec2::new(100.0, 40.0));
        assert_eq!(hull.points[1], Vec2::new(90.0, 50.0));
        assert_eq!(hull.points[2], Vec2::new(90.0, 70.0));
        assert_eq!(hull.points[3], Vec2::new(100.0, 80.0));
        assert_eq!(hull.points[4], Vec2::new(148.0, 80.0));
        assert_eq!(hull.points[5], Vec2::new(158.0, 70.0));
        assert_eq!(hull.points[6], Vec2::new(158.0, 50.0));
        assert_eq!(hull.points[7], Vec2::new(148.0, 40.0));
        assert!(hull.visible);
    }

    #[test]
    fn test_outward_normals_point_away() {
        let hull = BrickCollision::build(brick_rect(), 10.0, 1.0);
        let center = brick_rect().center();
        for i in 0..HULL_POINTS {
            let (a, b) = hull.edge(i);
            let mid = (a + b) * 0.5;
            assert!(
                hull.outward_normal(i).dot(mid - center) > 0.0,
                "edge {} normal points inward",
                i
            );
        }
    }

    #[test]
    fn test_edge_faces() {
        assert_eq!(EdgeFace::of_edge(1), EdgeFace::Left);
        assert_eq!(EdgeFace::of_edge(5), EdgeFace::Right);
        assert_eq!(EdgeFace::of_edge(3), EdgeFace::Bottom);
        assert_eq!(EdgeFace::of_edge(7), EdgeFace::Top);
        assert!(EdgeFace::of_edge(0).is_corner());
        assert!(!EdgeFace::of_edge(7).is_corner());
    }

    #[test]
    fn test_rescale_moves_side_vertices_only() {
        let mut hull = BrickCollision::build(brick_rect(), 10.0, 1.0);
        let before = hull.clone();
        hull.rescale(1.0, 0.5, 10.0);
        for i in [0, 3, 4, 7] {
            assert_eq!(hull.points[i], before.points[i]);
        }
        assert_eq!(hull.points[1].x, 95.0);
        assert_eq!(hull.points[6].x, 153.0);
        assert_eq!(hull, BrickCollision::build(brick_rect(), 10.0, 0.5));
    }

    proptest! {
        #[test]
        fn prop_hull_sits_radius_outside_faces(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 1.0f32..200.0,
            h in 1.0f32..100.0,
            radius in 1.0f32..50.0,
            ratio in 0.25f32..4.0,
        ) {
            let rect = Rect::new(Vec2::new(x, y), Vec2::new(w, h));
            let hull = BrickCollision::build(rect, radius, ratio);
            let p = hull.points;
            let eps = 1e-3;
            let rx = radius * ratio;
            // Top and bottom vertices sit `radius` off their face
            prop_assert!((rect.min().y - p[0].y - radius).abs() < eps);
            prop_assert!((rect.min().y - p[7].y - radius).abs() < eps);
            prop_assert!((p[3].y - rect.max().y - radius).abs() < eps);
            prop_assert!((p[4].y - rect.max().y - radius).abs() < eps);
            // Side vertices sit `radius * ratio` off their face
            prop_assert!((rect.min().x - p[1].x - rx).abs() < eps);
            prop_assert!((rect.min().x - p[2].x - rx).abs() < eps);
            prop_assert!((p[5].x - rect.max().x - rx).abs() < eps);
            prop_assert!((p[6].x - rect.max().x - rx).abs() < eps);
        }

        #[test]
        fn prop_rescale_round_trip(
            radius in 1.0f32..50.0,
            a in 0.25f32..4.0,
            b in 0.25f32..4.0,
        ) {
            let original = BrickCollision::build(brick_rect(), radius, a);
            let mut hull = original.clone();
            hull.rescale(a, b, radius);
            hull.rescale(b, a, radius);
            for i in 0..HULL_POINTS {
                prop_assert!((hull.points[i] - original.points[i]).length() < 1e-3);
            }
        }
    }
}
