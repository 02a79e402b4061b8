//! 2D geometry primitives
//!
//! Everything works in world space with Y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Smallest rectangle containing both points
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            pos: min,
            size: max - min,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Grow by `amount` on every side (per axis)
    pub fn inflate(&self, amount: Vec2) -> Self {
        Self {
            pos: self.pos - amount,
            size: self.size + amount * 2.0,
        }
    }

    /// Overlap test; touching edges count as overlapping
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && b_min.x <= a_max.x && a_min.y <= b_max.y && b_min.y <= a_max.y
    }
}

/// Squared distance between two points
#[inline]
pub fn quadratic_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance_squared(b)
}

/// Intersection of two segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub point: Vec2,
    /// Parameter along the first segment (0 = start, 1 = end)
    pub t: f32,
    /// Parameter along the second segment
    pub u: f32,
}

/// Intersect the lines through `a0 -> a1` and `b0 -> b1`.
///
/// Returns `None` for parallel (or degenerate) lines. The parameters are not
/// range checked; callers decide which spans they accept.
pub fn line_intersection(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<SegmentHit> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.perp_dot(s);
    if denom.abs() < f32::EPSILON {
        return None;
    }
    let qp = b0 - a0;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    Some(SegmentHit {
        point: a0 + r * t,
        t,
        u,
    })
}

/// Intersect two segments, both parameters restricted to [0, 1]
pub fn segment_intersection(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<SegmentHit> {
    line_intersection(a0, a1, b0, b1)
        .filter(|hit| (0.0..=1.0).contains(&hit.t) && (0.0..=1.0).contains(&hit.u))
}
