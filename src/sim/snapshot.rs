//! Read-only render view
//!
//! A renderer borrows a `Snapshot` after each tick. Everything is exposed
//! in world space and, where drawing needs it, in screen space using the
//! current display transform.

use glam::Vec2;

use super::aim::AimSegment;
use super::brick::{Brick, BrickKind};
use super::geometry::Rect;
use super::hull::HULL_POINTS;
use super::state::{Ball, Bonus, DebugHit, GamePhase, GameState};

/// A brick that is still drawn
#[derive(Debug, Clone, Copy)]
pub struct BrickView<'a> {
    pub row: usize,
    pub col: usize,
    pub brick: &'a Brick,
    /// Hull vertices in screen space
    pub hull: [Vec2; HULL_POINTS],
    /// Brick footprint in screen space
    pub rect: Rect,
}

impl BrickView<'_> {
    pub fn is_explosive(&self) -> bool {
        matches!(self.brick.kind, BrickKind::Explosive(_))
    }

    /// Caught in a blast and waiting for removal
    pub fn is_armed(&self) -> bool {
        self.brick.is_armed()
    }
}

/// Ball in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallView {
    pub center: Vec2,
    /// Per-axis radius (ellipse on a non-uniform display)
    pub radius: Vec2,
    pub resting: bool,
}

/// Debug hit with both coordinate systems
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitView {
    pub world: Vec2,
    pub screen: Vec2,
    pub normal: Vec2,
    /// Seconds since the hit
    pub age: f32,
}

/// Borrowed view of a `GameState`
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    state: &'a GameState,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { state: self }
    }
}

impl<'a> Snapshot<'a> {
    #[inline]
    fn to_screen(&self, p: Vec2) -> Vec2 {
        p * self.state.viewport.world_to_screen
    }

    fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::new(self.to_screen(rect.pos), self.to_screen(rect.size))
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.scoring.score
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score.best().max(self.state.scoring.score)
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    /// Current score multiplier
    pub fn multiplier(&self) -> u64 {
        self.state.scoring.multiplier()
    }

    pub fn world_size(&self) -> Vec2 {
        self.state.viewport.world_size
    }

    pub fn world_to_screen(&self) -> Vec2 {
        self.state.viewport.world_to_screen
    }

    /// Bricks whose hull is still visible, row-major
    pub fn bricks(&self) -> impl Iterator<Item = BrickView<'a>> + '_ {
        self.state
            .grid
            .iter()
            .filter(|(_, _, b)| b.collision.visible)
            .map(move |(row, col, brick)| BrickView {
                row,
                col,
                brick,
                hull: brick
                    .collision
                    .screen_points(self.state.viewport.world_to_screen),
                rect: self.rect_to_screen(brick.rect()),
            })
    }

    /// World-space balls
    pub fn balls(&self) -> &'a [Ball] {
        &self.state.balls
    }

    pub fn ball_views(&self) -> impl Iterator<Item = BallView> + '_ {
        let wts = self.state.viewport.world_to_screen;
        let ratio = self.state.viewport.to_horizontal_radius;
        self.state.balls.iter().map(move |ball| BallView {
            center: ball.pos * wts,
            radius: Vec2::new(ball.horizontal_radius(ratio) * wts.x, ball.radius * wts.y),
            resting: ball.on_start,
        })
    }

    /// Paddle rectangle in screen space
    pub fn paddle(&self) -> Rect {
        self.rect_to_screen(self.state.paddle.rect())
    }

    pub fn bonuses(&self) -> &'a [Bonus] {
        &self.state.bonuses
    }

    pub fn bonus_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.state.bonuses.iter().map(move |b| self.rect_to_screen(b.rect()))
    }

    pub fn debug_hits(&self) -> impl Iterator<Item = HitView> + '_ {
        self.state.trail.hits.iter().map(move |hit: &DebugHit| HitView {
            world: hit.pos,
            screen: self.to_screen(hit.pos),
            normal: hit.normal,
            age: hit.time,
        })
    }

    /// Aim segments in screen space
    pub fn aim_helpers(&self) -> impl Iterator<Item = AimSegment> + '_ {
        let wts = self.state.viewport.world_to_screen;
        self.state.aim_helpers.iter().map(move |a| a.to_screen(wts))
    }
}
