//! Paddle bounce angle and predictive aim ray
//!
//! Neither function touches bricks. The bounce is the classic arcade
//! steering rule, not a physical reflection.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::consts::{MIN_BOUNCE_ANGLE, VELOCITY_EPSILON};

/// Relaunch velocity off the paddle.
///
/// `dist` is `paddle_center_x - contact_x`, so positive means the ball
/// landed left of center. The angle is measured from the horizontal: the
/// center gives a steep shot, the edges a shallow one (never below
/// `MIN_BOUNCE_ANGLE`). The result is not normalized.
pub fn bounce_vector(speed: f32, width: f32, dist: f32) -> Vec2 {
    let half = width * 0.5;
    let angle = ((1.0 - dist.abs() / half) * FRAC_PI_2).abs().max(MIN_BOUNCE_ANGLE);
    let cos2 = angle.cos() * angle.cos();
    let sin2 = angle.sin() * angle.sin();
    let x = if dist >= 0.0 { -cos2 } else { cos2 };
    Vec2::new(x, -sin2) * speed
}

/// Straight-line path of a ball to its next wall or paddle contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimSegment {
    pub from: Vec2,
    pub to: Vec2,
    pub radius: f32,
}

impl AimSegment {
    pub fn to_screen(&self, world_to_screen: Vec2) -> AimSegment {
        AimSegment {
            from: self.from * world_to_screen,
            to: self.to * world_to_screen,
            radius: self.radius * world_to_screen.y,
        }
    }
}

/// Static world description the aim ray needs
#[derive(Debug, Clone, Copy)]
pub struct AimBounds {
    pub world_size: Vec2,
    /// Paddle top line (Y of the paddle surface)
    pub paddle_top: f32,
    /// Paddle X span (left, right)
    pub paddle_span: (f32, f32),
    /// Ball radius
    pub radius: f32,
    /// Horizontal radius ratio
    pub ratio: f32,
}

impl AimBounds {
    #[inline]
    fn left(&self) -> f32 {
        self.radius * self.ratio
    }

    #[inline]
    fn right(&self) -> f32 {
        self.world_size.x - self.radius * self.ratio
    }

    #[inline]
    fn top(&self) -> f32 {
        self.radius
    }

    #[inline]
    fn bottom(&self) -> f32 {
        self.world_size.y - self.radius
    }

    /// Y at which a falling ball would touch the paddle
    #[inline]
    fn paddle_line(&self) -> f32 {
        self.paddle_top - self.radius
    }

    #[inline]
    fn over_paddle(&self, x: f32) -> bool {
        let rx = self.radius * self.ratio;
        x + rx >= self.paddle_span.0 && x - rx <= self.paddle_span.1
    }
}

/// Next point the ball would strike a wall or the paddle, ignoring bricks
pub fn aim_point(pos: Vec2, vel: Vec2, bounds: &AimBounds) -> Vec2 {
    let still_x = vel.x.abs() < VELOCITY_EPSILON;
    let still_y = vel.y.abs() < VELOCITY_EPSILON;

    if still_x && still_y {
        return pos;
    }

    if still_x {
        // Straight up or down
        let y = if vel.y < 0.0 {
            bounds.top()
        } else if bounds.over_paddle(pos.x) && pos.y <= bounds.paddle_line() {
            bounds.paddle_line()
        } else {
            bounds.bottom()
        };
        return Vec2::new(pos.x, y);
    }

    if still_y {
        let x = if vel.x < 0.0 { bounds.left() } else { bounds.right() };
        return Vec2::new(x, pos.y);
    }

    let x_at = |y: f32| pos.x + (y - pos.y) * vel.x / vel.y;
    let y_at = |x: f32| pos.y + (x - pos.x) * vel.y / vel.x;

    let mut target = if vel.y < 0.0 {
        let y = bounds.top();
        Vec2::new(x_at(y), y)
    } else {
        let y = bounds.paddle_line();
        let x = x_at(y);
        if pos.y <= y && bounds.over_paddle(x) {
            Vec2::new(x, y)
        } else {
            let y = bounds.bottom();
            Vec2::new(x_at(y), y)
        }
    };

    if target.x < bounds.left() || target.x > bounds.right() {
        let wall_x = if vel.x < 0.0 { bounds.left() } else { bounds.right() };
        target = Vec2::new(wall_x, y_at(wall_x));
    }

    target
}

/// Aim segment from the ball's current position
pub fn aim_segment(pos: Vec2, vel: Vec2, bounds: &AimBounds) -> AimSegment {
    AimSegment {
        from: pos,
        to: aim_point(pos, vel, bounds),
        radius: bounds.radius,
    }
}
