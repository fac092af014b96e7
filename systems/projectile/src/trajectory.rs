//! Parabolic trajectory evaluation.

use arcshot_core::{ArcShape, Vec2};

/// Divisor applied to the curvature coefficient before it bends the arc.
pub const CURVATURE_SCALE: f32 = 10_000.0;

/// Position on the arc launched from `origin` along `direction` after `seconds`.
///
/// Time is first scaled by the shape's speed, so the launch direction covers
/// `speed` units per second while the curvature term bends the path
/// quadratically along the positive y axis.
#[must_use]
pub fn position_at(origin: Vec2, direction: Vec2, shape: ArcShape, seconds: f32) -> Vec2 {
    let travel = seconds * shape.speed;
    Vec2::new(
        origin.x + direction.x * travel,
        origin.y + direction.y * travel + shape.curvature / CURVATURE_SCALE * (travel * travel),
    )
}
