//! Deflection rules for projectiles that bounce off solid geometry.

use arcshot_core::{ArcShape, Vec2};

/// Factor applied to the horizontal velocity on every bounce.
pub const HORIZONTAL_DAMPING: f32 = 0.75;

/// Factor applied to the curvature on every bounce.
pub const CURVATURE_GROWTH: f32 = 1.8;

/// Factor applied to the speed on every bounce.
pub const SPEED_DECAY: f32 = 0.7;

/// Post-bounce speed above which the projectile keeps flying.
pub const SURVIVAL_SPEED: f32 = 100.0;

/// Reflects `velocity` off the blocked axes and damps its horizontal component.
///
/// `blocked_vertically` is set when the probe that keeps the previous x but
/// moves to the new y is solid; `blocked_horizontally` is the mirrored probe.
#[must_use]
pub fn deflect(velocity: Vec2, blocked_vertically: bool, blocked_horizontally: bool) -> Vec2 {
    let mut deflected = velocity;
    if blocked_vertically {
        deflected.y = -deflected.y;
    }
    if blocked_horizontally {
        deflected.x = -deflected.x;
    }
    deflected.x *= HORIZONTAL_DAMPING;
    deflected
}

/// Shape of the arc after one more bounce.
#[must_use]
pub fn decay(shape: ArcShape) -> ArcShape {
    ArcShape::new(shape.curvature * CURVATURE_GROWTH, shape.speed * SPEED_DECAY)
}

/// Whether a freshly bounced projectile is still fast enough to keep flying.
#[must_use]
pub fn survives(shape: ArcShape) -> bool {
    shape.speed > SURVIVAL_SPEED
}
