//! Named gameplay tuning parameters.
//!
//! Keep this separate from runtime configuration such as the tick rate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunable parameters read by the projectile system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningParam {
    /// Arc bend of gun bullets.
    GunCurvature,
    /// Travel speed of gun bullets.
    GunSpeed,
    /// Lifetime of gun bullets in seconds.
    GunLifetime,
    /// Arc bend of shotgun pellets.
    ShotgunCurvature,
    /// Travel speed of shotgun pellets.
    ShotgunSpeed,
    /// Lifetime of shotgun pellets in seconds.
    ShotgunLifetime,
    /// Arc bend of grenades.
    GrenadeCurvature,
    /// Travel speed of grenades.
    GrenadeSpeed,
    /// Lifetime of grenades in seconds.
    GrenadeLifetime,
    /// Initial arc bend of flash grenades.
    FlashGrenadeCurvature,
    /// Initial travel speed of flash grenades.
    FlashGrenadeSpeed,
    /// Lifetime of flash grenades in seconds.
    FlashGrenadeLifetime,
}

impl TuningParam {
    /// Every tuning parameter in declaration order.
    pub const ALL: [Self; 12] = [
        Self::GunCurvature,
        Self::GunSpeed,
        Self::GunLifetime,
        Self::ShotgunCurvature,
        Self::ShotgunSpeed,
        Self::ShotgunLifetime,
        Self::GrenadeCurvature,
        Self::GrenadeSpeed,
        Self::GrenadeLifetime,
        Self::FlashGrenadeCurvature,
        Self::FlashGrenadeSpeed,
        Self::FlashGrenadeLifetime,
    ];

    /// Canonical name used by configuration files and console commands.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GunCurvature => "gun_curvature",
            Self::GunSpeed => "gun_speed",
            Self::GunLifetime => "gun_lifetime",
            Self::ShotgunCurvature => "shotgun_curvature",
            Self::ShotgunSpeed => "shotgun_speed",
            Self::ShotgunLifetime => "shotgun_lifetime",
            Self::GrenadeCurvature => "grenade_curvature",
            Self::GrenadeSpeed => "grenade_speed",
            Self::GrenadeLifetime => "grenade_lifetime",
            Self::FlashGrenadeCurvature => "flash_grenade_curvature",
            Self::FlashGrenadeSpeed => "flash_grenade_speed",
            Self::FlashGrenadeLifetime => "flash_grenade_lifetime",
        }
    }

    /// Looks a parameter up by its canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.name() == name)
    }
}

/// Source of tuning values.
pub trait TuningStore {
    /// Current value of `param`.
    fn get(&self, param: TuningParam) -> f32;
}

/// Reasons a tuning override may be rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TuningError {
    /// No parameter carries the provided name.
    #[error("unknown tuning parameter `{0}`")]
    UnknownParam(String),
    /// The value is NaN or infinite.
    #[error("tuning parameter `{0}` must be finite")]
    NonFinite(&'static str),
}

/// Table of tuning values with the stock defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningTable {
    gun_curvature: f32,
    gun_speed: f32,
    gun_lifetime: f32,
    shotgun_curvature: f32,
    shotgun_speed: f32,
    shotgun_lifetime: f32,
    grenade_curvature: f32,
    grenade_speed: f32,
    grenade_lifetime: f32,
    flash_grenade_curvature: f32,
    flash_grenade_speed: f32,
    flash_grenade_lifetime: f32,
}

impl Default for TuningTable {
    fn default() -> Self {
        Self {
            gun_curvature: 1.25,
            gun_speed: 2200.0,
            gun_lifetime: 2.0,
            shotgun_curvature: 1.25,
            shotgun_speed: 2750.0,
            shotgun_lifetime: 0.2,
            grenade_curvature: 7.0,
            grenade_speed: 1000.0,
            grenade_lifetime: 2.0,
            flash_grenade_curvature: 7.0,
            flash_grenade_speed: 1000.0,
            flash_grenade_lifetime: 2.0,
        }
    }
}

impl TuningTable {
    /// Current value of `param`.
    #[must_use]
    pub fn value(&self, param: TuningParam) -> f32 {
        *self.slot(param)
    }

    /// Overrides the parameter addressed by `name`, returning which parameter changed.
    pub fn set(&mut self, name: &str, value: f32) -> Result<TuningParam, TuningError> {
        let param = TuningParam::from_name(name)
            .ok_or_else(|| TuningError::UnknownParam(name.to_owned()))?;
        if !value.is_finite() {
            return Err(TuningError::NonFinite(param.name()));
        }
        *self.slot_mut(param) = value;
        Ok(param)
    }

    fn slot(&self, param: TuningParam) -> &f32 {
        match param {
            TuningParam::GunCurvature => &self.gun_curvature,
            TuningParam::GunSpeed => &self.gun_speed,
            TuningParam::GunLifetime => &self.gun_lifetime,
            TuningParam::ShotgunCurvature => &self.shotgun_curvature,
            TuningParam::ShotgunSpeed => &self.shotgun_speed,
            TuningParam::ShotgunLifetime => &self.shotgun_lifetime,
            TuningParam::GrenadeCurvature => &self.grenade_curvature,
            TuningParam::GrenadeSpeed => &self.grenade_speed,
            TuningParam::GrenadeLifetime => &self.grenade_lifetime,
            TuningParam::FlashGrenadeCurvature => &self.flash_grenade_curvature,
            TuningParam::FlashGrenadeSpeed => &self.flash_grenade_speed,
            TuningParam::FlashGrenadeLifetime => &self.flash_grenade_lifetime,
        }
    }

    fn slot_mut(&mut self, param: TuningParam) -> &mut f32 {
        match param {
            TuningParam::GunCurvature => &mut self.gun_curvature,
            TuningParam::GunSpeed => &mut self.gun_speed,
            TuningParam::GunLifetime => &mut self.gun_lifetime,
            TuningParam::ShotgunCurvature => &mut self.shotgun_curvature,
            TuningParam::ShotgunSpeed => &mut self.shotgun_speed,
            TuningParam::ShotgunLifetime => &mut self.shotgun_lifetime,
            TuningParam::GrenadeCurvature => &mut self.grenade_curvature,
            TuningParam::GrenadeSpeed => &mut self.grenade_speed,
            TuningParam::GrenadeLifetime => &mut self.grenade_lifetime,
            TuningParam::FlashGrenadeCurvature => &mut self.flash_grenade_curvature,
            TuningParam::FlashGrenadeSpeed => &mut self.flash_grenade_speed,
            TuningParam::FlashGrenadeLifetime => &mut self.flash_grenade_lifetime,
        }
    }
}

impl TuningStore for TuningTable {
    fn get(&self, param: TuningParam) -> f32 {
        self.value(param)
    }
}
