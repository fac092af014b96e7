//! Launch parameters used by the stock weapons.

use arcshot_core::{CharacterId, Launch, ProjectileKind, SoundId, TuningStore, Vec2};

/// Builds the launch record the stock weapon of `kind` fires.
///
/// The lifetime is read from tuning in seconds and converted to whole ticks.
/// Every stock projectile deals one point of damage without knockback;
/// grenades and flash grenades are explosive and carry an impact sound.
#[must_use]
pub fn weapon_launch<T>(
    kind: ProjectileKind,
    owner: CharacterId,
    origin: Vec2,
    direction: Vec2,
    tuning: &T,
    tick_rate: u32,
) -> Launch
where
    T: TuningStore + ?Sized,
{
    let lifetime = tuning.get(kind.lifetime_param());
    let life_span = (tick_rate as f32 * lifetime) as i32;

    let (damage, explosive, impact_sound) = match kind {
        ProjectileKind::Gun | ProjectileKind::Shotgun => (1, false, None),
        ProjectileKind::Grenade => (1, true, Some(SoundId::GRENADE_EXPLODE)),
        ProjectileKind::FlashGrenade => (0, true, Some(SoundId::FLASH_GRENADE_POP)),
    };

    Launch {
        kind,
        owner,
        origin,
        direction,
        life_span,
        damage,
        explosive,
        force: 0.0,
        impact_sound,
        weapon: kind.weapon(),
    }
}
