#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Arcshot projectile simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the projectile system. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. The projectile system never reaches into global
//! state: collision geometry, characters and tuning are handed to it through
//! the [`CollisionOracle`], [`CharacterQuery`] and [`TuningStore`] traits.

pub mod collision;
pub mod tuning;

use serde::{Deserialize, Serialize};

pub use collision::{
    CharacterHit, CharacterQuery, CollisionFlags, CollisionOracle, MapError, Tile, TileLayer,
};
pub use glam::Vec2;
pub use tuning::{TuningError, TuningParam, TuningStore, TuningTable};

/// Number of simulation ticks per second used when no override is configured.
pub const DEFAULT_TICK_RATE: u32 = 50;

/// Largest horizontal offset from a viewpoint that still counts as visible.
pub const VIEW_HALF_WIDTH: f32 = 1000.0;

/// Largest vertical offset from a viewpoint that still counts as visible.
pub const VIEW_HALF_HEIGHT: f32 = 800.0;

/// Largest straight-line distance from a viewpoint that still counts as visible.
pub const VIEW_RADIUS: f32 = 1100.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the static collision geometry of the world.
    ConfigureMap {
        /// Parsed tile layer describing the new geometry.
        layer: TileLayer,
    },
    /// Overrides a single tuning parameter addressed by its canonical name.
    SetTuning {
        /// Canonical parameter name, for example `grenade_speed`.
        name: String,
        /// New value for the parameter.
        value: f32,
    },
    /// Places a damageable character into the world.
    SpawnCharacter {
        /// Identifier of the character to spawn.
        character: CharacterId,
        /// World-space position of the character's centre.
        position: Vec2,
    },
    /// Teleports an existing character to a new position.
    MoveCharacter {
        /// Identifier of the character to move.
        character: CharacterId,
        /// New world-space position of the character's centre.
        position: Vec2,
    },
    /// Creates a projectile from fully specified launch parameters.
    FireProjectile {
        /// Construction parameters for the projectile.
        launch: Launch,
    },
    /// Registers or updates the viewpoint used when snapshotting for an observer.
    SetViewpoint {
        /// Observer receiving snapshots.
        observer: ObserverId,
        /// Region of the world the observer is interested in.
        viewpoint: Viewpoint,
    },
    /// Removes an observer so it no longer receives snapshots.
    RemoveObserver {
        /// Observer to forget.
        observer: ObserverId,
    },
    /// Advances the simulation by exactly one tick.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick that became current.
        tick: Tick,
    },
    /// Confirms that new collision geometry was installed.
    MapConfigured {
        /// Width of the map measured in tiles.
        width: u32,
        /// Height of the map measured in tiles.
        height: u32,
    },
    /// Confirms that a tuning parameter was changed.
    TuningChanged {
        /// Parameter that changed.
        param: TuningParam,
        /// Value now stored for the parameter.
        value: f32,
    },
    /// Reports that a tuning override was rejected.
    TuningRejected {
        /// Name supplied in the rejected command.
        name: String,
        /// Reason the override failed.
        error: TuningError,
    },
    /// Confirms that a character entered the world.
    CharacterSpawned {
        /// Identifier of the character.
        character: CharacterId,
        /// Position the character occupies.
        position: Vec2,
    },
    /// Reports that a character's health was depleted.
    CharacterKilled {
        /// Character that died.
        character: CharacterId,
        /// Character credited with the kill.
        killer: CharacterId,
        /// Weapon that dealt the final blow.
        weapon: Weapon,
    },
    /// Confirms that a projectile was created.
    ProjectileSpawned {
        /// Identifier assigned to the projectile by the world.
        projectile: ProjectileId,
        /// Kind of projectile that was created.
        kind: ProjectileKind,
        /// Character that fired the projectile.
        owner: CharacterId,
    },
    /// Reports that a projectile deflected off solid geometry.
    ProjectileBounced {
        /// Projectile that bounced.
        projectile: ProjectileId,
        /// New trajectory origin.
        origin: Vec2,
        /// New unit launch direction.
        direction: Vec2,
        /// Trajectory shape after the bounce.
        shape: ArcShape,
    },
    /// Confirms that a projectile was removed from the world.
    ProjectileDestroyed {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
    },
    /// Requests that an impact sound be played at a position.
    SoundPlayed {
        /// Position of the sound source.
        position: Vec2,
        /// Sound to play.
        sound: SoundId,
    },
    /// Requests an area explosion.
    ExplosionCreated {
        /// Centre of the explosion.
        position: Vec2,
        /// Character credited with the explosion.
        owner: CharacterId,
        /// Weapon credited with the explosion.
        weapon: Weapon,
        /// Whether the explosion must not damage anyone.
        self_harmless: bool,
    },
    /// Requests a blinding flash effect.
    FlashCreated {
        /// Centre of the flash.
        position: Vec2,
    },
    /// Requests that damage be applied to a character.
    DamageApplied {
        /// Character receiving the damage.
        target: CharacterId,
        /// Knockback impulse applied to the character.
        force: Vec2,
        /// Health points removed.
        amount: i32,
        /// Character credited with the damage.
        attacker: CharacterId,
        /// Weapon credited with the damage.
        weapon: Weapon,
    },
}

/// Unique identifier assigned to a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(u32);

impl CharacterId {
    /// Creates a new character identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a client (or recorder) receiving snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObserverId(u32);

impl ObserverId {
    /// Creates a new observer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index into the client-side sound table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoundId(u32);

impl SoundId {
    /// Sound played when a grenade detonates.
    pub const GRENADE_EXPLODE: Self = Self(1);
    /// Sound played when a flash grenade goes off.
    pub const FLASH_GRENADE_POP: Self = Self(2);

    /// Creates a new sound identifier with the provided table index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the table index of the sound.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Discrete simulation step counter.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tick(i32);

impl Tick {
    /// Tick at which every world starts.
    pub const ZERO: Self = Self(0);

    /// Creates a tick from its raw counter value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the raw counter value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns the tick that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Current tick paired with the fixed tick rate, used to convert ticks to seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickClock {
    tick: Tick,
    tick_rate: u32,
}

impl TickClock {
    /// Creates a clock reading for the provided tick.
    #[must_use]
    pub const fn new(tick: Tick, tick_rate: u32) -> Self {
        Self { tick, tick_rate }
    }

    /// Tick the clock currently reads.
    #[must_use]
    pub const fn tick(&self) -> Tick {
        self.tick
    }

    /// Number of ticks simulated per second.
    #[must_use]
    pub const fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Seconds elapsed between `since` and the current tick shifted by `offset` ticks.
    ///
    /// A zero tick rate yields zero seconds.
    #[must_use]
    pub fn seconds_since(&self, since: Tick, offset: i32) -> f32 {
        if self.tick_rate == 0 {
            return 0.0;
        }
        let ticks = self.tick.get() - since.get() + offset;
        ticks as f32 / self.tick_rate as f32
    }
}

/// Weapons that may be credited with damage or explosions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weapon {
    /// Melee hammer.
    Hammer,
    /// Pistol firing single fast bullets.
    Gun,
    /// Shotgun firing short-lived pellets.
    Shotgun,
    /// Grenade launcher firing arcing explosives.
    Grenade,
    /// Hitscan laser rifle.
    Laser,
    /// Ninja dash.
    Ninja,
    /// Launcher for bouncing flash grenades.
    FlashGrenade,
}

impl Weapon {
    /// Index of the weapon in the client-side weapon table.
    #[must_use]
    pub const fn wire_id(self) -> i32 {
        match self {
            Self::Hammer => 0,
            Self::Gun => 1,
            Self::Shotgun => 2,
            Self::Grenade => 3,
            Self::Laser => 4,
            Self::Ninja => 5,
            Self::FlashGrenade => 6,
        }
    }
}

/// Types of moving projectiles simulated by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Fast, nearly straight bullet.
    Gun,
    /// Short-range pellet.
    Shotgun,
    /// Heavily arcing explosive.
    Grenade,
    /// Arcing grenade that bounces off walls before going off.
    FlashGrenade,
}

impl ProjectileKind {
    /// Every projectile kind in wire order.
    pub const ALL: [Self; 4] = [Self::Gun, Self::Shotgun, Self::Grenade, Self::FlashGrenade];

    /// Weapon that fires this kind of projectile.
    #[must_use]
    pub const fn weapon(self) -> Weapon {
        match self {
            Self::Gun => Weapon::Gun,
            Self::Shotgun => Weapon::Shotgun,
            Self::Grenade => Weapon::Grenade,
            Self::FlashGrenade => Weapon::FlashGrenade,
        }
    }

    /// Value written into the `kind` field of a snapshot record.
    #[must_use]
    pub const fn wire_id(self) -> i32 {
        self.weapon().wire_id()
    }

    /// Radius added to a character's proximity radius when testing for hits.
    #[must_use]
    pub const fn hit_radius(self) -> f32 {
        match self {
            Self::FlashGrenade => 8.0,
            Self::Gun | Self::Shotgun | Self::Grenade => 6.0,
        }
    }

    /// Whether the projectile deflects off solid geometry instead of impacting.
    #[must_use]
    pub const fn bounces(self) -> bool {
        matches!(self, Self::FlashGrenade)
    }

    /// Whether every trigger of this projectile plays its impact sound.
    ///
    /// Other kinds stay silent when they merely run out of life.
    #[must_use]
    pub const fn always_sounds(self) -> bool {
        matches!(self, Self::Grenade | Self::FlashGrenade)
    }

    /// Tuning parameters holding the curvature and speed of this kind.
    #[must_use]
    pub const fn shape_params(self) -> (TuningParam, TuningParam) {
        match self {
            Self::Gun => (TuningParam::GunCurvature, TuningParam::GunSpeed),
            Self::Shotgun => (TuningParam::ShotgunCurvature, TuningParam::ShotgunSpeed),
            Self::Grenade => (TuningParam::GrenadeCurvature, TuningParam::GrenadeSpeed),
            Self::FlashGrenade => (
                TuningParam::FlashGrenadeCurvature,
                TuningParam::FlashGrenadeSpeed,
            ),
        }
    }

    /// Tuning parameter holding the lifetime of this kind in seconds.
    #[must_use]
    pub const fn lifetime_param(self) -> TuningParam {
        match self {
            Self::Gun => TuningParam::GunLifetime,
            Self::Shotgun => TuningParam::ShotgunLifetime,
            Self::Grenade => TuningParam::GrenadeLifetime,
            Self::FlashGrenade => TuningParam::FlashGrenadeLifetime,
        }
    }
}

/// Shape coefficients of a projectile's parabolic arc.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcShape {
    /// Strength of the downward bend of the arc.
    pub curvature: f32,
    /// Distance covered per second along the launch direction.
    pub speed: f32,
}

impl ArcShape {
    /// Creates a new arc shape.
    #[must_use]
    pub const fn new(curvature: f32, speed: f32) -> Self {
        Self { curvature, speed }
    }

    /// Reads the arc shape configured for `kind` from the tuning store.
    #[must_use]
    pub fn from_tuning<T>(kind: ProjectileKind, tuning: &T) -> Self
    where
        T: TuningStore + ?Sized,
    {
        let (curvature, speed) = kind.shape_params();
        Self::new(tuning.get(curvature), tuning.get(speed))
    }
}

/// Construction parameters handed over by weapon-fire logic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    /// Kind of projectile to create.
    pub kind: ProjectileKind,
    /// Character firing the projectile.
    pub owner: CharacterId,
    /// World-space launch position.
    pub origin: Vec2,
    /// Launch direction, expected to be unit length.
    pub direction: Vec2,
    /// Number of ticks the projectile may fly before expiring.
    pub life_span: i32,
    /// Health points removed from a character on a direct hit.
    pub damage: i32,
    /// Whether an impact produces an area effect.
    pub explosive: bool,
    /// Knockback magnitude applied on a direct hit.
    pub force: f32,
    /// Sound played on impact, if any.
    pub impact_sound: Option<SoundId>,
    /// Weapon credited with damage and explosions.
    pub weapon: Weapon,
}

/// Region of the world an observer wants snapshots for.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewpoint {
    /// Sees every projectile, as a demo recorder does.
    Everything,
    /// Sees projectiles near the provided view position.
    At(Vec2),
}

impl Viewpoint {
    /// Reports whether `point` lies outside the region this viewpoint covers.
    #[must_use]
    pub fn clips(&self, point: Vec2) -> bool {
        match self {
            Self::Everything => false,
            Self::At(view) => {
                let offset = *view - point;
                if offset.x.abs() > VIEW_HALF_WIDTH || offset.y.abs() > VIEW_HALF_HEIGHT {
                    return true;
                }
                view.distance(point) > VIEW_RADIUS
            }
        }
    }
}

/// Fixed-layout network record describing one visible projectile.
///
/// Every field is truncated toward zero from the floating-point simulation
/// state. Clients re-evaluate the trajectory from `x`/`y`, the velocity,
/// shape coefficients and `spawn_tick`, so the record carries the trajectory
/// basis rather than the current position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Truncated x coordinate of the trajectory origin.
    pub x: i32,
    /// Truncated y coordinate of the trajectory origin.
    pub y: i32,
    /// Direction x component scaled by 100.
    pub vel_x: i32,
    /// Direction y component scaled by 100.
    pub vel_y: i32,
    /// Curvature scaled by 100.
    pub curvature: i32,
    /// Speed scaled by 100.
    pub speed: i32,
    /// Tick the trajectory time origin refers to.
    pub spawn_tick: i32,
    /// Wire identifier of the projectile kind.
    pub kind: i32,
}

impl ProjectileSnapshot {
    /// Number of integers in the wire layout.
    pub const FIELD_COUNT: usize = 8;

    /// Flattens the record into its eight-integer wire layout.
    #[must_use]
    pub const fn to_ints(&self) -> [i32; Self::FIELD_COUNT] {
        [
            self.x,
            self.y,
            self.vel_x,
            self.vel_y,
            self.curvature,
            self.speed,
            self.spawn_tick,
            self.kind,
        ]
    }
}
