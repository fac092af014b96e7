#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile entity simulated by the authoritative world.
//!
//! A [`Projectile`] never stores its current position. The position is always
//! re-derived from the trajectory basis (origin, direction, arc shape and the
//! tick the trajectory started at), which keeps the server's view of the curve
//! identical to the one clients rebuild from snapshots.

pub mod bounce;
pub mod presets;
pub mod trajectory;

use arcshot_core::{
    ArcShape, CharacterId, CharacterQuery, CollisionOracle, Event, Launch, ProjectileId,
    ProjectileKind, ProjectileSnapshot, SoundId, Tick, TickClock, TuningStore, Vec2, Viewpoint,
    Weapon,
};
use tracing::trace;

pub use presets::weapon_launch;
pub use trajectory::position_at;

/// Knockback magnitude used when a projectile carries no force of its own.
pub const MIN_FORCE: f32 = 0.001;

/// Scale applied to direction and shape values written into snapshots.
pub const SNAPSHOT_SCALE: f32 = 100.0;

/// Result of advancing a projectile by one tick.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was hit; the projectile keeps flying along its trajectory.
    Flying,
    /// The projectile deflected off solid geometry and keeps flying.
    Bounced,
    /// The projectile resolved its impact and must be removed from the world.
    Destroyed,
}

/// Moving projectile owned by a character.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    kind: ProjectileKind,
    origin: Vec2,
    direction: Vec2,
    spawn_tick: Tick,
    remaining_life: i32,
    owner: CharacterId,
    force: f32,
    damage: i32,
    explosive: bool,
    impact_sound: Option<SoundId>,
    weapon: Weapon,
    shape: ArcShape,
}

impl Projectile {
    /// Creates a projectile from launch parameters at `tick`.
    ///
    /// The arc shape is read from tuning exactly once; later tuning changes do
    /// not affect projectiles already in flight.
    #[must_use]
    pub fn launch<T>(id: ProjectileId, launch: &Launch, tick: Tick, tuning: &T) -> Self
    where
        T: TuningStore + ?Sized,
    {
        Self {
            id,
            kind: launch.kind,
            origin: launch.origin,
            direction: launch.direction,
            spawn_tick: tick,
            remaining_life: launch.life_span,
            owner: launch.owner,
            force: launch.force,
            damage: launch.damage,
            explosive: launch.explosive,
            impact_sound: launch.impact_sound,
            weapon: launch.weapon,
            shape: ArcShape::from_tuning(launch.kind, tuning),
        }
    }

    /// Identifier assigned by the world.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Kind of projectile.
    #[must_use]
    pub const fn kind(&self) -> ProjectileKind {
        self.kind
    }

    /// Origin of the current trajectory segment.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Launch direction of the current trajectory segment.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Tick the current trajectory segment started at.
    #[must_use]
    pub const fn spawn_tick(&self) -> Tick {
        self.spawn_tick
    }

    /// Ticks left before the projectile expires; negative once expired.
    #[must_use]
    pub const fn remaining_life(&self) -> i32 {
        self.remaining_life
    }

    /// Character that fired the projectile.
    #[must_use]
    pub const fn owner(&self) -> CharacterId {
        self.owner
    }

    /// Weapon credited with damage and explosions.
    #[must_use]
    pub const fn weapon(&self) -> Weapon {
        self.weapon
    }

    /// Whether an impact produces an area effect.
    #[must_use]
    pub const fn explosive(&self) -> bool {
        self.explosive
    }

    /// Current arc shape.
    #[must_use]
    pub const fn shape(&self) -> ArcShape {
        self.shape
    }

    /// Position on the current trajectory `seconds` after it started.
    #[must_use]
    pub fn position_at(&self, seconds: f32) -> Vec2 {
        position_at(self.origin, self.direction, self.shape, seconds)
    }

    /// Position on the trajectory at the tick the clock reads.
    #[must_use]
    pub fn position(&self, clock: TickClock) -> Vec2 {
        self.position_at(clock.seconds_since(self.spawn_tick, 0))
    }

    /// Advances the projectile to the tick the clock reads.
    ///
    /// The segment travelled since the previous tick is tested against solid
    /// geometry and then against characters other than the owner. Effects the
    /// impact causes are pushed onto `out_events`; the caller is responsible
    /// for removing the projectile when [`Outcome::Destroyed`] is returned.
    pub fn advance<C, Q>(
        &mut self,
        clock: TickClock,
        collision: &C,
        characters: &Q,
        out_events: &mut Vec<Event>,
    ) -> Outcome
    where
        C: CollisionOracle + ?Sized,
        Q: CharacterQuery + ?Sized,
    {
        let previous_time = clock.seconds_since(self.spawn_tick, -1);
        let current_time = clock.seconds_since(self.spawn_tick, 0);
        let previous = self.position_at(previous_time);
        let mut current = self.position_at(current_time);

        let collided = match collision.intersect_segment(previous, current) {
            Some(point) => {
                current = point;
                true
            }
            None => false,
        };

        let target = characters.nearest_character_on_segment(
            previous,
            current,
            self.kind.hit_radius(),
            Some(self.owner),
        );
        if let Some(hit) = target {
            current = hit.point;
        }

        self.remaining_life = self.remaining_life.saturating_sub(1);

        let triggered = target.is_some()
            || collided
            || self.remaining_life < 0
            || collision.outside_play_area(current);
        if !triggered {
            return Outcome::Flying;
        }

        if collided && self.kind.bounces() {
            self.bounce(clock, previous, current, current_time, collision);
            out_events.push(Event::ProjectileBounced {
                projectile: self.id,
                origin: self.origin,
                direction: self.direction,
                shape: self.shape,
            });
            if bounce::survives(self.shape) {
                return Outcome::Bounced;
            }
        }

        self.resolve_impact(current, target.map(|hit| hit.character), out_events);
        Outcome::Destroyed
    }

    /// Snapshot record for an observer looking from `viewpoint`.
    ///
    /// Returns `None` when the projectile's current position is outside the
    /// region the viewpoint covers.
    #[must_use]
    pub fn snapshot(&self, clock: TickClock, viewpoint: &Viewpoint) -> Option<ProjectileSnapshot> {
        if viewpoint.clips(self.position(clock)) {
            return None;
        }

        Some(ProjectileSnapshot {
            x: self.origin.x as i32,
            y: self.origin.y as i32,
            vel_x: (self.direction.x * SNAPSHOT_SCALE) as i32,
            vel_y: (self.direction.y * SNAPSHOT_SCALE) as i32,
            curvature: (self.shape.curvature * SNAPSHOT_SCALE) as i32,
            speed: (self.shape.speed * SNAPSHOT_SCALE) as i32,
            spawn_tick: self.spawn_tick.get(),
            kind: self.kind.wire_id(),
        })
    }

    fn bounce<C>(
        &mut self,
        clock: TickClock,
        previous: Vec2,
        current: Vec2,
        current_time: f32,
        collision: &C,
    ) where
        C: CollisionOracle + ?Sized,
    {
        let travelled = self.position_at(current_time) - previous;
        let blocked_vertically = collision
            .flags_at(Vec2::new(previous.x, current.y))
            .is_solid();
        let blocked_horizontally = collision
            .flags_at(Vec2::new(current.x, previous.y))
            .is_solid();
        let velocity = bounce::deflect(travelled, blocked_vertically, blocked_horizontally);

        self.origin = previous;
        // A zero velocity has no direction; keep flying the old way.
        self.direction = velocity.try_normalize().unwrap_or(self.direction);
        self.spawn_tick = clock.tick();
        self.shape = bounce::decay(self.shape);

        trace!(
            projectile_id = self.id.get(),
            tick = clock.tick().get(),
            speed = self.shape.speed,
            curvature = self.shape.curvature,
            "projectile bounced"
        );
    }

    fn resolve_impact(
        &self,
        position: Vec2,
        target: Option<CharacterId>,
        out_events: &mut Vec<Event>,
    ) {
        if self.remaining_life >= 0 || self.kind.always_sounds() {
            if let Some(sound) = self.impact_sound {
                out_events.push(Event::SoundPlayed { position, sound });
            }
        }

        if self.explosive && self.kind == ProjectileKind::Grenade {
            out_events.push(Event::ExplosionCreated {
                position,
                owner: self.owner,
                weapon: self.weapon,
                self_harmless: false,
            });
        } else if self.explosive && self.kind == ProjectileKind::FlashGrenade {
            out_events.push(Event::FlashCreated { position });
        } else if let Some(target) = target {
            out_events.push(Event::DamageApplied {
                target,
                force: self.direction * self.force.max(MIN_FORCE),
                amount: self.damage,
                attacker: self.owner,
                weapon: self.weapon,
            });
        }
    }
}
