#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Arcshot projectile simulation.
//!
//! The world owns the collision map, the character roster, the tuning table
//! and every projectile in flight. Adapters drive it exclusively through
//! [`apply`] and read it through the [`query`] module.

pub mod map;
pub mod roster;

use std::collections::BTreeMap;

use arcshot_core::{
    Command, Event, ObserverId, ProjectileId, Tick, TickClock, TuningTable, Viewpoint,
    DEFAULT_TICK_RATE,
};
use arcshot_system_projectile::{Outcome, Projectile};
use tracing::{debug, info, warn};

use crate::{
    map::CollisionMap,
    roster::{DamageOutcome, Roster},
};

/// Runtime configuration that is fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    tick_rate: u32,
}

impl WorldConfig {
    /// Creates a configuration running at `tick_rate` ticks per second.
    #[must_use]
    pub const fn new(tick_rate: u32) -> Self {
        Self { tick_rate }
    }

    /// Number of simulation ticks per second.
    #[must_use]
    pub const fn tick_rate(&self) -> u32 {
        self.tick_rate
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE)
    }
}

/// Represents the authoritative simulation state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    map: CollisionMap,
    tuning: TuningTable,
    roster: Roster,
    projectiles: Vec<Projectile>,
    next_projectile: u32,
    tick: Tick,
    viewpoints: BTreeMap<ObserverId, Viewpoint>,
}

impl World {
    /// Creates an empty world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates an empty world using the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            map: CollisionMap::default(),
            tuning: TuningTable::default(),
            roster: Roster::default(),
            projectiles: Vec::new(),
            next_projectile: 1,
            tick: Tick::ZERO,
            viewpoints: BTreeMap::new(),
        }
    }

    fn clock(&self) -> TickClock {
        TickClock::new(self.tick, self.config.tick_rate)
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        id
    }

    /// Advances every live projectile once, in ascending id order.
    ///
    /// Damage is applied as soon as the projectile that caused it returns, so
    /// projectiles advanced later in the same tick see the updated roster.
    /// Destroyed projectiles are only removed once the pass completes.
    fn step_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let clock = self.clock();
        let mut destroyed: Vec<ProjectileId> = Vec::new();
        let mut effects: Vec<Event> = Vec::new();

        for projectile in &mut self.projectiles {
            let outcome = projectile.advance(clock, &self.map, &self.roster, &mut effects);

            for effect in effects.drain(..) {
                if let Event::DamageApplied {
                    target,
                    force,
                    amount,
                    attacker,
                    weapon,
                } = effect
                {
                    if self.roster.apply_damage(target, force, amount) == DamageOutcome::Killed {
                        info!(
                            character_id = target.get(),
                            killer_id = attacker.get(),
                            ?weapon,
                            "character killed"
                        );
                        out_events.push(effect);
                        out_events.push(Event::CharacterKilled {
                            character: target,
                            killer: attacker,
                            weapon,
                        });
                        continue;
                    }
                }
                out_events.push(effect);
            }

            match outcome {
                Outcome::Flying => {}
                Outcome::Bounced => debug!(
                    projectile_id = projectile.id().get(),
                    tick = clock.tick().get(),
                    speed = projectile.shape().speed,
                    "projectile bounced"
                ),
                Outcome::Destroyed => {
                    debug!(
                        projectile_id = projectile.id().get(),
                        kind = ?projectile.kind(),
                        tick = clock.tick().get(),
                        "projectile destroyed"
                    );
                    destroyed.push(projectile.id());
                    out_events.push(Event::ProjectileDestroyed {
                        projectile: projectile.id(),
                    });
                }
            }
        }

        if !destroyed.is_empty() {
            self.projectiles
                .retain(|projectile| !destroyed.contains(&projectile.id()));
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMap { layer } => {
            world.map = CollisionMap::from_layer(&layer);
            debug!(width = layer.width(), height = layer.height(), "map configured");
            out_events.push(Event::MapConfigured {
                width: layer.width(),
                height: layer.height(),
            });
        }
        Command::SetTuning { name, value } => match world.tuning.set(&name, value) {
            Ok(param) => {
                debug!(param = param.name(), value, "tuning changed");
                out_events.push(Event::TuningChanged { param, value });
            }
            Err(error) => {
                warn!(%name, %error, "tuning override rejected");
                out_events.push(Event::TuningRejected { name, error });
            }
        },
        Command::SpawnCharacter {
            character,
            position,
        } => {
            world.roster.spawn(character, position);
            out_events.push(Event::CharacterSpawned {
                character,
                position,
            });
        }
        Command::MoveCharacter {
            character,
            position,
        } => {
            if !world.roster.move_to(character, position) {
                debug!(character_id = character.get(), "move for unknown character ignored");
            }
        }
        Command::FireProjectile { launch } => {
            let id = world.allocate_projectile_id();
            let projectile = Projectile::launch(id, &launch, world.tick, &world.tuning);
            debug!(
                projectile_id = id.get(),
                kind = ?launch.kind,
                owner_id = launch.owner.get(),
                tick = world.tick.get(),
                "projectile spawned"
            );
            world.projectiles.push(projectile);
            out_events.push(Event::ProjectileSpawned {
                projectile: id,
                kind: launch.kind,
                owner: launch.owner,
            });
        }
        Command::SetViewpoint {
            observer,
            viewpoint,
        } => {
            let _ = world.viewpoints.insert(observer, viewpoint);
        }
        Command::RemoveObserver { observer } => {
            let _ = world.viewpoints.remove(&observer);
        }
        Command::Tick => {
            world.tick = world.tick.next();
            out_events.push(Event::TimeAdvanced { tick: world.tick });
            world.step_projectiles(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use arcshot_core::{
        CharacterId, ObserverId, ProjectileId, ProjectileSnapshot, Tick, TuningTable, Vec2,
        Viewpoint,
    };
    use arcshot_system_projectile::Projectile;

    use super::{map::CollisionMap, World, WorldConfig};

    /// Current simulation tick.
    #[must_use]
    pub fn tick(world: &World) -> Tick {
        world.tick
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> WorldConfig {
        world.config
    }

    /// Tuning values applied to newly fired projectiles.
    #[must_use]
    pub fn tuning(world: &World) -> &TuningTable {
        &world.tuning
    }

    /// Collision geometry currently installed.
    #[must_use]
    pub fn collision_map(world: &World) -> &CollisionMap {
        &world.map
    }

    /// Projectiles in flight, in ascending id order.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        &world.projectiles
    }

    /// Projectile carrying the provided identifier, if it is still in flight.
    #[must_use]
    pub fn projectile(world: &World, id: ProjectileId) -> Option<&Projectile> {
        world
            .projectiles
            .iter()
            .find(|projectile| projectile.id() == id)
    }

    /// Captures the live characters in ascending id order.
    #[must_use]
    pub fn characters(world: &World) -> Vec<CharacterSnapshot> {
        world
            .roster
            .iter()
            .map(|(id, state)| CharacterSnapshot {
                id,
                position: state.position(),
                velocity: state.velocity(),
                health: state.health(),
            })
            .collect()
    }

    /// Observers currently registered for snapshots, in ascending id order.
    #[must_use]
    pub fn observers(world: &World) -> Vec<ObserverId> {
        world.viewpoints.keys().copied().collect()
    }

    /// Snapshot records of every projectile visible to `observer`.
    ///
    /// Unknown observers receive nothing.
    #[must_use]
    pub fn snapshots(world: &World, observer: ObserverId) -> Vec<ProjectileRecord> {
        world
            .viewpoints
            .get(&observer)
            .map(|viewpoint| snapshots_from(world, viewpoint))
            .unwrap_or_default()
    }

    /// Snapshot records of every projectile visible from `viewpoint`.
    #[must_use]
    pub fn snapshots_from(world: &World, viewpoint: &Viewpoint) -> Vec<ProjectileRecord> {
        let clock = world.clock();
        world
            .projectiles
            .iter()
            .filter_map(|projectile| {
                projectile
                    .snapshot(clock, viewpoint)
                    .map(|snapshot| ProjectileRecord {
                        id: projectile.id(),
                        snapshot,
                    })
            })
            .collect()
    }

    /// Read-only description of a live character.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct CharacterSnapshot {
        /// Identifier of the character.
        pub id: CharacterId,
        /// Centre of the character's body.
        pub position: Vec2,
        /// Knockback accumulated from hits.
        pub velocity: Vec2,
        /// Remaining health points.
        pub health: i32,
    }

    /// Snapshot record tagged with the projectile it describes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ProjectileRecord {
        /// Projectile the record describes.
        pub id: ProjectileId,
        /// Wire record sent to the observer.
        pub snapshot: ProjectileSnapshot,
    }
}
