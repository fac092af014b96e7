use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use arcshot_core::{
    CharacterId, Command, Launch, ObserverId, ProjectileKind, Tick, TileLayer, TuningStore, Vec2,
    Viewpoint, DEFAULT_TICK_RATE,
};
use arcshot_system_projectile::weapon_launch;
use serde::Deserialize;

const DEFAULT_TICKS: u32 = 250;

/// Scripted match loaded from a TOML file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Number of ticks to simulate.
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    /// Simulation ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// Collision geometry.
    pub map: MapSection,
    /// Tuning overrides addressed by canonical parameter name.
    #[serde(default)]
    pub tuning: BTreeMap<String, f32>,
    /// Characters present from the first tick.
    #[serde(default)]
    pub characters: Vec<CharacterEntry>,
    /// Observers that receive snapshots.
    #[serde(default)]
    pub observers: Vec<ObserverEntry>,
    /// Projectiles fired at scheduled ticks.
    #[serde(default)]
    pub shots: Vec<ShotEntry>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MapSection {
    /// Glyph rows, top to bottom.
    pub rows: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CharacterEntry {
    pub id: u32,
    pub position: Vec2,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ObserverEntry {
    pub id: u32,
    /// View position; observers without one see everything.
    #[serde(default)]
    pub view: Option<Vec2>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ShotEntry {
    /// Tick the shot is fired at, before that tick's successor is simulated.
    pub tick: i32,
    pub kind: ProjectileKind,
    pub owner: u32,
    pub origin: Vec2,
    /// Aim direction; normalized on load.
    pub direction: Vec2,
    #[serde(default)]
    pub damage: Option<i32>,
    #[serde(default)]
    pub force: Option<f32>,
    #[serde(default)]
    pub explosive: Option<bool>,
}

fn default_ticks() -> u32 {
    DEFAULT_TICKS
}

fn default_tick_rate() -> u32 {
    DEFAULT_TICK_RATE
}

impl Scenario {
    /// Reads and validates the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    /// Parses and validates a scenario from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let mut scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        if scenario.tick_rate == 0 {
            bail!("tick_rate must be positive");
        }
        for (index, shot) in scenario.shots.iter_mut().enumerate() {
            let Some(direction) = shot.direction.try_normalize() else {
                bail!("shot {index} has no usable direction");
            };
            shot.direction = direction;
        }
        scenario.shots.sort_by_key(|shot| shot.tick);
        Ok(scenario)
    }

    /// Commands that install the map, tuning, characters and observers.
    pub(crate) fn setup_commands(&self) -> Result<Vec<Command>> {
        let layer = TileLayer::parse(&self.map.rows).context("failed to parse scenario map")?;
        let mut commands = vec![Command::ConfigureMap { layer }];

        commands.extend(self.tuning.iter().map(|(name, value)| Command::SetTuning {
            name: name.clone(),
            value: *value,
        }));
        commands.extend(
            self.characters
                .iter()
                .map(|character| Command::SpawnCharacter {
                    character: CharacterId::new(character.id),
                    position: character.position,
                }),
        );
        commands.extend(self.observers.iter().map(|observer| Command::SetViewpoint {
            observer: ObserverId::new(observer.id),
            viewpoint: observer.view.map_or(Viewpoint::Everything, Viewpoint::At),
        }));

        Ok(commands)
    }

    /// Shots scheduled for `tick`.
    pub(crate) fn shots_at(&self, tick: Tick) -> impl Iterator<Item = &ShotEntry> {
        self.shots
            .iter()
            .filter(move |shot| shot.tick == tick.get())
    }
}

impl ShotEntry {
    /// Builds the launch record using the weapon preset and any overrides.
    pub(crate) fn launch<T>(&self, tuning: &T, tick_rate: u32) -> Launch
    where
        T: TuningStore + ?Sized,
    {
        let mut launch = weapon_launch(
            self.kind,
            CharacterId::new(self.owner),
            self.origin,
            self.direction,
            tuning,
            tick_rate,
        );
        if let Some(damage) = self.damage {
            launch.damage = damage;
        }
        if let Some(force) = self.force {
            launch.force = force;
        }
        if let Some(explosive) = self.explosive {
            launch.explosive = explosive;
        }
        launch
    }
}
