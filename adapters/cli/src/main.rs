#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a scripted Arcshot scenario.

mod scenario;

use std::path::PathBuf;

use anyhow::{bail, Result};
use arcshot_core::{Command, Event};
use arcshot_world::{self as world, query, World, WorldConfig};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use crate::scenario::Scenario;

#[derive(Debug, Parser)]
#[command(
    name = "arcshot",
    about = "Runs a scripted projectile scenario against the authoritative world"
)]
struct Args {
    /// Path to the scenario TOML file.
    #[arg(long)]
    scenario: PathBuf,
    /// Overrides the number of ticks the scenario runs for.
    #[arg(long)]
    ticks: Option<u32>,
    /// Log output format; falls back to the LOG_FORMAT environment variable.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
    /// Logs every snapshot record sent to each observer.
    #[arg(long)]
    snapshots: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init(),
    }
}

/// Totals reported once the scenario finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RunSummary {
    ticks: u32,
    fired: u32,
    destroyed: u32,
    bounces: u32,
    explosions: u32,
    flashes: u32,
    hits: u32,
    kills: u32,
}

impl RunSummary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::ProjectileSpawned { .. } => self.fired += 1,
            Event::ProjectileDestroyed { .. } => self.destroyed += 1,
            Event::ProjectileBounced { .. } => self.bounces += 1,
            Event::ExplosionCreated { .. } => self.explosions += 1,
            Event::FlashCreated { .. } => self.flashes += 1,
            Event::DamageApplied { .. } => self.hits += 1,
            Event::CharacterKilled { .. } => self.kills += 1,
            _ => {}
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::ExplosionCreated {
            position, owner, ..
        } => info!(x = position.x, y = position.y, owner_id = owner.get(), "explosion"),
        Event::FlashCreated { position } => info!(x = position.x, y = position.y, "flash"),
        Event::DamageApplied {
            target,
            amount,
            attacker,
            ..
        } => info!(
            target_id = target.get(),
            attacker_id = attacker.get(),
            amount,
            "damage applied"
        ),
        Event::CharacterKilled {
            character, killer, ..
        } => info!(
            character_id = character.get(),
            killer_id = killer.get(),
            "character killed"
        ),
        Event::TimeAdvanced { .. } => {}
        other => debug!(event = ?other, "world event"),
    }
}

fn run(scenario: &Scenario, ticks: u32, log_snapshots: bool) -> Result<RunSummary> {
    let mut world = World::with_config(WorldConfig::new(scenario.tick_rate));
    let mut summary = RunSummary::default();
    let mut events = Vec::new();

    for command in scenario.setup_commands()? {
        world::apply(&mut world, command, &mut events);
    }
    for event in events.drain(..) {
        if let Event::TuningRejected { name, error } = event {
            bail!("tuning override `{name}` rejected: {error}");
        }
    }

    for _ in 0..ticks {
        let now = query::tick(&world);
        for shot in scenario.shots_at(now) {
            let launch = shot.launch(query::tuning(&world), scenario.tick_rate);
            world::apply(&mut world, Command::FireProjectile { launch }, &mut events);
        }
        world::apply(&mut world, Command::Tick, &mut events);

        for event in events.drain(..) {
            log_event(&event);
            summary.record(&event);
        }
        summary.ticks += 1;

        if log_snapshots {
            for observer in query::observers(&world) {
                for record in query::snapshots(&world, observer) {
                    info!(
                        tick = query::tick(&world).get(),
                        observer_id = observer.get(),
                        projectile_id = record.id.get(),
                        record = ?record.snapshot.to_ints(),
                        "snapshot"
                    );
                }
            }
        }
    }

    Ok(summary)
}

/// Entry point for the Arcshot command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format.unwrap_or_else(LogFormat::from_env));

    let scenario = Scenario::load(&args.scenario)?;
    let ticks = args.ticks.unwrap_or(scenario.ticks);
    info!(
        scenario = %args.scenario.display(),
        ticks,
        tick_rate = scenario.tick_rate,
        "running scenario"
    );

    let summary = run(&scenario, ticks, args.snapshots)?;
    info!(
        ticks = summary.ticks,
        fired = summary.fired,
        destroyed = summary.destroyed,
        bounces = summary.bounces,
        explosions = summary.explosions,
        flashes = summary.flashes,
        hits = summary.hits,
        kills = summary.kills,
        "scenario finished"
    );
    Ok(())
}
