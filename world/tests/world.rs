use arcshot_core::{
    CharacterId, Command, Event, Launch, ObserverId, ProjectileKind, SoundId, Tick, TileLayer,
    TuningParam, Vec2, Viewpoint,
};
use arcshot_system_projectile::weapon_launch;
use arcshot_world::{self as world, map::tile_coord, query, World};

const SHOOTER: CharacterId = CharacterId::new(1);
const TARGET: CharacterId = CharacterId::new(2);

fn arena(columns: usize, rows: usize) -> TileLayer {
    let mut lines = Vec::with_capacity(rows);
    for row in 0..rows {
        if row == 0 || row + 1 == rows {
            lines.push("#".repeat(columns));
        } else {
            lines.push(format!("#{}#", ".".repeat(columns - 2)));
        }
    }
    TileLayer::parse(&lines).expect("arena rows are uniform")
}

fn world_with_arena() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureMap {
            layer: arena(40, 20),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnCharacter {
            character: SHOOTER,
            position: Vec2::new(200.0, 160.0),
        },
        &mut events,
    );
    world
}

fn launch(world: &World, kind: ProjectileKind, origin: Vec2) -> Launch {
    weapon_launch(
        kind,
        SHOOTER,
        origin,
        Vec2::X,
        query::tuning(world),
        query::config(world).tick_rate(),
    )
}

fn fire(world: &mut World, launch: Launch) {
    let mut events = Vec::new();
    world::apply(world, Command::FireProjectile { launch }, &mut events);
}

fn run_ticks(world: &mut World, ticks: u32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        world::apply(world, Command::Tick, &mut events);
    }
    events
}

#[test]
fn gun_bullet_damages_and_pushes_the_target() {
    let mut world = world_with_arena();
    let mut setup = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnCharacter {
            character: TARGET,
            position: Vec2::new(300.0, 160.0),
        },
        &mut setup,
    );
    let bullet = launch(&world, ProjectileKind::Gun, Vec2::new(200.0, 160.0));
    fire(&mut world, bullet);

    let events = run_ticks(&mut world, 5);

    let damage: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::DamageApplied { .. }))
        .collect();
    assert_eq!(damage.len(), 1, "events: {events:?}");
    assert!(matches!(
        damage[0],
        Event::DamageApplied {
            target: TARGET,
            amount: 1,
            attacker: SHOOTER,
            ..
        }
    ));
    assert!(query::projectiles(&world).is_empty());

    let target = query::characters(&world)
        .into_iter()
        .find(|character| character.id == TARGET)
        .expect("target survives a single bullet");
    assert_eq!(target.health, 9);
    assert!((target.velocity.x - 0.001).abs() < 1e-6);
}

#[test]
fn later_projectiles_see_kills_from_the_same_tick() {
    let mut world = world_with_arena();
    let mut setup = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnCharacter {
            character: TARGET,
            position: Vec2::new(300.0, 160.0),
        },
        &mut setup,
    );
    for _ in 0..11 {
        let bullet = launch(&world, ProjectileKind::Gun, Vec2::new(200.0, 160.0));
        fire(&mut world, bullet);
    }

    let events = run_ticks(&mut world, 2);

    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::DamageApplied { .. }))
        .count();
    let kills: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::CharacterKilled { .. }))
        .collect();
    assert_eq!(hits, 10);
    assert_eq!(
        kills,
        vec![&Event::CharacterKilled {
            character: TARGET,
            killer: SHOOTER,
            weapon: arcshot_core::Weapon::Gun,
        }]
    );
    let survivors: Vec<u32> = query::projectiles(&world)
        .iter()
        .map(|projectile| projectile.id().get())
        .collect();
    assert_eq!(survivors, vec![11]);
    assert!(query::characters(&world)
        .iter()
        .all(|character| character.id != TARGET));
}

#[test]
fn grenade_explodes_on_the_floor() {
    let mut world = world_with_arena();
    let grenade = launch(&world, ProjectileKind::Grenade, Vec2::new(200.0, 160.0));
    fire(&mut world, grenade);

    let events = run_ticks(&mut world, 60);

    let explosions: Vec<Vec2> = events
        .iter()
        .filter_map(|event| match event {
            Event::ExplosionCreated { position, .. } => Some(*position),
            _ => None,
        })
        .collect();
    assert_eq!(explosions.len(), 1, "events: {events:?}");
    assert_eq!(tile_coord(explosions[0].y), 19);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::SoundPlayed { sound, .. } if *sound == SoundId::GRENADE_EXPLODE
    )));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileDestroyed { .. })));
    assert!(query::projectiles(&world).is_empty());
}

#[test]
fn flash_grenade_bounces_before_it_goes_off() {
    let mut world = world_with_arena();
    let flash = launch(&world, ProjectileKind::FlashGrenade, Vec2::new(200.0, 160.0));
    fire(&mut world, flash);

    let events = run_ticks(&mut world, 120);

    let bounces: Vec<Vec2> = events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileBounced { direction, .. } => Some(*direction),
            _ => None,
        })
        .collect();
    assert!(!bounces.is_empty(), "flash grenade never bounced");
    for direction in &bounces {
        assert!((direction.length() - 1.0).abs() < 1e-4);
    }
    let flashes = events
        .iter()
        .filter(|event| matches!(event, Event::FlashCreated { .. }))
        .count();
    assert_eq!(flashes, 1);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::SoundPlayed { sound, .. } if *sound == SoundId::FLASH_GRENADE_POP
    )));
    assert!(query::projectiles(&world).is_empty());
}

#[test]
fn projectiles_leaving_the_play_area_are_discarded() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureMap {
            layer: TileLayer::open(3, 3),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SetTuning {
            name: "gun_speed".to_owned(),
            value: 10_000.0,
        },
        &mut events,
    );
    let bullet = launch(&world, ProjectileKind::Gun, Vec2::new(48.0, 48.0));
    fire(&mut world, bullet);

    let mut destroyed_at = None;
    for _ in 0..40 {
        let mut tick_events = Vec::new();
        world::apply(&mut world, Command::Tick, &mut tick_events);
        if tick_events
            .iter()
            .any(|event| matches!(event, Event::ProjectileDestroyed { .. }))
        {
            destroyed_at = Some(query::tick(&world));
            break;
        }
    }

    assert_eq!(destroyed_at, Some(Tick::new(33)));
}

#[test]
fn tuning_changes_only_affect_new_projectiles() {
    let mut world = world_with_arena();
    let first = launch(&world, ProjectileKind::Grenade, Vec2::new(200.0, 160.0));
    fire(&mut world, first);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetTuning {
            name: TuningParam::GrenadeSpeed.name().to_owned(),
            value: 1500.0,
        },
        &mut events,
    );
    let second = launch(&world, ProjectileKind::Grenade, Vec2::new(200.0, 160.0));
    fire(&mut world, second);

    let speeds: Vec<f32> = query::projectiles(&world)
        .iter()
        .map(|projectile| projectile.shape().speed)
        .collect();
    assert_eq!(speeds, vec![1000.0, 1500.0]);
}

#[test]
fn snapshots_are_filtered_per_observer() {
    let mut world = world_with_arena();
    let mut events = Vec::new();
    let recorder = ObserverId::new(1);
    let nearby = ObserverId::new(2);
    let far_away = ObserverId::new(3);
    for (observer, viewpoint) in [
        (recorder, Viewpoint::Everything),
        (nearby, Viewpoint::At(Vec2::new(250.0, 160.0))),
        (far_away, Viewpoint::At(Vec2::new(4000.0, 160.0))),
    ] {
        world::apply(
            &mut world,
            Command::SetViewpoint {
                observer,
                viewpoint,
            },
            &mut events,
        );
    }
    let grenade = launch(&world, ProjectileKind::Grenade, Vec2::new(200.0, 160.0));
    fire(&mut world, grenade);
    let _ = run_ticks(&mut world, 3);

    let seen = query::snapshots(&world, recorder);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].snapshot.kind, 3);
    assert_eq!(seen[0].snapshot.spawn_tick, 0);
    assert_eq!((seen[0].snapshot.x, seen[0].snapshot.y), (200, 160));
    assert_eq!(query::snapshots(&world, nearby), seen);
    assert!(query::snapshots(&world, far_away).is_empty());
    assert!(query::snapshots(&world, ObserverId::new(99)).is_empty());
}
