#![allow(dead_code)]

use std::cell::Cell;

use arcshot_core::{
    CharacterHit, CharacterId, CharacterQuery, CollisionFlags, CollisionOracle, Launch,
    ProjectileId, ProjectileKind, SoundId, Tick, TuningTable, Vec2,
};
use arcshot_system_projectile::Projectile;

pub const TICK_RATE: u32 = 50;
pub const OWNER: CharacterId = CharacterId::new(7);
pub const VICTIM: CharacterId = CharacterId::new(9);
pub const IMPACT: SoundId = SoundId::new(42);

/// How the scripted world answers segment intersection queries.
#[derive(Clone, Copy, Debug)]
pub enum WallHit {
    Never,
    Midpoint,
    At(Vec2),
}

/// Collision oracle and character query with fully scripted answers.
pub struct ScriptedWorld {
    pub wall_hit: WallHit,
    pub solid_probes: Vec<Vec2>,
    pub outside: bool,
    pub character: Option<CharacterId>,
    pub last_radius: Cell<Option<f32>>,
    pub last_excluded: Cell<Option<CharacterId>>,
}

impl ScriptedWorld {
    pub fn open() -> Self {
        Self {
            wall_hit: WallHit::Never,
            solid_probes: Vec::new(),
            outside: false,
            character: None,
            last_radius: Cell::new(None),
            last_excluded: Cell::new(None),
        }
    }

    pub fn with_wall(mut self, wall_hit: WallHit) -> Self {
        self.wall_hit = wall_hit;
        self
    }

    pub fn with_solid_probe(mut self, probe: Vec2) -> Self {
        self.solid_probes.push(probe);
        self
    }

    pub fn with_character(mut self, character: CharacterId) -> Self {
        self.character = Some(character);
        self
    }

    pub fn outside(mut self) -> Self {
        self.outside = true;
        self
    }
}

impl CollisionOracle for ScriptedWorld {
    fn intersect_segment(&self, from: Vec2, to: Vec2) -> Option<Vec2> {
        match self.wall_hit {
            WallHit::Never => None,
            WallHit::Midpoint => Some(from.lerp(to, 0.5)),
            WallHit::At(point) => Some(point),
        }
    }

    fn flags_at(&self, point: Vec2) -> CollisionFlags {
        let solid = self
            .solid_probes
            .iter()
            .any(|probe| probe.distance(point) < 1e-3);
        if solid {
            CollisionFlags::SOLID
        } else {
            CollisionFlags::EMPTY
        }
    }

    fn outside_play_area(&self, _point: Vec2) -> bool {
        self.outside
    }
}

impl CharacterQuery for ScriptedWorld {
    fn nearest_character_on_segment(
        &self,
        _from: Vec2,
        to: Vec2,
        radius: f32,
        excluding: Option<CharacterId>,
    ) -> Option<CharacterHit> {
        self.last_radius.set(Some(radius));
        self.last_excluded.set(excluding);
        self.character
            .filter(|character| Some(*character) != excluding)
            .map(|character| CharacterHit {
                character,
                point: to,
            })
    }
}

pub fn launch(kind: ProjectileKind, direction: Vec2, life_span: i32) -> Launch {
    Launch {
        kind,
        owner: OWNER,
        origin: Vec2::new(320.0, 240.0),
        direction,
        life_span,
        damage: 3,
        explosive: false,
        force: 0.0,
        impact_sound: Some(IMPACT),
        weapon: kind.weapon(),
    }
}

pub fn spawn(launch: &Launch, tick: Tick) -> Projectile {
    Projectile::launch(ProjectileId::new(1), launch, tick, &TuningTable::default())
}
