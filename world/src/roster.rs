//! Damageable characters that projectiles can hit.

use std::collections::BTreeMap;

use arcshot_core::{CharacterHit, CharacterId, CharacterQuery, Vec2};

/// Radius of a character's body.
pub const PROXIMITY_RADIUS: f32 = 28.0;

/// Health a character spawns with.
pub const SPAWN_HEALTH: i32 = 10;

/// Live character tracked by the roster.
#[derive(Clone, Debug, PartialEq)]
pub struct Character {
    position: Vec2,
    velocity: Vec2,
    health: i32,
}

impl Character {
    fn spawned_at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            health: SPAWN_HEALTH,
        }
    }

    /// Centre of the character's body.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Knockback accumulated from hits.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Remaining health points.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }
}

/// Outcome of applying damage to a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// No live character carries the identifier.
    Missed,
    /// The character took the hit and is still alive.
    Wounded,
    /// The character's health ran out and it left the roster.
    Killed,
}

/// Characters keyed by identifier, iterated in ascending id order.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    characters: BTreeMap<CharacterId, Character>,
}

impl Roster {
    /// Places a character at `position`, replacing any previous state it had.
    pub fn spawn(&mut self, character: CharacterId, position: Vec2) {
        let _ = self
            .characters
            .insert(character, Character::spawned_at(position));
    }

    /// Teleports a live character. Returns `false` when it does not exist.
    pub fn move_to(&mut self, character: CharacterId, position: Vec2) -> bool {
        match self.characters.get_mut(&character) {
            Some(state) => {
                state.position = position;
                true
            }
            None => false,
        }
    }

    /// State of a live character.
    #[must_use]
    pub fn get(&self, character: CharacterId) -> Option<&Character> {
        self.characters.get(&character)
    }

    /// Live characters in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (CharacterId, &Character)> {
        self.characters.iter().map(|(id, state)| (*id, state))
    }

    /// Number of live characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether no character is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Pushes the target by `force` and removes `amount` health.
    ///
    /// A character whose health drops to zero or below is removed at once,
    /// so later queries in the same tick no longer see it.
    pub fn apply_damage(&mut self, target: CharacterId, force: Vec2, amount: i32) -> DamageOutcome {
        let Some(state) = self.characters.get_mut(&target) else {
            return DamageOutcome::Missed;
        };
        state.velocity += force;
        state.health = state.health.saturating_sub(amount);
        if state.health > 0 {
            return DamageOutcome::Wounded;
        }

        let _ = self.characters.remove(&target);
        DamageOutcome::Killed
    }
}

impl CharacterQuery for Roster {
    fn nearest_character_on_segment(
        &self,
        from: Vec2,
        to: Vec2,
        radius: f32,
        excluding: Option<CharacterId>,
    ) -> Option<CharacterHit> {
        let mut closest = from.distance(to) * 100.0;
        let mut nearest = None;

        for (id, state) in self.iter() {
            if Some(id) == excluding {
                continue;
            }
            let point = closest_point_on_segment(from, to, state.position);
            if state.position.distance(point) >= PROXIMITY_RADIUS + radius {
                continue;
            }
            let along = from.distance(point);
            if along < closest {
                closest = along;
                nearest = Some(CharacterHit {
                    character: id,
                    point,
                });
            }
        }

        nearest
    }
}

fn closest_point_on_segment(from: Vec2, to: Vec2, point: Vec2) -> Vec2 {
    let span = to - from;
    let length_squared = span.length_squared();
    if length_squared <= 0.0 {
        return from;
    }
    let t = span.dot(point - from) / length_squared;
    from.lerp(to, t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(characters: &[(u32, Vec2)]) -> Roster {
        let mut roster = Roster::default();
        for (id, position) in characters {
            roster.spawn(CharacterId::new(*id), *position);
        }
        roster
    }

    #[test]
    fn hit_lands_on_the_closest_point_of_the_segment() {
        let roster = roster(&[(1, Vec2::new(50.0, 30.0))]);
        let hit = roster.nearest_character_on_segment(Vec2::ZERO, Vec2::new(100.0, 0.0), 6.0, None);
        assert_eq!(
            hit,
            Some(CharacterHit {
                character: CharacterId::new(1),
                point: Vec2::new(50.0, 0.0),
            })
        );
    }

    #[test]
    fn body_and_projectile_radius_bound_the_hit() {
        let roster = roster(&[(1, Vec2::new(50.0, 34.0))]);
        let from = Vec2::ZERO;
        let to = Vec2::new(100.0, 0.0);
        assert!(roster
            .nearest_character_on_segment(from, to, 6.0, None)
            .is_none());
        assert!(roster
            .nearest_character_on_segment(from, to, 8.0, None)
            .is_some());
    }

    #[test]
    fn nearest_character_to_the_segment_start_wins() {
        let roster = roster(&[(1, Vec2::new(70.0, 10.0)), (2, Vec2::new(30.0, -10.0))]);
        let hit = roster
            .nearest_character_on_segment(Vec2::ZERO, Vec2::new(100.0, 0.0), 6.0, None)
            .expect("both characters overlap the segment");
        assert_eq!(hit.character, CharacterId::new(2));
        assert!(hit.point.distance(Vec2::new(30.0, 0.0)) < 1e-4);
    }

    #[test]
    fn excluded_character_is_skipped() {
        let roster = roster(&[(1, Vec2::new(30.0, 0.0)), (2, Vec2::new(70.0, 0.0))]);
        let hit = roster.nearest_character_on_segment(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            6.0,
            Some(CharacterId::new(1)),
        );
        assert_eq!(hit.map(|hit| hit.character), Some(CharacterId::new(2)));
    }

    #[test]
    fn zero_length_segment_never_hits() {
        let roster = roster(&[(1, Vec2::ZERO)]);
        assert!(roster
            .nearest_character_on_segment(Vec2::ZERO, Vec2::ZERO, 6.0, None)
            .is_none());
    }

    #[test]
    fn damage_pushes_and_eventually_kills() {
        let mut roster = roster(&[(1, Vec2::ZERO)]);
        let target = CharacterId::new(1);

        assert_eq!(
            roster.apply_damage(target, Vec2::new(0.5, 0.0), 4),
            DamageOutcome::Wounded
        );
        let state = roster.get(target).expect("still alive");
        assert_eq!(state.health(), SPAWN_HEALTH - 4);
        assert_eq!(state.velocity(), Vec2::new(0.5, 0.0));

        assert_eq!(
            roster.apply_damage(target, Vec2::ZERO, 6),
            DamageOutcome::Killed
        );
        assert!(roster.get(target).is_none());
        assert!(roster.is_empty());
        assert_eq!(
            roster.apply_damage(target, Vec2::ZERO, 1),
            DamageOutcome::Missed
        );
    }

    #[test]
    fn respawn_restores_health() {
        let mut roster = roster(&[(1, Vec2::ZERO)]);
        let target = CharacterId::new(1);
        let _ = roster.apply_damage(target, Vec2::ZERO, 3);
        roster.spawn(target, Vec2::new(5.0, 5.0));
        assert_eq!(roster.get(target).map(Character::health), Some(SPAWN_HEALTH));
        assert!(roster.move_to(target, Vec2::ONE));
        assert!(!roster.move_to(CharacterId::new(9), Vec2::ONE));
        assert_eq!(roster.len(), 1);
    }
}
