//! Tile collision map answering the geometry queries issued by projectiles.

use arcshot_core::{CollisionFlags, CollisionOracle, TileLayer, Vec2};

/// Edge length of a single tile in world units.
pub const TILE_SIZE: i32 = 32;

/// Number of tiles beyond each map edge that still count as play area.
pub const PLAY_AREA_MARGIN: i32 = 200;

/// Dense grid of collision flags derived from a tile layer.
///
/// Lookups outside the grid are clamped to the nearest edge tile, so a solid
/// border extends infinitely outwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionMap {
    width: i32,
    height: i32,
    flags: Vec<CollisionFlags>,
}

impl CollisionMap {
    /// Builds the flag grid for the provided layer.
    #[must_use]
    pub fn from_layer(layer: &TileLayer) -> Self {
        let mut flags = Vec::new();
        for row in 0..layer.height() {
            for column in 0..layer.width() {
                let tile = layer.tile(column, row).unwrap_or_default();
                flags.push(tile.flags());
            }
        }

        Self {
            width: i32::try_from(layer.width()).unwrap_or(i32::MAX),
            height: i32::try_from(layer.height()).unwrap_or(i32::MAX),
            flags,
        }
    }

    /// Width of the map measured in tiles.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the map measured in tiles.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Flags of the tile at the provided column and row, clamped to the map.
    #[must_use]
    pub fn tile_flags(&self, column: i32, row: i32) -> CollisionFlags {
        if self.flags.is_empty() {
            return CollisionFlags::EMPTY;
        }
        let column = column.clamp(0, self.width - 1);
        let row = row.clamp(0, self.height - 1);
        let index = usize::try_from(row * self.width + column).unwrap_or(0);
        self.flags.get(index).copied().unwrap_or_default()
    }

    fn is_solid(&self, point: Vec2) -> bool {
        self.flags_at(point).is_solid()
    }
}

/// Tile coordinate containing the world coordinate `value`.
///
/// Rounds to the nearest integer first and then divides truncating toward
/// zero, so the tiles either side of the origin are both index zero.
#[must_use]
pub fn tile_coord(value: f32) -> i32 {
    value.round() as i32 / TILE_SIZE
}

impl CollisionOracle for CollisionMap {
    fn intersect_segment(&self, from: Vec2, to: Vec2) -> Option<Vec2> {
        let samples = (from.distance(to) + 1.0) as i32;
        (0..=samples)
            .map(|step| from.lerp(to, step as f32 / samples as f32))
            .find(|point| self.is_solid(*point))
    }

    fn flags_at(&self, point: Vec2) -> CollisionFlags {
        self.tile_flags(tile_coord(point.x), tile_coord(point.y))
    }

    fn outside_play_area(&self, point: Vec2) -> bool {
        let column = tile_coord(point.x);
        let row = tile_coord(point.y);
        column < -PLAY_AREA_MARGIN
            || column > self.width + PLAY_AREA_MARGIN
            || row < -PLAY_AREA_MARGIN
            || row > self.height + PLAY_AREA_MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> CollisionMap {
        let layer = TileLayer::parse(&[
            "##########",
            "#........#",
            "#........#",
            "#...x....#",
            "#....-...#",
            "##########",
        ])
        .expect("valid arena");
        CollisionMap::from_layer(&layer)
    }

    #[test]
    fn tile_coord_rounds_before_dividing() {
        assert_eq!(tile_coord(31.4), 0);
        assert_eq!(tile_coord(31.6), 1);
        assert_eq!(tile_coord(64.0), 2);
        assert_eq!(tile_coord(-20.0), 0);
        assert_eq!(tile_coord(-40.0), -1);
    }

    #[test]
    fn flags_follow_tiles() {
        let map = arena();
        assert!(map.flags_at(Vec2::new(10.0, 10.0)).is_solid());
        assert_eq!(map.flags_at(Vec2::new(50.0, 50.0)), CollisionFlags::EMPTY);
        assert_eq!(
            map.flags_at(Vec2::new(4.0 * 32.0 + 5.0, 3.0 * 32.0 + 5.0)),
            CollisionFlags::DEATH
        );
        let unhookable = map.flags_at(Vec2::new(5.0 * 32.0 + 5.0, 4.0 * 32.0 + 5.0));
        assert!(unhookable.is_solid());
        assert!(unhookable.contains(CollisionFlags::NOHOOK));
    }

    #[test]
    fn lookups_outside_the_grid_clamp_to_the_border() {
        let map = arena();
        assert!(map.flags_at(Vec2::new(-500.0, 100.0)).is_solid());
        assert!(map.flags_at(Vec2::new(100.0, 10_000.0)).is_solid());
        assert_eq!(CollisionMap::default().flags_at(Vec2::ZERO), CollisionFlags::EMPTY);
    }

    #[test]
    fn segment_stops_at_first_solid_sample() {
        let map = arena();
        let hit = map
            .intersect_segment(Vec2::new(100.0, 80.0), Vec2::new(400.0, 80.0))
            .expect("right wall blocks the segment");
        assert_eq!(tile_coord(hit.x), 9);
        assert!((hit.x - 288.0).abs() < 1.0, "hit at {hit:?}");
        assert_eq!(
            map.intersect_segment(Vec2::new(100.0, 80.0), Vec2::new(200.0, 80.0)),
            None
        );
    }

    #[test]
    fn degenerate_segment_checks_its_single_point() {
        let map = arena();
        let inside_wall = Vec2::new(5.0, 5.0);
        assert_eq!(map.intersect_segment(inside_wall, inside_wall), Some(inside_wall));
        let open = Vec2::new(100.0, 80.0);
        assert_eq!(map.intersect_segment(open, open), None);
    }

    #[test]
    fn play_area_extends_two_hundred_tiles_past_the_edges() {
        let map = arena();
        assert!(!map.outside_play_area(Vec2::new(-200.0 * 32.0, 0.0)));
        assert!(map.outside_play_area(Vec2::new(-201.0 * 32.0, 0.0)));
        assert!(!map.outside_play_area(Vec2::new(210.0 * 32.0, 0.0)));
        assert!(map.outside_play_area(Vec2::new(211.0 * 32.0, 0.0)));
        assert!(map.outside_play_area(Vec2::new(0.0, 207.0 * 32.0)));
    }
}
