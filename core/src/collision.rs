//! Static world geometry contracts and the queries the projectile system issues.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CharacterId, Vec2};

/// Bit set describing the collision properties of a map cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionFlags(u8);

impl CollisionFlags {
    /// Cell without any collision properties.
    pub const EMPTY: Self = Self(0);
    /// Cell that blocks movement and projectiles.
    pub const SOLID: Self = Self(1);
    /// Cell that kills characters entering it.
    pub const DEATH: Self = Self(2);
    /// Cell that hooks cannot attach to.
    pub const NOHOOK: Self = Self(4);

    /// Creates flags from their raw bit representation.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bit representation of the flags.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Reports whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Reports whether the solid bit is set.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.contains(Self::SOLID)
    }
}

impl BitOr for CollisionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Single cell of the game layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Open space.
    #[default]
    Air,
    /// Solid, hookable ground.
    Solid,
    /// Kill zone.
    Death,
    /// Solid ground that hooks slide off.
    NoHook,
}

impl Tile {
    /// Parses a tile from its map glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' | ' ' => Some(Self::Air),
            '#' => Some(Self::Solid),
            'x' => Some(Self::Death),
            '-' => Some(Self::NoHook),
            _ => None,
        }
    }

    /// Collision flags carried by the tile.
    #[must_use]
    pub fn flags(self) -> CollisionFlags {
        match self {
            Self::Air => CollisionFlags::EMPTY,
            Self::Solid => CollisionFlags::SOLID,
            Self::Death => CollisionFlags::DEATH,
            Self::NoHook => CollisionFlags::SOLID | CollisionFlags::NOHOOK,
        }
    }
}

/// Reasons a textual map could not be turned into a [`TileLayer`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The map contained no rows or only empty rows.
    #[error("map contains no tiles")]
    Empty,
    /// A row's width differs from the first row.
    #[error("row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph does not name any tile.
    #[error("unknown tile glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based column of the glyph.
        column: usize,
        /// Zero-based row of the glyph.
        row: usize,
    },
}

/// Rectangular grid of tiles forming the game layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileLayer {
    /// Parses a layer from rows of glyphs (`.` air, `#` solid, `x` death, `-` unhookable).
    pub fn parse<S>(rows: &[S]) -> Result<Self, MapError>
    where
        S: AsRef<str>,
    {
        let expected = rows
            .first()
            .map_or(0, |row| row.as_ref().chars().count());
        if expected == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(MapError::RaggedRow {
                    row: row_index,
                    expected,
                    found,
                });
            }
            for (column, glyph) in row.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(MapError::UnknownGlyph {
                    glyph,
                    column,
                    row: row_index,
                })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            width: u32::try_from(expected).unwrap_or(u32::MAX),
            height: u32::try_from(rows.len()).unwrap_or(u32::MAX),
            tiles,
        })
    }

    /// Creates a layer of the given size filled with air.
    #[must_use]
    pub fn open(width: u32, height: u32) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Air; capacity],
        }
    }

    /// Width of the layer measured in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the layer measured in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tile stored at the provided column and row, if inside the layer.
    #[must_use]
    pub fn tile(&self, column: u32, row: u32) -> Option<Tile> {
        if column >= self.width || row >= self.height {
            return None;
        }
        let index = usize::try_from(row).ok()? * usize::try_from(self.width).ok()?
            + usize::try_from(column).ok()?;
        self.tiles.get(index).copied()
    }
}

/// Character found on a projectile's path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterHit {
    /// Character that was hit.
    pub character: CharacterId,
    /// Point on the tested segment closest to the character.
    pub point: Vec2,
}

/// Read-only queries against static world geometry.
pub trait CollisionOracle {
    /// First solid point on the segment from `from` to `to`, if any.
    fn intersect_segment(&self, from: Vec2, to: Vec2) -> Option<Vec2>;

    /// Collision flags of the cell containing `point`.
    fn flags_at(&self, point: Vec2) -> CollisionFlags;

    /// Whether `point` lies so far outside the map that projectiles are discarded.
    fn outside_play_area(&self, point: Vec2) -> bool;
}

/// Read-only queries against the damageable characters of the world.
pub trait CharacterQuery {
    /// Character closest to `from` whose body intersects the segment widened by `radius`.
    ///
    /// The character identified by `excluding` is never returned.
    fn nearest_character_on_segment(
        &self,
        from: Vec2,
        to: Vec2,
        radius: f32,
        excluding: Option<CharacterId>,
    ) -> Option<CharacterHit>;
}
