//! Garland tile classification of a direction bitmask.
//!
//! Each shape has a canonical set of wire ends; a tile is that shape turned clockwise a
//! number of quarter turns.

use crate::directions::{Direction, DirectionMask};
use crate::errors::*;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum TileShape {
    /// One wire end: a light bulb at the end of a path.
    Light,
    /// Two perpendicular ends.
    Corner,
    /// Two opposite ends.
    Line,
    /// Three ends.
    Tee,
    /// All four ends.
    Cross,
}

impl TileShape {
    /// Wire ends before any rotation.
    pub fn canonical_mask(self) -> DirectionMask {
        match self {
            TileShape::Light => DirectionMask::from(Direction::North),
            TileShape::Corner => Direction::West | Direction::South,
            TileShape::Line => Direction::West | Direction::East,
            TileShape::Tee => Direction::West | Direction::South | Direction::East,
            TileShape::Cross => DirectionMask::FULL,
        }
    }

    /// Classify a cell's passages. An empty mask has no shape and fails loudly.
    pub fn from_mask(mask: DirectionMask) -> Result<Tile> {
        let shape = match mask.count() {
            1 => TileShape::Light,
            2 => {
                if mask.contains(Direction::North) == mask.contains(Direction::South) {
                    TileShape::Line
                } else {
                    TileShape::Corner
                }
            }
            3 => TileShape::Tee,
            4 => TileShape::Cross,
            _ => bail!(ErrorKind::UnsupportedShape(mask.bits())),
        };
        let canonical = shape.canonical_mask();
        let rotation = (0..4u8)
            .find(|r| canonical.rotate_clockwise(*r) == mask)
            .ok_or_else(|| ErrorKind::UnsupportedShape(mask.bits()))?;
        Ok(Tile { shape, rotation })
    }
}

/// A shape in a given orientation.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Tile {
    pub shape: TileShape,
    /// Clockwise quarter turns from the canonical orientation, 0-3.
    pub rotation: u8,
}

impl Tile {
    pub fn wire_ends(self) -> DirectionMask {
        self.shape.canonical_mask().rotate_clockwise(self.rotation)
    }

    /// The same tile after one more clockwise quarter turn.
    pub fn rotated(self) -> Tile {
        Tile {
            shape: self.shape,
            rotation: (self.rotation + 1) % 4,
        }
    }

    pub fn rotation_degrees(self) -> u32 {
        u32::from(self.rotation) * 90
    }
}
