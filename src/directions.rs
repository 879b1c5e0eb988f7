//! The four passage directions of a square cell and the 4 bit mask combining them.
//!
//! The bit values are an explicit table, never enum ordinals:
//!
//! | direction | bit |
//! |-----------|-----|
//! | North     | 1   |
//! | South     | 2   |
//! | East      | 4   |
//! | West      | 8   |
//!
//! North is towards `y - 1`, East towards `x + 1`.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use smallvec::SmallVec;

use crate::errors::*;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Ord, PartialOrd)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Canonical clockwise order used for rotations.
    pub const ALL: [Direction; 4] = [Direction::North,
                                     Direction::East,
                                     Direction::South,
                                     Direction::West];

    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Direction::North => 1,
            Direction::South => 2,
            Direction::East => 4,
            Direction::West => 8,
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Position in the canonical N, E, S, W order.
    #[inline]
    pub fn clockwise_index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Rotate by a number of 90 degree clockwise turns.
    pub fn rotate_clockwise(self, quarter_turns: u8) -> Direction {
        let index = (self.clockwise_index() + quarter_turns as usize) % Direction::ALL.len();
        Direction::ALL[index]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        };
        f.write_str(name)
    }
}

/// Set of passable directions out of one cell.
#[derive(Eq, PartialEq, Copy, Clone, Default, Hash)]
pub struct DirectionMask(u8);

impl DirectionMask {
    pub const EMPTY: DirectionMask = DirectionMask(0);
    pub const FULL: DirectionMask = DirectionMask(0b1111);

    /// Fails if any bit other than the four direction bits is set.
    pub fn from_bits(bits: u8) -> Result<DirectionMask> {
        if bits & !DirectionMask::FULL.0 != 0 {
            bail!(ErrorKind::InvalidDirectionBits(bits));
        }
        Ok(DirectionMask(bits))
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    #[inline]
    pub fn with(self, direction: Direction) -> DirectionMask {
        DirectionMask(self.0 | direction.bit())
    }

    #[inline]
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Set directions in canonical N, E, S, W order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.iter().cloned().filter(move |d| self.contains(*d))
    }

    pub fn directions(self) -> SmallVec<[Direction; 4]> {
        self.iter().collect()
    }

    /// Every set direction turned clockwise by `quarter_turns`.
    pub fn rotate_clockwise(self, quarter_turns: u8) -> DirectionMask {
        self.iter()
            .map(|d| d.rotate_clockwise(quarter_turns))
            .fold(DirectionMask::EMPTY, DirectionMask::with)
    }
}

impl From<Direction> for DirectionMask {
    fn from(direction: Direction) -> DirectionMask {
        DirectionMask(direction.bit())
    }
}

impl BitOr for Direction {
    type Output = DirectionMask;

    fn bitor(self, rhs: Direction) -> DirectionMask {
        DirectionMask(self.bit() | rhs.bit())
    }
}

impl BitOr<Direction> for DirectionMask {
    type Output = DirectionMask;

    fn bitor(self, rhs: Direction) -> DirectionMask {
        self.with(rhs)
    }
}

impl BitOr for DirectionMask {
    type Output = DirectionMask;

    fn bitor(self, rhs: DirectionMask) -> DirectionMask {
        DirectionMask(self.0 | rhs.0)
    }
}

impl BitOrAssign<Direction> for DirectionMask {
    fn bitor_assign(&mut self, rhs: Direction) {
        self.insert(rhs);
    }
}

impl fmt::Debug for DirectionMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DirectionMask({:#06b} ", self.0)?;
        f.debug_list().entries(self.iter()).finish()?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn bits_are_distinct_single_flags() {
        let all = Direction::ALL.iter().fold(0u8, |acc, d| {
            assert_eq!(d.bit().count_ones(), 1);
            assert_eq!(acc & d.bit(), 0);
            acc | d.bit()
        });
        assert_eq!(all, 0b1111);
    }

    #[test]
    fn opposites_pair_up() {
        for d in &Direction::ALL {
            assert_ne!(d.opposite(), *d);
            assert_eq!(d.opposite().opposite(), *d);
            assert_eq!(d.rotate_clockwise(2), d.opposite());
        }
    }

    #[test]
    fn rotation_follows_canonical_order() {
        assert_eq!(Direction::North.rotate_clockwise(0), Direction::North);
        assert_eq!(Direction::North.rotate_clockwise(1), Direction::East);
        assert_eq!(Direction::West.rotate_clockwise(1), Direction::North);
        assert_eq!(Direction::South.rotate_clockwise(3), Direction::East);
        assert_eq!(Direction::East.rotate_clockwise(4), Direction::East);
    }

    #[test]
    fn mask_combination_and_queries() {
        let mut mask = Direction::North | Direction::West;
        assert!(mask.contains(Direction::North));
        assert!(mask.contains(Direction::West));
        assert!(!mask.contains(Direction::South));
        assert_eq!(mask.count(), 2);

        mask |= Direction::South;
        assert_eq!(mask.bits(), 1 | 2 | 8);
        assert_eq!(&*mask.directions(),
                   &[Direction::North, Direction::South, Direction::West]);
    }

    #[test]
    fn mask_rotation() {
        let corner = Direction::West | Direction::South;
        assert_eq!(corner.rotate_clockwise(1), Direction::North | Direction::West);
        assert_eq!(DirectionMask::FULL.rotate_clockwise(3), DirectionMask::FULL);
        assert_eq!(DirectionMask::EMPTY.rotate_clockwise(1), DirectionMask::EMPTY);
    }

    #[test]
    fn from_bits_rejects_unknown_bits() {
        assert_eq!(DirectionMask::from_bits(15).unwrap(), DirectionMask::FULL);
        assert_eq!(DirectionMask::from_bits(0).unwrap(), DirectionMask::EMPTY);
        let err = DirectionMask::from_bits(16).expect_err("bit 4 is not a direction");
        match *err.kind() {
            ErrorKind::InvalidDirectionBits(16) => {}
            ref other => panic!("unexpected error kind {:?}", other),
        }
    }
}
