use std::fmt;

use crate::directions::Direction;
use crate::grid_dimensions::GridDimensions;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub fn new(x: u32, y: u32) -> Coordinate {
        Coordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, dimensions: &GridDimensions) -> Coordinate {
        let width = dimensions.width().0;
        Coordinate::new((index % width) as u32, (index / width) as u32)
    }

    /// Creates a new `Coordinate` offset 1 cell away in the given direction.
    /// Returns None if the result would leave the grid.
    pub fn offset(self, direction: Direction, dimensions: &GridDimensions) -> Option<Coordinate> {
        let (x, y) = (self.x, self.y);
        let moved = match direction {
            Direction::North => {
                if y > 0 {
                    Some(Coordinate::new(x, y - 1))
                } else {
                    None
                }
            }
            Direction::South => y.checked_add(1).map(|y| Coordinate::new(x, y)),
            Direction::East => x.checked_add(1).map(|x| Coordinate::new(x, y)),
            Direction::West => {
                if x > 0 {
                    Some(Coordinate::new(x - 1, y))
                } else {
                    None
                }
            }
        };
        moved.filter(|c| dimensions.contains(*c))
    }
}

impl From<(u32, u32)> for Coordinate {
    fn from(x_y_pair: (u32, u32)) -> Coordinate {
        Coordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
