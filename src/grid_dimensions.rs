use rand::Rng;

use crate::cells::Coordinate;
use crate::errors::*;
use crate::units::{EdgesCount, Height, NodesCount, Width};

/// Validated size of a rectangular grid. Both sides are at least 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GridDimensions {
    width: Width,
    height: Height,
}

impl GridDimensions {
    pub fn new(width: Width, height: Height) -> Result<GridDimensions> {
        if width.0 == 0 || height.0 == 0 {
            bail!(ErrorKind::InvalidDimensions(width.0, height.0));
        }
        // Coordinates are u32 on each axis.
        if width.0 > u32::MAX as usize || height.0 > u32::MAX as usize {
            bail!(ErrorKind::InvalidDimensions(width.0, height.0));
        }
        Ok(GridDimensions { width, height })
    }

    #[inline(always)]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.width.0 * self.height.0)
    }

    /// Node count and the number of passages in a perfect maze over these cells.
    pub fn spanning_tree_size(&self) -> (NodesCount, EdgesCount) {
        let NodesCount(cells) = self.size();
        (NodesCount(cells), EdgesCount(cells - 1))
    }

    #[inline]
    pub fn contains(&self, coord: Coordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0..size.
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    /// Uniformly random cell: x and y are drawn independently.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Coordinate {
        let x = rng.gen_range(0..self.width.0);
        let y = rng.gen_range(0..self.height.0);
        Coordinate::new(x as u32, y as u32)
    }
}
