//! Instanced encoding of a maze for a 3D walk through: one quad instance per wall, floor
//! and ceiling, each described by the cell it sits in and what kind of quad it is.

use log::debug;

use crate::buffers::DataBuffer;
use crate::directions::Direction;
use crate::errors::*;
use crate::grid::DirectionGrid;

/// Quad kinds as the instance shader numbers them.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
#[repr(u8)]
pub enum InstanceKind {
    LeftWall = 0,
    RightWall = 1,
    UpWall = 2,
    DownWall = 3,
    Floor = 4,
    Ceiling = 5,
}

/// Which wall quad stands on which side of a cell, in emission order.
const WALLS: [(Direction, InstanceKind); 4] = [(Direction::North, InstanceKind::UpWall),
                                               (Direction::South, InstanceKind::DownWall),
                                               (Direction::West, InstanceKind::LeftWall),
                                               (Direction::East, InstanceKind::RightWall)];

const CELL_BYTES: usize = 2 * 2;
const KIND_BYTES: usize = 1;

/// Per instance attribute buffers: cell `(x, y)` as a `u16` pair and the kind as a `u8`.
#[derive(Debug, Clone)]
pub struct MazeInstances {
    cells: DataBuffer,
    kinds: DataBuffer,
}

impl Default for MazeInstances {
    fn default() -> Self {
        MazeInstances::new()
    }
}

impl MazeInstances {
    pub fn new() -> MazeInstances {
        MazeInstances {
            cells: DataBuffer::new(0),
            kinds: DataBuffer::new(0),
        }
    }

    /// Walls (the outer boundary included) plus a floor and a ceiling for every cell.
    pub fn instances_count(grid: &DirectionGrid) -> usize {
        let walls = grid.iter()
            .map(|coord| {
                WALLS.iter()
                    .filter(|&&(dir, _)| grid.has_wall(coord, dir))
                    .count()
            })
            .sum::<usize>();
        walls + 2 * grid.size()
    }

    /// Re-encode the buffers for `grid`: every wall of every cell in row-major order, then a
    /// ceiling and a floor per cell. Returns the number of instances.
    pub fn encode(&mut self, grid: &DirectionGrid) -> Result<usize> {
        let (width, height) = (grid.dimensions().width().0, grid.dimensions().height().0);
        if width > u16::MAX as usize + 1 || height > u16::MAX as usize + 1 {
            bail!(ErrorKind::InvalidDimensions(width, height));
        }

        let count = MazeInstances::instances_count(grid);
        self.cells.reserve_and_clear(CELL_BYTES * count);
        self.kinds.reserve_and_clear(KIND_BYTES * count);

        for coord in grid.iter() {
            for &(dir, kind) in &WALLS {
                if grid.has_wall(coord, dir) {
                    self.cells.write_uint16_pair(coord.x as u16, coord.y as u16);
                    self.kinds.write_uint8(kind as u8);
                }
            }
        }
        for coord in grid.iter() {
            self.cells.write_uint16_pair(coord.x as u16, coord.y as u16);
            self.cells.write_uint16_pair(coord.x as u16, coord.y as u16);
            self.kinds.write_uint8(InstanceKind::Ceiling as u8);
            self.kinds.write_uint8(InstanceKind::Floor as u8);
        }

        debug!("encoded {} maze instances for {}x{} cells", count, width, height);
        Ok(count)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.bytes() / KIND_BYTES
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn cells(&self) -> &DataBuffer {
        &self.cells
    }

    #[inline]
    pub fn kinds(&self) -> &DataBuffer {
        &self.kinds
    }
}
