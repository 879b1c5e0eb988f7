use std::fmt;

use itertools::iproduct;
use petgraph::graph::{NodeIndex, UnGraph};
use smallvec::SmallVec;

use crate::cells::Coordinate;
use crate::directions::{Direction, DirectionMask};
use crate::errors::*;
use crate::grid_dimensions::GridDimensions;

pub type CoordinateSmallVec = SmallVec<[Coordinate; 4]>;

/// Row-major grid of direction bitmasks. `get(c).contains(d)` means cell `c` has a passage
/// towards `d`.
///
/// The masks are stored as raw bytes so the whole grid can be handed to a renderer as is.
#[derive(Clone, PartialEq, Eq)]
pub struct DirectionGrid {
    dimensions: GridDimensions,
    cells: Vec<u8>,
}

impl fmt::Debug for DirectionGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DirectionGrid :: {}x{}, links: {}, cells: {:?}",
               self.dimensions.width().0, self.dimensions.height().0,
               self.links_count(), self.cells)
    }
}

impl DirectionGrid {
    /// All walls up: every mask is empty.
    pub fn new(dimensions: GridDimensions) -> DirectionGrid {
        DirectionGrid {
            dimensions,
            cells: vec![0; dimensions.size().0],
        }
    }

    /// Wraps existing row-major masks, e.g. a grid produced elsewhere.
    pub fn from_bits(dimensions: GridDimensions, bits: &[u8]) -> Result<DirectionGrid> {
        if bits.len() != dimensions.size().0 {
            bail!(ErrorKind::InvalidDimensions(dimensions.width().0, bits.len() / dimensions.width().0));
        }
        for &b in bits {
            let _ = DirectionMask::from_bits(b)?;
        }
        Ok(DirectionGrid {
            dimensions,
            cells: bits.to_vec(),
        })
    }

    #[inline]
    pub fn dimensions(&self) -> &GridDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Raw row-major bitmasks, values 0-15.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub fn coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        self.dimensions.coordinate_to_index(coord)
    }

    #[inline]
    pub fn get(&self, coord: Coordinate) -> Option<DirectionMask> {
        self.coordinate_to_index(coord)
            .map(|i| self.mask_at_index(i))
    }

    #[inline]
    fn mask_at_index(&self, index: usize) -> DirectionMask {
        // Only `link` and `from_bits` write cells and both keep the high bits clear.
        DirectionMask::from_bits(self.cells[index]).unwrap_or(DirectionMask::EMPTY)
    }

    pub fn neighbour_at_direction(&self, coord: Coordinate, direction: Direction) -> Option<Coordinate> {
        if !self.dimensions.contains(coord) {
            return None;
        }
        coord.offset(direction, &self.dimensions)
    }

    /// Cells to the North, East, South or West of a cell, not necessarily linked by a passage.
    pub fn neighbours(&self, coord: Coordinate) -> CoordinateSmallVec {
        Direction::ALL.iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Carve a passage from `coord` towards `direction`, recording it in both cells.
    /// Returns the neighbour that is now linked.
    pub fn link(&mut self, coord: Coordinate, direction: Direction) -> Result<Coordinate> {
        let neighbour = self.neighbour_at_direction(coord, direction)
            .ok_or_else(|| ErrorKind::InvalidCoordinate(coord.x, coord.y))?;
        let (a, b) = match (self.coordinate_to_index(coord), self.coordinate_to_index(neighbour)) {
            (Some(a), Some(b)) => (a, b),
            _ => bail!(ErrorKind::InvalidCoordinate(neighbour.x, neighbour.y)),
        };
        self.cells[a] |= direction.bit();
        self.cells[b] |= direction.opposite().bit();
        Ok(neighbour)
    }

    /// `link` for row-major indices the caller already knows to be adjacent along `direction`.
    #[inline]
    pub(crate) fn link_indices(&mut self, from: usize, to: usize, direction: Direction) {
        self.cells[from] |= direction.bit();
        self.cells[to] |= direction.opposite().bit();
    }

    pub fn is_neighbour_linked(&self, coord: Coordinate, direction: Direction) -> bool {
        self.neighbour_at_direction(coord, direction).is_some() &&
        self.get(coord).map_or(false, |mask| mask.contains(direction))
    }

    /// True when no passage leads from the cell towards `direction`.
    /// The outer boundary is always a wall.
    #[inline]
    pub fn has_wall(&self, coord: Coordinate, direction: Direction) -> bool {
        !self.is_neighbour_linked(coord, direction)
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: Coordinate, b: Coordinate) -> bool {
        Direction::ALL.iter()
            .any(|dir| self.neighbour_at_direction(a, *dir) == Some(b) && self.is_neighbour_linked(a, *dir))
    }

    /// Cells that are linked to a particular cell by a passage.
    pub fn links(&self, coord: Coordinate) -> CoordinateSmallVec {
        self.get(coord)
            .map(|mask| {
                mask.iter()
                    .filter_map(|dir| self.neighbour_at_direction(coord, dir))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of passages, counting each bidirectional connection once.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Row-major iteration over every coordinate.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> {
        let (w, h) = (self.dimensions.width().0 as u32, self.dimensions.height().0 as u32);
        iproduct!(0..h, 0..w).map(|(y, x)| Coordinate::new(x, y))
    }

    /// Every passage once, as the (west or north cell, east or south cell) pair.
    pub fn iter_links<'a>(&'a self) -> impl Iterator<Item = (Coordinate, Coordinate)> + 'a {
        self.iter().flat_map(move |coord| {
            [Direction::East, Direction::South]
                .iter()
                .filter(move |dir| self.is_neighbour_linked(coord, **dir))
                .filter_map(move |dir| self.neighbour_at_direction(coord, *dir))
                .map(move |neighbour| (coord, neighbour))
                .collect::<SmallVec<[(Coordinate, Coordinate); 2]>>()
        })
    }

    /// Undirected graph view: one node per cell in row-major order, one edge per passage.
    /// Node weights are the cell coordinates.
    pub fn to_graph(&self) -> UnGraph<Coordinate, ()> {
        let (nodes, _) = self.dimensions.spanning_tree_size();
        let mut graph = UnGraph::with_capacity(nodes.0, nodes.0);
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_links() {
            if let (Some(ia), Some(ib)) = (self.coordinate_to_index(a), self.coordinate_to_index(b)) {
                let _ = graph.add_edge(NodeIndex::new(ia), NodeIndex::new(ib), ());
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use petgraph::algo;

    use super::*;
    use crate::units::{Height, Width};

    fn small_grid(w: usize, h: usize) -> DirectionGrid {
        DirectionGrid::new(GridDimensions::new(Width(w), Height(h)).unwrap())
    }

    macro_rules! assert_smallvec_eq {
        ($x:expr, $y:expr) => (assert_eq!(&*$x, &*$y))
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[Coordinate]| {
            let found: Vec<Coordinate> = g.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<Coordinate> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(found, expected);
        };
        let gc = |x, y| Coordinate::new(x, y);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        // Outside the grid there are no neighbours at all
        assert!(g.neighbours(gc(10, 0)).is_empty());
    }

    #[test]
    fn linking_sets_both_direction_bits() {
        let mut g = small_grid(3, 3);
        let a = Coordinate::new(1, 1);

        let b = g.link(a, Direction::North).expect("link failed");
        assert_eq!(b, Coordinate::new(1, 0));
        assert_eq!(g.get(a), Some(DirectionMask::from(Direction::North)));
        assert_eq!(g.get(b), Some(DirectionMask::from(Direction::South)));
        assert!(g.is_linked(a, b) && g.is_linked(b, a));

        let c = g.link(a, Direction::East).expect("link failed");
        assert_eq!(g.get(a), Some(Direction::North | Direction::East));
        assert_smallvec_eq!(g.links(a), &[b, c]);
        assert_smallvec_eq!(g.links(c), &[a]);
        assert!(!g.is_linked(b, c));
        assert_eq!(g.links_count(), 2);
    }

    #[test]
    fn relinking_is_idempotent() {
        let mut g = small_grid(2, 1);
        let a = Coordinate::new(0, 0);
        g.link(a, Direction::East).expect("link failed");
        g.link(Coordinate::new(1, 0), Direction::West).expect("link failed");
        assert_eq!(g.links_count(), 1);
        assert_eq!(g.as_bytes(), &[Direction::East.bit(), Direction::West.bit()]);
    }

    #[test]
    fn no_links_out_of_the_grid() {
        let mut g = small_grid(2, 2);
        let err = g.link(Coordinate::new(0, 0), Direction::North).unwrap_err();
        match *err.kind() {
            ErrorKind::InvalidCoordinate(0, 0) => {}
            ref other => panic!("unexpected error kind {:?}", other),
        }
        assert!(g.link(Coordinate::new(5, 5), Direction::South).is_err());
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn walls() {
        let mut g = small_grid(2, 1);
        let a = Coordinate::new(0, 0);
        for dir in &Direction::ALL {
            assert!(g.has_wall(a, *dir));
        }
        g.link(a, Direction::East).expect("link failed");
        assert!(!g.has_wall(a, Direction::East));
        assert!(!g.has_wall(Coordinate::new(1, 0), Direction::West));
        assert!(g.has_wall(a, Direction::West));
    }

    #[test]
    fn from_bits_validates() {
        let dims = GridDimensions::new(Width(2), Height(1)).unwrap();
        assert!(DirectionGrid::from_bits(dims, &[4, 8]).is_ok());
        assert!(DirectionGrid::from_bits(dims, &[4]).is_err());
        assert!(DirectionGrid::from_bits(dims, &[4, 32]).is_err());
    }

    #[test]
    fn cell_iter_is_row_major() {
        let g = small_grid(2, 2);
        assert_eq!(g.iter().collect::<Vec<Coordinate>>(),
                   &[Coordinate::new(0, 0),
                     Coordinate::new(1, 0),
                     Coordinate::new(0, 1),
                     Coordinate::new(1, 1)]);
    }

    #[test]
    fn graph_view_matches_links() {
        let mut g = small_grid(2, 2);
        g.link(Coordinate::new(0, 0), Direction::East).unwrap();
        g.link(Coordinate::new(0, 0), Direction::South).unwrap();
        let graph = g.to_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(algo::connected_components(&graph), 2);
        assert!(!algo::is_cyclic_undirected(&graph));
    }
}
