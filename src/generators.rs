//! Randomized depth-first ("recursive backtracker") carving.
//!
//! A `PathWalker` is one resumable depth-first walk. Every walker of a run shares one
//! `Carving`: the direction grid being carved plus the visited set, so no two walkers can
//! claim the same cell. A single walker driven to completion carves a perfect maze; several
//! walkers advanced in round-robin grow a forest of disjoint trees (the garland field).

use bit_set::BitSet;
use log::{debug, trace};
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::Coordinate;
use crate::directions::Direction;
use crate::errors::*;
use crate::grid::DirectionGrid;
use crate::grid_dimensions::GridDimensions;
use crate::units::{Height, PathsCount, Width};

/// Candidate order when looking for unvisited neighbours. Fixed so a seeded random source
/// always carves the same maze.
const NEIGHBOUR_ORDER: [Direction; 4] = [Direction::West,
                                         Direction::South,
                                         Direction::East,
                                         Direction::North];

/// State shared by all walkers of one generation run.
#[derive(Debug, Clone)]
pub struct Carving {
    grid: DirectionGrid,
    visited: BitSet,
    visited_count: usize,
}

impl Carving {
    pub fn new(dimensions: GridDimensions) -> Carving {
        let cells_count = dimensions.size().0;
        Carving {
            grid: DirectionGrid::new(dimensions),
            visited: BitSet::with_capacity(cells_count),
            visited_count: 0,
        }
    }

    #[inline]
    pub fn dimensions(&self) -> &GridDimensions {
        self.grid.dimensions()
    }

    #[inline]
    pub fn grid(&self) -> &DirectionGrid {
        &self.grid
    }

    pub fn into_grid(self) -> DirectionGrid {
        self.grid
    }

    pub fn is_visited(&self, coord: Coordinate) -> bool {
        self.dimensions()
            .coordinate_to_index(coord)
            .map_or(false, |i| self.visited.contains(i))
    }

    #[inline]
    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    #[inline]
    pub fn cells_count(&self) -> usize {
        self.grid.size()
    }

    fn mark_visited(&mut self, index: usize) {
        if self.visited.insert(index) {
            self.visited_count += 1;
        }
    }

    fn unvisited_neighbours(&self, coord: Coordinate) -> SmallVec<[(Direction, usize); 4]> {
        let dimensions = *self.dimensions();
        NEIGHBOUR_ORDER.iter()
            .filter_map(|dir| {
                coord.offset(*dir, &dimensions)
                    .and_then(|neighbour| dimensions.coordinate_to_index(neighbour))
                    .filter(|index| !self.visited.contains(*index))
                    .map(|index| (*dir, index))
            })
            .collect()
    }

    /// Resolve a candidate start cell to an unvisited cell near it.
    ///
    /// Tries the candidate, then the rest of its row to the east, then the cells to the
    /// south-east of it row by row, and finally every cell in row-major order.
    pub fn unvisited_about(&self, candidate: Coordinate) -> Result<Coordinate> {
        let width = self.dimensions().width().0 as u32;
        let height = self.dimensions().height().0 as u32;
        let (cx, cy) = (candidate.x, candidate.y);
        let free = |x: u32, y: u32| {
            let coord = Coordinate::new(x, y);
            if self.dimensions().contains(coord) && !self.is_visited(coord) {
                Some(coord)
            } else {
                None
            }
        };

        if let Some(c) = free(cx, cy) {
            return Ok(c);
        }
        if let Some(c) = (cx..width).filter_map(|x| free(x, cy)).next() {
            return Ok(c);
        }
        for y in cy..height {
            if let Some(c) = (cx.saturating_add(1)..width).filter_map(|x| free(x, y)).next() {
                return Ok(c);
            }
        }
        self.grid
            .iter()
            .find(|c| !self.is_visited(*c))
            .ok_or_else(|| ErrorKind::NoUnvisitedCells.into())
    }
}

/// Outcome of advancing a walker.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum WalkStep {
    /// A passage was carved into this newly visited cell.
    Carved(Coordinate),
    /// The walk stack is empty; the walker will never carve again.
    Done,
}

/// One depth-first walk suspended between carving steps.
#[derive(Debug, Clone)]
pub struct PathWalker {
    start: Coordinate,
    stack: Vec<Coordinate>,
}

impl PathWalker {
    /// Begin a walk at `start`, marking it visited.
    /// Fails if `start` is outside the grid or already claimed.
    pub fn start_at(start: Coordinate, carving: &mut Carving) -> Result<PathWalker> {
        let index = carving.dimensions()
            .coordinate_to_index(start)
            .ok_or_else(|| ErrorKind::InvalidCoordinate(start.x, start.y))?;
        if carving.visited.contains(index) {
            bail!(ErrorKind::NoUnvisitedCells);
        }
        carving.mark_visited(index);

        let mut stack = Vec::with_capacity(carving.cells_count());
        stack.push(start);
        Ok(PathWalker { start, stack })
    }

    /// Begin a walk at an unvisited cell near a uniformly random candidate.
    pub fn start_near_random<R>(carving: &mut Carving, rng: &mut R) -> Result<PathWalker>
        where R: Rng + ?Sized
    {
        let candidate = carving.dimensions().random_cell(rng);
        let start = carving.unvisited_about(candidate)?;
        PathWalker::start_at(start, carving)
    }

    #[inline]
    pub fn start(&self) -> Coordinate {
        self.start
    }

    /// Top of the walk stack.
    #[inline]
    pub fn current(&self) -> Option<Coordinate> {
        self.stack.last().cloned()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    /// Backtrack through dead ends, then carve exactly one passage to a random unvisited
    /// neighbour of the current cell.
    pub fn step<R>(&mut self, carving: &mut Carving, rng: &mut R) -> WalkStep
        where R: Rng + ?Sized
    {
        while let Some(&current) = self.stack.last() {
            let candidates = carving.unvisited_neighbours(current);
            if candidates.is_empty() {
                let _ = self.stack.pop();
                continue;
            }

            let (direction, next_index) = candidates[rng.gen_range(0..candidates.len())];
            let current_index = current.y as usize * carving.dimensions().width().0 +
                                current.x as usize;
            carving.grid.link_indices(current_index, next_index, direction);
            carving.mark_visited(next_index);

            let next = Coordinate::from_row_major_index(next_index, carving.dimensions());
            self.stack.push(next);
            return WalkStep::Carved(next);
        }
        WalkStep::Done
    }
}

/// Carve a perfect maze (spanning tree) over the whole grid from a uniformly random start.
pub fn recursive_backtracker<R>(dimensions: GridDimensions, rng: &mut R) -> DirectionGrid
    where R: Rng + ?Sized
{
    let start = dimensions.random_cell(rng);
    recursive_backtracker_from(dimensions, start, rng)
        .unwrap_or_else(|_| DirectionGrid::new(dimensions))
}

/// Carve a perfect maze starting the walk at `start`.
pub fn recursive_backtracker_from<R>(dimensions: GridDimensions,
                                     start: Coordinate,
                                     rng: &mut R)
                                     -> Result<DirectionGrid>
    where R: Rng + ?Sized
{
    let mut carving = Carving::new(dimensions);
    let mut walker = PathWalker::start_at(start, &mut carving)?;
    let mut steps = 0usize;
    while let WalkStep::Carved(_) = walker.step(&mut carving, rng) {
        steps += 1;
    }
    debug!("carved {}x{} maze from {} with {} passages",
           dimensions.width().0, dimensions.height().0, start, steps);
    Ok(carving.into_grid())
}

/// Validate the dimensions and carve a maze with the thread local random source.
pub fn generate(width: usize, height: usize) -> Result<DirectionGrid> {
    let dimensions = GridDimensions::new(Width(width), Height(height))?;
    Ok(recursive_backtracker(dimensions, &mut rand::thread_rng()))
}

/// Output of the multi-path generator: the carved forest and where each path started.
#[derive(Debug, Clone)]
pub struct Field {
    pub grid: DirectionGrid,
    pub starts: Vec<Coordinate>,
}

/// Grows several disjoint trees in lockstep, one carve per walker per tick.
#[derive(Debug, Clone)]
pub struct FieldGenerator {
    carving: Carving,
    walkers: Vec<PathWalker>,
    running: bool,
}

impl FieldGenerator {
    /// Place `paths` walkers, in order, each near its own random candidate cell.
    pub fn new<R>(dimensions: GridDimensions, paths: PathsCount, rng: &mut R) -> Result<FieldGenerator>
        where R: Rng + ?Sized
    {
        let PathsCount(paths_count) = paths;
        let cells_count = dimensions.size().0;
        if paths_count > cells_count {
            bail!(ErrorKind::TooManyPaths(paths_count, cells_count));
        }

        let mut carving = Carving::new(dimensions);
        let mut walkers = Vec::with_capacity(paths_count);
        for _ in 0..paths_count {
            walkers.push(PathWalker::start_near_random(&mut carving, rng)?);
        }
        Ok(FieldGenerator {
            carving,
            running: !walkers.is_empty(),
            walkers,
        })
    }

    /// Advance every walker one step, round-robin. Returns false once all walkers are done.
    pub fn tick<R>(&mut self, rng: &mut R) -> bool
        where R: Rng + ?Sized
    {
        let mut any_carved = false;
        for walker in &mut self.walkers {
            if let WalkStep::Carved(_) = walker.step(&mut self.carving, rng) {
                any_carved = true;
            }
        }
        self.running = any_carved;
        trace!("field tick: {}/{} cells visited",
               self.carving.visited_count(), self.carving.cells_count());
        any_carved
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// (cells visited so far, total cells)
    #[inline]
    pub fn progress(&self) -> (usize, usize) {
        (self.carving.visited_count(), self.carving.cells_count())
    }

    pub fn starts(&self) -> Vec<Coordinate> {
        self.walkers.iter().map(PathWalker::start).collect()
    }

    #[inline]
    pub fn grid(&self) -> &DirectionGrid {
        self.carving.grid()
    }

    /// The field as carved so far.
    pub fn finish(self) -> Field {
        let starts = self.starts();
        Field {
            grid: self.carving.into_grid(),
            starts,
        }
    }
}

/// Carve a garland field of `paths` disjoint trees covering the grid.
pub fn generate_field<R>(dimensions: GridDimensions, paths: PathsCount, rng: &mut R) -> Result<Field>
    where R: Rng + ?Sized
{
    generate_field_with_progress(dimensions, paths, rng, |_, _| {})
}

/// As `generate_field`, calling `on_progress(visited, total)` after every tick.
pub fn generate_field_with_progress<R, F>(dimensions: GridDimensions,
                                          paths: PathsCount,
                                          rng: &mut R,
                                          mut on_progress: F)
                                          -> Result<Field>
    where R: Rng + ?Sized,
          F: FnMut(usize, usize)
{
    let mut generator = FieldGenerator::new(dimensions, paths, rng)?;
    let mut ticks = 0usize;
    loop {
        let running = generator.tick(rng);
        ticks += 1;
        let (visited, total) = generator.progress();
        on_progress(visited, total);
        if !running {
            break;
        }
    }
    debug!("carved {}x{} field of {} paths in {} ticks",
           dimensions.width().0, dimensions.height().0, paths.0, ticks);
    Ok(generator.finish())
}

#[cfg(test)]
mod tests {

    use petgraph::algo;
    use petgraph::unionfind::UnionFind;
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::directions::DirectionMask;

    fn dims(w: usize, h: usize) -> GridDimensions {
        GridDimensions::new(Width(w), Height(h)).unwrap()
    }

    /// Always draws the lowest value of any range.
    fn lowest() -> StepRng {
        StepRng::new(0, 0)
    }

    fn assert_bidirectional(grid: &DirectionGrid) {
        for coord in grid.iter() {
            let mask = grid.get(coord).unwrap();
            for dir in mask.iter() {
                let neighbour = grid.neighbour_at_direction(coord, dir)
                    .unwrap_or_else(|| panic!("{} links {} out of the grid", coord, dir));
                assert!(grid.get(neighbour).unwrap().contains(dir.opposite()),
                        "{} links {} but {} does not link back", coord, dir, neighbour);
            }
        }
    }

    fn assert_spanning_tree(grid: &DirectionGrid) {
        let graph = grid.to_graph();
        assert_eq!(graph.edge_count(), grid.size() - 1);
        assert_eq!(algo::connected_components(&graph), 1);
        assert!(!algo::is_cyclic_undirected(&graph));
        assert_bidirectional(grid);
    }

    #[test]
    fn single_cell_maze_has_no_passages() {
        let grid = recursive_backtracker(dims(1, 1), &mut lowest());
        assert_eq!(grid.as_bytes(), &[0]);
        assert_eq!(grid.links_count(), 0);
        assert!(grid.neighbours(Coordinate::new(0, 0)).is_empty());
    }

    #[test]
    fn three_by_one_is_a_straight_corridor() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let grid = recursive_backtracker(dims(3, 1), &mut rng);
            let e = Direction::East.bit();
            let w = Direction::West.bit();
            assert_eq!(grid.as_bytes(), &[e, e | w, w]);
            assert_eq!(grid.links_count(), 2);
        }
    }

    #[test]
    fn lowest_choice_walk_is_deterministic() {
        // Start (0,0), neighbour preference West, South, East, North.
        let grid = recursive_backtracker(dims(3, 2), &mut lowest());
        let (n, s, e, w) = (Direction::North.bit(), Direction::South.bit(),
                            Direction::East.bit(), Direction::West.bit());
        assert_eq!(grid.as_bytes(), &[s, e, s | w, n | e, w | e, w | n]);
        assert_spanning_tree(&grid);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = recursive_backtracker(dims(9, 7), &mut SmallRng::seed_from_u64(42));
        let b = recursive_backtracker(dims(9, 7), &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn generate_rejects_empty_grids() {
        assert!(generate(0, 5).is_err());
        assert!(generate(5, 0).is_err());
        assert_spanning_tree(&generate(6, 4).unwrap());
    }

    #[test]
    fn every_cell_is_connected_in_larger_mazes() {
        let grid = recursive_backtracker(dims(30, 20), &mut SmallRng::seed_from_u64(1));
        assert_spanning_tree(&grid);
        assert!(grid.as_bytes().iter().all(|&b| b != 0));
    }

    #[test]
    fn quickcheck_spanning_tree() {
        fn prop(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = (w as usize % 16 + 1, h as usize % 16 + 1);
            let grid = recursive_backtracker(dims(w, h), &mut SmallRng::seed_from_u64(seed));
            let graph = grid.to_graph();
            let full_coverage = w * h == 1 || grid.as_bytes().iter().all(|&b| b != 0);
            TestResult::from_bool(graph.edge_count() == w * h - 1 &&
                                  algo::connected_components(&graph) == 1 &&
                                  full_coverage)
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn walker_carves_one_passage_per_step() {
        let mut carving = Carving::new(dims(2, 2));
        let mut rng = lowest();
        let mut walker = PathWalker::start_at(Coordinate::new(0, 0), &mut carving).unwrap();
        assert_eq!(carving.visited_count(), 1);

        assert_eq!(walker.step(&mut carving, &mut rng), WalkStep::Carved(Coordinate::new(0, 1)));
        assert_eq!(carving.grid().links_count(), 1);
        assert_eq!(walker.step(&mut carving, &mut rng), WalkStep::Carved(Coordinate::new(1, 1)));
        assert_eq!(walker.step(&mut carving, &mut rng), WalkStep::Carved(Coordinate::new(1, 0)));
        assert_eq!(walker.current(), Some(Coordinate::new(1, 0)));
        assert_eq!(walker.step(&mut carving, &mut rng), WalkStep::Done);
        assert!(walker.is_done());
        assert_eq!(walker.step(&mut carving, &mut rng), WalkStep::Done);
        assert_eq!(walker.start(), Coordinate::new(0, 0));
        assert_eq!(carving.visited_count(), 4);
    }

    #[test]
    fn walker_cannot_start_on_a_claimed_cell() {
        let mut carving = Carving::new(dims(2, 2));
        let _first = PathWalker::start_at(Coordinate::new(1, 1), &mut carving).unwrap();
        assert!(PathWalker::start_at(Coordinate::new(1, 1), &mut carving).is_err());
        assert!(PathWalker::start_at(Coordinate::new(2, 1), &mut carving).is_err());
    }

    #[test]
    fn unvisited_scan_order() {
        let mut carving = Carving::new(dims(3, 3));
        let gc = |x, y| Coordinate::new(x, y);
        for &c in &[gc(1, 1), gc(2, 1)] {
            let _ = PathWalker::start_at(c, &mut carving).unwrap();
        }
        // candidate itself
        assert_eq!(carving.unvisited_about(gc(0, 0)).unwrap(), gc(0, 0));
        // row exhausted, so south-east of the candidate
        assert_eq!(carving.unvisited_about(gc(1, 1)).unwrap(), gc(2, 2));

        for &c in &[gc(2, 2)] {
            let _ = PathWalker::start_at(c, &mut carving).unwrap();
        }
        // nothing east or south-east of (1,1) remains, fall back to row-major
        assert_eq!(carving.unvisited_about(gc(1, 1)).unwrap(), gc(0, 0));
    }

    #[test]
    fn unvisited_scan_fails_when_everything_is_claimed() {
        let mut carving = Carving::new(dims(2, 1));
        let _ = PathWalker::start_at(Coordinate::new(0, 0), &mut carving).unwrap();
        let _ = PathWalker::start_at(Coordinate::new(1, 0), &mut carving).unwrap();
        let err = carving.unvisited_about(Coordinate::new(0, 0)).unwrap_err();
        match *err.kind() {
            ErrorKind::NoUnvisitedCells => {}
            ref other => panic!("unexpected error kind {:?}", other),
        }
    }

    #[test]
    fn lowest_choice_field() {
        let mut progress = vec![];
        let field = generate_field_with_progress(dims(2, 2), PathsCount(2), &mut lowest(),
                                                 |visited, total| progress.push((visited, total)))
            .unwrap();
        let (n, s) = (Direction::North.bit(), Direction::South.bit());
        assert_eq!(field.grid.as_bytes(), &[s, s, n, n]);
        assert_eq!(field.starts, vec![Coordinate::new(0, 0), Coordinate::new(1, 0)]);
        assert_eq!(progress, vec![(4, 4), (4, 4)]);
    }

    #[test]
    fn field_progress_is_monotonic_and_complete() {
        let mut last = 0;
        let mut calls = 0;
        let field = generate_field_with_progress(dims(12, 9), PathsCount(3),
                                                 &mut SmallRng::seed_from_u64(5),
                                                 |visited, total| {
                                                     assert_eq!(total, 108);
                                                     assert!(visited >= last);
                                                     last = visited;
                                                     calls += 1;
                                                 })
            .unwrap();
        assert_eq!(last, 108);
        assert!(calls >= 108 / 3);
        assert_eq!(field.starts.len(), 3);
    }

    #[test]
    fn too_many_paths() {
        let err = generate_field(dims(2, 2), PathsCount(5), &mut lowest()).unwrap_err();
        match *err.kind() {
            ErrorKind::TooManyPaths(5, 4) => {}
            ref other => panic!("unexpected error kind {:?}", other),
        }
    }

    #[test]
    fn one_path_per_cell() {
        let field = generate_field(dims(3, 2), PathsCount(6), &mut SmallRng::seed_from_u64(9))
            .unwrap();
        assert!(field.grid.as_bytes().iter().all(|&b| b == 0));
        let mut starts = field.starts.clone();
        starts.sort();
        starts.dedup();
        assert_eq!(starts.len(), 6);
    }

    #[test]
    fn zero_paths_leave_the_grid_untouched() {
        let field = generate_field(dims(3, 3), PathsCount(0), &mut lowest()).unwrap();
        assert!(field.starts.is_empty());
        assert_eq!(field.grid.links_count(), 0);
    }

    #[test]
    fn generator_can_be_ticked_by_hand() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut generator = FieldGenerator::new(dims(5, 5), PathsCount(2), &mut rng).unwrap();
        assert!(generator.is_running());
        assert_eq!(generator.progress(), (2, 25));
        assert_eq!(generator.grid().links_count(), 0);

        assert!(generator.tick(&mut rng));
        assert!(generator.grid().links_count() >= 1);
        while generator.tick(&mut rng) {}
        assert!(!generator.is_running());
        assert_eq!(generator.progress(), (25, 25));

        let field = generator.finish();
        assert_eq!(field.grid.links_count(), 25 - 2);
    }

    fn check_forest(field: &Field, paths: usize) -> bool {
        let grid = &field.grid;
        let cells = grid.size();
        let graph = grid.to_graph();

        let mut components = UnionFind::new(cells);
        for (a, b) in grid.iter_links() {
            let _ = components.union(grid.coordinate_to_index(a).unwrap(),
                                     grid.coordinate_to_index(b).unwrap());
        }
        let mut start_labels = field.starts
            .iter()
            .map(|s| components.find(grid.coordinate_to_index(*s).unwrap()))
            .collect::<Vec<_>>();
        start_labels.sort();
        start_labels.dedup();

        graph.edge_count() == cells - paths &&
        algo::connected_components(&graph) == paths &&
        !algo::is_cyclic_undirected(&graph) &&
        start_labels.len() == paths
    }

    #[test]
    fn quickcheck_fields_are_disjoint_covering_forests() {
        fn prop(w: u8, h: u8, k: u8, seed: u64) -> TestResult {
            let (w, h) = (w as usize % 12 + 1, h as usize % 12 + 1);
            let paths = k as usize % (w * h) + 1;
            let field = generate_field(dims(w, h), PathsCount(paths),
                                       &mut SmallRng::seed_from_u64(seed))
                .unwrap();
            let mut bidirectional = true;
            for coord in field.grid.iter() {
                let mask: DirectionMask = field.grid.get(coord).unwrap();
                for dir in mask.iter() {
                    bidirectional &= field.grid
                        .neighbour_at_direction(coord, dir)
                        .and_then(|n| field.grid.get(n))
                        .map_or(false, |m| m.contains(dir.opposite()));
                }
            }
            TestResult::from_bool(bidirectional && check_forest(&field, paths))
        }
        quickcheck(prop as fn(u8, u8, u8, u64) -> TestResult);
    }
}
