use std::fmt;

use crate::cells::Coordinate;
use crate::directions::Direction;
use crate::grid::DirectionGrid;
use crate::grid_traits::GridDisplay;
use crate::shapes::TileShape;
use crate::utils::{self, FnvHashSet};


/// Marks path start cells (generator cells of a garland field) with an 'S'.
#[derive(Debug)]
pub struct StartPointsDisplay {
    start_coordinates: FnvHashSet<Coordinate>,
}
impl StartPointsDisplay {
    pub fn new(starts: &[Coordinate]) -> StartPointsDisplay {
        let mut start_coordinates = utils::fnv_hashset(starts.len());
        start_coordinates.extend(starts.iter().cloned());
        StartPointsDisplay { start_coordinates }
    }
}
impl GridDisplay for StartPointsDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> String {
        if self.start_coordinates.contains(&coord) {
            String::from(" S ")
        } else {
            String::from("   ")
        }
    }
}


/// Shows the garland tile kind of every cell: Light, Corner, Line, Tee or Cross.
#[derive(Debug)]
pub struct TileShapesDisplay<'a> {
    grid: &'a DirectionGrid,
    starts: StartPointsDisplay,
}
impl<'a> TileShapesDisplay<'a> {
    pub fn new(grid: &'a DirectionGrid, starts: &[Coordinate]) -> TileShapesDisplay<'a> {
        TileShapesDisplay {
            grid,
            starts: StartPointsDisplay::new(starts),
        }
    }
}
impl<'a> GridDisplay for TileShapesDisplay<'a> {
    fn render_cell_body(&self, coord: Coordinate) -> String {
        if self.starts.start_coordinates.contains(&coord) {
            return self.starts.render_cell_body(coord);
        }
        let shape = self.grid
            .get(coord)
            .and_then(|mask| TileShape::from_mask(mask).ok());
        match shape.map(|tile| tile.shape) {
            Some(TileShape::Light) => String::from(" * "),
            Some(TileShape::Corner) => String::from(" c "),
            Some(TileShape::Line) => String::from(" | "),
            Some(TileShape::Tee) => String::from(" t "),
            Some(TileShape::Cross) => String::from(" + "),
            None => String::from(" ? "),
        }
    }
}


/// Box drawing rendering of the grid walls with an optional per cell body.
pub fn render(grid: &DirectionGrid, grid_display: Option<&dyn GridDisplay>) -> String {
    const WALL_L: &str = "╴";
    const WALL_R: &str = "╶";
    const WALL_U: &str = "╵";
    const WALL_D: &str = "╷";
    const WALL_LR_3: &str = "───";
    const WALL_LR: &str = "─";
    const WALL_UD: &str = "│";
    const WALL_LD: &str = "┐";
    const WALL_RU: &str = "└";
    const WALL_LU: &str = "┘";
    const WALL_RD: &str = "┌";
    const WALL_LRU: &str = "┴";
    const WALL_LRD: &str = "┬";
    const WALL_LRUD: &str = "┼";
    const WALL_RUD: &str = "├";
    const WALL_LUD: &str = "┤";
    let default_cell_body = String::from("   ");

    let columns_count = grid.dimensions().width().0;
    let rows_count = grid.dimensions().height().0;

    // Start by special case rendering the text for the north most boundary
    let mut output = String::from(WALL_RD);
    for x in 0..columns_count {
        let coord = Coordinate::new(x as u32, 0);
        output.push_str(WALL_LR_3);
        let is_east_open = grid.is_neighbour_linked(coord, Direction::East);
        if is_east_open {
            output.push_str(WALL_LR);
        } else {
            let is_last_cell = x == (columns_count - 1);
            if is_last_cell {
                output.push_str(WALL_LD);
            } else {
                output.push_str(WALL_LRD);
            }
        }
    }
    output.push('\n');

    for y in 0..rows_count {

        let is_last_row = y == (rows_count - 1);

        // The top section of the cell is done by the previous row.
        let mut row_middle_section_render = String::from(WALL_UD);
        let mut row_bottom_section_render = String::new();

        for x in 0..columns_count {
            let cell_coord = Coordinate::new(x as u32, y as u32);

            let is_first_column = x == 0;
            let is_last_column = x == (columns_count - 1);
            let east_open = grid.is_neighbour_linked(cell_coord, Direction::East);
            let south_open = grid.is_neighbour_linked(cell_coord, Direction::South);

            // Each cell uses the southern wall of the cell above it as its own northern wall,
            // so only its body, its eastern boundary and its southern boundary are drawn here.
            let east_boundary = if east_open { " " } else { WALL_UD };

            if let Some(displayer) = grid_display {
                row_middle_section_render.push_str(displayer.render_cell_body(cell_coord).as_str());
            } else {
                row_middle_section_render.push_str(default_cell_body.as_str());
            }
            row_middle_section_render.push_str(east_boundary);

            if is_first_column {
                row_bottom_section_render = if is_last_row {
                    String::from(WALL_RU)
                } else if south_open {
                    String::from(WALL_UD)
                } else {
                    String::from(WALL_RUD)
                };
            }
            let south_boundary = if south_open { "   " } else { WALL_LR_3 };
            row_bottom_section_render.push_str(south_boundary);

            let corner = match (is_last_row, is_last_column) {
                (true, true) => WALL_LU,
                (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                (false, false) => {
                    let access_se_from_east =
                        grid.neighbour_at_direction(cell_coord, Direction::East)
                            .map_or(false, |c| grid.is_neighbour_linked(c, Direction::South));
                    let access_se_from_south =
                        grid.neighbour_at_direction(cell_coord, Direction::South)
                            .map_or(false, |c| grid.is_neighbour_linked(c, Direction::East));
                    let show_right_section = !access_se_from_east;
                    let show_down_section = !access_se_from_south;
                    let show_up_section = !east_open;
                    let show_left_section = !south_open;

                    match (show_left_section,
                           show_right_section,
                           show_up_section,
                           show_down_section) {
                        (true, true, true, true) => WALL_LRUD,
                        (true, true, true, false) => WALL_LRU,
                        (true, true, false, true) => WALL_LRD,
                        (true, false, true, true) => WALL_LUD,
                        (false, true, true, true) => WALL_RUD,
                        (true, true, false, false) => WALL_LR,
                        (false, false, true, true) => WALL_UD,
                        (false, true, true, false) => WALL_RU,
                        (true, false, false, true) => WALL_LD,
                        (true, false, true, false) => WALL_LU,
                        (false, true, false, true) => WALL_RD,
                        (true, false, false, false) => WALL_L,
                        (false, true, false, false) => WALL_R,
                        (false, false, true, false) => WALL_U,
                        (false, false, false, true) => WALL_D,
                        _ => " ",
                    }
                }
            };

            row_bottom_section_render.push_str(corner);
        }

        output.push_str(row_middle_section_render.as_ref());
        output.push('\n');
        output.push_str(row_bottom_section_render.as_ref());
        output.push('\n');
    }

    output
}

impl fmt::Display for DirectionGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render(self, None))
    }
}
