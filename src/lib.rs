//! **mazes_gl** carves perfect mazes and multi-path garland fields on square grids, and
//! encodes generated geometry into growable vertex/index buffers for a rendering backend.

pub mod buffers;
pub mod cells;
pub mod config;
pub mod directions;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_displays;
pub mod grid_traits;
pub mod instances;
pub mod logging;
pub mod primitives;
pub mod shapes;
pub mod units;
mod utils;
