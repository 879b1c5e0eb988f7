use docopt::Docopt;
use log::{debug, info};
use mazes_gl::{
    config::GridConfig,
    generators,
    grid::DirectionGrid,
    grid_displays::{self, StartPointsDisplay, TileShapesDisplay},
    instances::MazeInstances,
    logging::{self, LoggingConfig},
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
};

const USAGE: &str = "Mazes GL

Usage:
    maze_driver -h | --help
    maze_driver maze [--width=<w> --height=<h>] [--seed=<s>] [--save-edges=<path>] [--log=<filter>]
    maze_driver field --paths=<n> [--width=<w> --height=<h>] [--seed=<s>] [--log=<filter>]
    maze_driver instances [--width=<w> --height=<h>] [--seed=<s>] [--log=<filter>]

Options:
    -h --help              Show this screen.
    --width=<w>            The grid width in a w*h grid [default: 20].
    --height=<h>           The grid height in a w*h grid [default: 20].
    --paths=<n>            Number of paths grown in lockstep to make a garland field.
    --seed=<s>             Seed the random source for a reproducible result.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --log=<filter>         Log filter such as 'debug' or 'mazes_gl=trace'. Overrides RUST_LOG.
";
#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_maze: bool,
    cmd_field: bool,
    cmd_instances: bool,
    flag_width: usize,
    flag_height: usize,
    flag_paths: Option<usize>,
    flag_seed: Option<u64>,
    flag_save_edges: String,
    flag_log: Option<String>,
}

#[allow(deprecated)]
mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazes_gl::errors::Error, ::mazes_gl::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: DriverArgs = match Docopt::new(USAGE).and_then(|d| d.deserialize()) {
        Ok(args) => args,
        Err(e) if e.fatal() => return Err(e.into()),
        // --help
        Err(e) => e.exit(),
    };

    logging::init_logging(LoggingConfig {
        env_filter: args.flag_log.clone(),
        ..LoggingConfig::default()
    });

    let config = GridConfig {
        width: args.flag_width,
        height: args.flag_height,
        path_count: args.flag_paths,
    };
    let mut rng = match args.flag_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    if args.cmd_field {
        run_field(&config, &mut rng)?;
    } else if args.cmd_instances {
        run_instances(&config, &mut rng)?;
    } else if args.cmd_maze {
        run_maze(&config, &args, &mut rng)?;
    }

    Ok(())
}

fn run_maze(config: &GridConfig, args: &DriverArgs, rng: &mut SmallRng) -> Result<()> {

    let maze_grid = generators::recursive_backtracker(config.dimensions()?, rng);

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    println!("{}", maze_grid);
    Ok(())
}

fn run_field(config: &GridConfig, rng: &mut SmallRng) -> Result<()> {

    let paths = config.paths()?.ok_or("A garland field needs --paths")?;
    let field = generators::generate_field_with_progress(config.dimensions()?,
                                                         paths,
                                                         rng,
                                                         |visited, total| {
                                                             debug!("field progress {}/{}",
                                                                    visited, total)
                                                         })?;
    info!("field path starts: {:?}", field.starts);

    let starts_display = StartPointsDisplay::new(&field.starts);
    println!("{}", grid_displays::render(&field.grid, Some(&starts_display)));

    let shapes_display = TileShapesDisplay::new(&field.grid, &field.starts);
    println!("{}", grid_displays::render(&field.grid, Some(&shapes_display)));
    Ok(())
}

fn run_instances(config: &GridConfig, rng: &mut SmallRng) -> Result<()> {

    let maze_grid = generators::recursive_backtracker(config.dimensions()?, rng);
    let mut instances = MazeInstances::new();
    let count = instances.encode(&maze_grid)?;

    println!("{} instances: {} cell bytes, {} kind bytes",
             count,
             instances.cells().bytes(),
             instances.kinds().bytes());
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &DirectionGrid, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    let vertices_count = maze_grid.size();
    let edges_count = maze_grid.links_count();
    graph_data.push_str(vertices_count.to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(edges_count.to_string().as_ref());
    graph_data.push('\n');

    for (src, dst) in maze_grid.iter_links() {
        let index_a = maze_grid
            .coordinate_to_index(src)
            .ok_or("Links iter gave a coordinate outside the grid")?;
        let index_b = maze_grid
            .coordinate_to_index(dst)
            .ok_or("Links iter gave a coordinate outside the grid")?;
        let src_as_1_based_index = index_a + 1;
        let dst_as_1_based_index = index_b + 1;

        graph_data.push_str(src_as_1_based_index.to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
