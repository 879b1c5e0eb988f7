//! Crate wide `Error`, `ErrorKind`, `Result` and `ResultExt` created by `error_chain!`.
//!
//! Other modules `use crate::errors::*;` to get access to everything.

#![allow(deprecated)]

use error_chain::*;
pub use error_chain::bail;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        InvalidDimensions(width: usize, height: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions {}x{}: both sides must be at least 1", width, height)
        }
        TooManyPaths(paths: usize, cells: usize) {
            description("more paths than grid cells")
            display("cannot start {} paths on a grid of {} cells", paths, cells)
        }
        NoUnvisitedCells {
            description("there are no unvisited cells")
            display("there are no unvisited cells left to start a path from")
        }
        InvalidCoordinate(x: u32, y: u32) {
            description("grid coordinate out of bounds")
            display("grid coordinate ({}, {}) is out of bounds", x, y)
        }
        InvalidDirectionBits(bits: u8) {
            description("invalid direction bitmask")
            display("direction bitmask {:#06b} has bits outside North|South|East|West", bits)
        }
        UnsupportedShape(bits: u8) {
            description("unsupported tile shape")
            display("no tile shape for direction bitmask {:#06b}", bits)
        }
        IndexOutOfRange(index: u32) {
            description("vertex index does not fit in 16 bits")
            display("vertex index {} does not fit in 16 bits", index)
        }
        MalformedPrimitive(vertices: usize, normals: usize) {
            description("primitive has a mismatched normal count")
            display("primitive with {} vertices has {} normals, expected 1 or one per vertex",
                    vertices, normals)
        }
    }
}
