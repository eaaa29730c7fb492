//! Maze generation for search visualisation.
//!
//! [`generate`] builds a perfect maze on a [`pathlab_core::Grid`] with a
//! depth-first backtracker, forces the start and goal open, then sprinkles
//! difficult terrain. [`MazeGen`] exposes the individual passes.

pub mod maze;

pub use maze::{Maze, MazeConfig, MazeGen, generate};
