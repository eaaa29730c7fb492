//! **pathlab-core**: models for stepwise search visualisation (core types).
//!
//! This crate provides the structures every search runs over: geometry
//! primitives, an undirected weighted [`Graph`] of positioned nodes, a
//! terrain [`Grid`] for mazes, and the shared [`Error`] type.
//!
//! Neither model carries per-search state. Distances, predecessors and
//! visited flags live in the search run that owns them, so one model can be
//! searched by several runs at once.

pub mod error;
pub mod geom;
pub mod graph;
pub mod grid;

pub use error::{Error, Result};
pub use geom::{Point, Range};
pub use graph::{Edge, Graph, MAX_WEIGHT, Node, NodeId};
pub use grid::{DIFFICULT_COST, Grid, Terrain};

/// Transition and path cost. Always positive for a single step.
///
/// Wider than any single weight so that path sums cannot overflow.
pub type Cost = i64;
