//! Instrumented graph search over graphs and grids.
//!
//! This crate runs the classic traversal and shortest-path algorithms as
//! stepwise, observable processes:
//!
//! - **BFS** fewest-edges traversal ([`Algorithm::Bfs`])
//! - **DFS** with selectable visit marking and optional seeded shuffling
//!   ([`Algorithm::Dfs`], [`DfsMarking`])
//! - **Dijkstra** shortest paths with lazy deletion ([`Algorithm::Dijkstra`],
//!   [`distance_map`])
//! - **A\*** goal-directed search ([`Algorithm::AStar`])
//!
//! A search is started with [`run`], which returns a [`SearchRun`]: a lazy
//! iterator of [`SearchEvent`]s. Draining it with [`SearchRun::finish`]
//! yields a [`SearchResult`] with the [`Outcome`], the settled count and the
//! per-run [`SearchState`]. [`race`] drives two runs over the same structure
//! on separate threads.
//!
//! # Trait hierarchy
//!
//! | Trait | Role |
//! |---|---|
//! | [`Pather`] | neighbour enumeration with transition costs |
//! | [`Heuristic`] | admissible distance estimate for A* |
//!
//! [`Pather`] is implemented for [`pathlab_core::Graph`] (by node id) and
//! [`pathlab_core::Grid`] (by cell coordinate); the engine never looks past
//! it.

mod astar;
mod bfs;
mod dfs;
mod dijkstra;
mod distance;
mod engine;
mod path;
mod race;
mod request;
mod spaces;
mod state;
mod traits;

pub use dijkstra::distance_map;
pub use distance::{Euclidean, Manhattan, chebyshev, manhattan};
pub use engine::{Outcome, SearchEvent, SearchResult, SearchRun, run, run_to_end};
pub use path::{Path, path_cost, reconstruct};
pub use race::{Lane, RaceReport, race, race_with};
pub use request::{Algorithm, CancelToken, DfsMarking, SearchRequest};
pub use state::{PathNode, SearchState, UNREACHABLE};
pub use traits::{Heuristic, Pather};
