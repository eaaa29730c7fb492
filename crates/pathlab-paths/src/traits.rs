use std::fmt::Debug;
use std::hash::Hash;

use pathlab_core::Cost;

/// Neighbour enumeration over a searchable structure.
///
/// This is the only thing the search engine knows about a graph or a grid.
/// `Node` ordering defines the deterministic expansion order: neighbours are
/// visited ascending, and equal-priority heap entries pop lowest first.
pub trait Pather {
    /// Location type: a node id or a cell coordinate.
    type Node: Copy + Eq + Ord + Hash + Debug;

    /// Whether `n` names a location of this structure.
    fn contains(&self, n: Self::Node) -> bool;

    /// Append the neighbours of `n` paired with the cost of moving there.
    /// The caller clears `buf` before calling. Costs must be > 0.
    fn neighbors(&self, n: Self::Node, buf: &mut Vec<(Self::Node, Cost)>);
}

/// Distance estimate used to guide A*.
///
/// Must never overestimate the true remaining cost (admissible) and must be
/// zero at the goal.
pub trait Heuristic<N>: Sync {
    /// Estimated cost from `from` to `goal`.
    fn estimate(&self, from: N, goal: N) -> Cost;
}

impl<N, F> Heuristic<N> for F
where
    F: Fn(N, N) -> Cost + Sync,
{
    fn estimate(&self, from: N, goal: N) -> Cost {
        self(from, goal)
    }
}
