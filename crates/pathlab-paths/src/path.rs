//! Path reconstruction from predecessor links.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use pathlab_core::{Cost, Error, Result};

use crate::state::SearchState;
use crate::traits::Pather;

/// A solution path from source to goal, both included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path<N> {
    pub nodes: Vec<N>,
    /// The goal's final distance: the sum of transition costs along `nodes`.
    pub cost: Cost,
}

impl<N: Copy> Path<N> {
    /// Number of transitions (one less than the number of nodes).
    pub fn edge_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// First location of the path.
    pub fn source(&self) -> Option<N> {
        self.nodes.first().copied()
    }

    /// Last location of the path.
    pub fn goal(&self) -> Option<N> {
        self.nodes.last().copied()
    }
}

/// Walk predecessor links back from `goal` to the source.
///
/// Fails with [`Error::NoPath`] if `goal` was never settled, and with
/// [`Error::Cycle`] if the links loop instead of ending at the source.
pub fn reconstruct<N>(state: &SearchState<N>, goal: N) -> Result<Path<N>>
where
    N: Copy + Eq + Hash + Debug,
{
    if !state.is_settled(goal) {
        return Err(Error::no_path(goal));
    }
    let cost = state.cost_at(goal);

    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    let mut cur = Some(goal);
    while let Some(n) = cur {
        if !seen.insert(n) {
            return Err(Error::cycle(n));
        }
        nodes.push(n);
        cur = state.predecessor(n);
    }
    nodes.reverse();
    Ok(Path { nodes, cost })
}

/// Replay `nodes` over `space`, summing transition costs.
///
/// Returns `None` if any consecutive pair is not a neighbour transition or
/// the total does not fit in a [`Cost`].
pub fn path_cost<S: Pather>(space: &S, nodes: &[S::Node]) -> Option<Cost> {
    let mut buf = Vec::with_capacity(8);
    let mut total: Cost = 0;
    for pair in nodes.windows(2) {
        buf.clear();
        space.neighbors(pair[0], &mut buf);
        let &(_, w) = buf.iter().find(|&&(n, _)| n == pair[1])?;
        total = total.checked_add(w)?;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathlab_core::{Graph, Grid, Point};

    #[test]
    fn walks_back_to_source() {
        let mut s = SearchState::default();
        s.offer(0u32, 0, 0, None);
        s.offer(1, 2, 1, Some(0));
        s.offer(2, 4, 2, Some(1));
        for n in [0, 1, 2] {
            s.settle(n);
        }
        let p = reconstruct(&s, 2).unwrap();
        assert_eq!(p.nodes, vec![0, 1, 2]);
        assert_eq!(p.cost, 4);
        assert_eq!(p.edge_count(), 2);
        assert_eq!(p.source(), Some(0));
        assert_eq!(p.goal(), Some(2));
    }

    #[test]
    fn unsettled_goal_is_no_path() {
        let mut s = SearchState::default();
        s.offer(0u32, 0, 0, None);
        s.settle(0);
        s.offer(1, 3, 1, Some(0));
        assert!(matches!(reconstruct(&s, 1), Err(Error::NoPath { .. })));
        assert!(matches!(reconstruct(&s, 9), Err(Error::NoPath { .. })));
    }

    #[test]
    fn predecessor_loop_is_detected() {
        let mut s = SearchState::default();
        s.offer(1u32, 1, 1, Some(2));
        s.offer(2, 1, 1, Some(1));
        s.settle(1);
        s.settle(2);
        assert!(matches!(reconstruct(&s, 1), Err(Error::Cycle { .. })));
    }

    /// A line of nodes where every step costs as much as a `Cost` can hold.
    struct HeavyLine;

    impl Pather for HeavyLine {
        type Node = u32;

        fn contains(&self, _: u32) -> bool {
            true
        }

        fn neighbors(&self, n: u32, buf: &mut Vec<(u32, Cost)>) {
            buf.push((n + 1, Cost::MAX));
        }
    }

    #[test]
    fn path_cost_overflow_is_none() {
        assert_eq!(path_cost(&HeavyLine, &[0, 1]), Some(Cost::MAX));
        assert_eq!(path_cost(&HeavyLine, &[0, 1, 2]), None);
    }

    #[test]
    fn path_cost_replays_transitions() {
        let g = Graph::from_edges([(0, 1, 2), (1, 2, 3)]).unwrap();
        assert_eq!(path_cost(&g, &[0, 1, 2]), Some(5));
        assert_eq!(path_cost(&g, &[0, 2]), None);
        assert_eq!(path_cost(&g, &[1]), Some(0));

        let grid = Grid::from_rows(&[".~", "#."]).unwrap();
        assert_eq!(
            path_cost(&grid, &[Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)]),
            Some(6)
        );
    }
}
