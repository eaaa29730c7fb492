//! Invocation parameters for a search run.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::traits::Heuristic;

/// Which search algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::AStar => "A*",
        })
    }
}

/// When DFS marks a node as visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DfsMarking {
    /// Mark on pop. A node may sit on the stack several times; copies popped
    /// after it was visited are skipped. Yields true depth-first order.
    #[default]
    OnVisit,
    /// Mark on push. Every node is pushed at most once and keeps the
    /// predecessor that discovered it first.
    OnEnqueue,
}

/// Cooperative cancellation flag shared between a caller and a run.
///
/// Runs poll it once per frontier pop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every run holding this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [`cancel`](Self::cancel) was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything a single search invocation needs besides the structure to
/// search.
#[derive(Clone)]
pub struct SearchRequest<'h, N> {
    pub algorithm: Algorithm,
    pub source: N,
    pub goal: Option<N>,
    /// Required for [`Algorithm::AStar`], ignored otherwise.
    pub heuristic: Option<&'h dyn Heuristic<N>>,
    pub cancel: Option<CancelToken>,
    pub dfs_marking: DfsMarking,
    /// Shuffle DFS neighbour order per expansion with this seed.
    pub shuffle_seed: Option<u64>,
}

impl<'h, N> SearchRequest<'h, N> {
    /// A request with no goal, no heuristic and default DFS settings.
    pub fn new(algorithm: Algorithm, source: N) -> Self {
        Self {
            algorithm,
            source,
            goal: None,
            heuristic: None,
            cancel: None,
            dfs_marking: DfsMarking::default(),
            shuffle_seed: None,
        }
    }

    /// Stop as soon as `goal` is settled.
    pub fn with_goal(mut self, goal: N) -> Self {
        self.goal = Some(goal);
        self
    }

    /// Estimate used by A* to order its frontier.
    pub fn with_heuristic(mut self, heuristic: &'h dyn Heuristic<N>) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    /// Poll `token` before every frontier pop.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Choose when DFS marks locations visited.
    pub fn with_dfs_marking(mut self, marking: DfsMarking) -> Self {
        self.dfs_marking = marking;
        self
    }

    /// Shuffle DFS neighbour order from a generator seeded with `seed`.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }
}

impl<N: fmt::Debug> fmt::Debug for SearchRequest<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequest")
            .field("algorithm", &self.algorithm)
            .field("source", &self.source)
            .field("goal", &self.goal)
            .field("heuristic", &self.heuristic.is_some())
            .field("dfs_marking", &self.dfs_marking)
            .field("shuffle_seed", &self.shuffle_seed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_is_shared() {
        let t = CancelToken::new();
        let u = t.clone();
        assert!(!u.is_cancelled());
        t.cancel();
        assert!(u.is_cancelled());
    }

    #[test]
    fn builder_sets_fields() {
        let h = |a: u32, b: u32| pathlab_core::Cost::from(a.abs_diff(b));
        let r = SearchRequest::new(Algorithm::AStar, 1u32)
            .with_goal(4)
            .with_heuristic(&h)
            .with_shuffle_seed(9);
        assert_eq!(r.goal, Some(4));
        assert!(r.heuristic.is_some());
        assert_eq!(r.shuffle_seed, Some(9));
        assert_eq!(r.dfs_marking, DfsMarking::OnVisit);
        assert_eq!(Algorithm::AStar.to_string(), "A*");
    }
}
