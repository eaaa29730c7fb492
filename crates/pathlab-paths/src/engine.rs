use std::collections::{BinaryHeap, VecDeque};

use pathlab_core::{Cost, Error, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::astar;
use crate::path::{self, Path};
use crate::request::{Algorithm, CancelToken, DfsMarking, SearchRequest};
use crate::state::SearchState;
use crate::traits::{Heuristic, Pather};

/// Observable progress of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchEvent<N> {
    /// `node` is final: its distance and predecessor will not change.
    Settled { node: N, distance: Cost },
    /// `node` got a better tentative distance through `via`.
    Relaxed { node: N, distance: Cost, via: N },
}

impl<N: Copy> SearchEvent<N> {
    /// The location the event is about.
    pub fn node(&self) -> N {
        match *self {
            SearchEvent::Settled { node, .. } | SearchEvent::Relaxed { node, .. } => node,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<N> {
    /// The goal was settled; carries the reconstructed path.
    Found(Path<N>),
    /// The frontier emptied without settling the goal (or no goal was
    /// given and every reachable location was settled).
    Exhausted,
    /// The cancel token was observed. Partial state is kept.
    Cancelled,
}

/// Terminal report of a run.
#[derive(Debug, Clone)]
pub struct SearchResult<N> {
    pub algorithm: Algorithm,
    pub outcome: Outcome<N>,
    /// Number of settled locations, source and goal included.
    pub settled: usize,
    /// Frontier entries popped and thrown away because the location had
    /// already been settled or a cheaper entry superseded them.
    pub stale_discarded: usize,
    /// Final per-run state, kept for inspection after any outcome.
    pub state: SearchState<N>,
}

impl<N> SearchResult<N> {
    /// The reconstructed path when the goal was found.
    pub fn path(&self) -> Option<&Path<N>> {
        match &self.outcome {
            Outcome::Found(p) => Some(p),
            _ => None,
        }
    }

    /// Whether the goal was settled.
    pub fn is_found(&self) -> bool {
        matches!(self.outcome, Outcome::Found(_))
    }

    /// Whether the run stopped on its cancel token.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, Outcome::Cancelled)
    }

    /// Total cost of the found path.
    pub fn cost(&self) -> Option<Cost> {
        self.path().map(|p| p.cost)
    }
}

// ---------------------------------------------------------------------------
// Frontier entries
// ---------------------------------------------------------------------------

/// Priority-queue entry ordered by `(f, h, node)`, smallest first.
///
/// Dijkstra uses `h = 0` so the key degenerates to `(g, node)`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeapEntry<N> {
    pub(crate) f: Cost,
    pub(crate) h: Cost,
    pub(crate) g: Cost,
    pub(crate) node: N,
}

impl<N: Ord> Ord for HeapEntry<N> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest key first.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl<N: Ord> PartialOrd for HeapEntry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Ord> PartialEq for HeapEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl<N: Ord> Eq for HeapEntry<N> {}

/// DFS stack entry. Under [`DfsMarking::OnVisit`] the tentative values ride
/// on the entry until it is popped.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StackEntry<N> {
    pub(crate) node: N,
    pub(crate) parent: Option<N>,
    pub(crate) dist: Cost,
    pub(crate) hops: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status<N> {
    Running,
    Found(N),
    Exhausted,
    Cancelled,
}

// ---------------------------------------------------------------------------
// SearchRun
// ---------------------------------------------------------------------------

/// One execution of a search algorithm over a borrowed structure.
///
/// A `SearchRun` is a lazy, finite iterator of [`SearchEvent`]s. Nothing is
/// computed ahead of the consumer: each call to `next` advances the
/// algorithm just far enough to produce the next event. Call
/// [`finish`](Self::finish) to drain the rest and obtain the
/// [`SearchResult`].
pub struct SearchRun<'a, S: Pather> {
    space: &'a S,
    pub(crate) algorithm: Algorithm,
    source: S::Node,
    pub(crate) goal: Option<S::Node>,
    pub(crate) heuristic: Option<&'a dyn Heuristic<S::Node>>,
    cancel: Option<CancelToken>,
    pub(crate) marking: DfsMarking,
    rng: Option<StdRng>,
    pub(crate) state: SearchState<S::Node>,
    pub(crate) queue: VecDeque<S::Node>,
    pub(crate) stack: Vec<StackEntry<S::Node>>,
    pub(crate) heap: BinaryHeap<HeapEntry<S::Node>>,
    pending: VecDeque<SearchEvent<S::Node>>,
    status: Status<S::Node>,
    pub(crate) stale: usize,
    nbuf: Vec<(S::Node, Cost)>,
}

/// Start a search over `space`.
///
/// Validates the request eagerly: locations outside `space` fail with
/// [`Error::Bounds`]; A* without a goal or a usable heuristic fails with
/// [`Error::Configuration`]. The returned run has not expanded anything
/// yet.
pub fn run<'a, S: Pather>(
    space: &'a S,
    req: SearchRequest<'a, S::Node>,
) -> Result<SearchRun<'a, S>> {
    if !space.contains(req.source) {
        return Err(Error::bounds(req.source));
    }
    if let Some(goal) = req.goal {
        if !space.contains(goal) {
            return Err(Error::bounds(goal));
        }
    }
    let heuristic = match req.algorithm {
        Algorithm::AStar => Some(astar::validate(req.source, req.goal, req.heuristic)?),
        _ => None,
    };
    let rng = match req.algorithm {
        Algorithm::Dfs => req.shuffle_seed.map(StdRng::seed_from_u64),
        _ => None,
    };

    log::debug!(
        "{} search from {:?} to {:?}",
        req.algorithm,
        req.source,
        req.goal
    );

    let mut run = SearchRun {
        space,
        algorithm: req.algorithm,
        source: req.source,
        goal: req.goal,
        heuristic,
        cancel: req.cancel,
        marking: req.dfs_marking,
        rng,
        state: SearchState::default(),
        queue: VecDeque::new(),
        stack: Vec::new(),
        heap: BinaryHeap::new(),
        pending: VecDeque::new(),
        status: Status::Running,
        stale: 0,
        nbuf: Vec::with_capacity(8),
    };
    run.seed();
    Ok(run)
}

/// Run a search to completion, returning the full event log and the result.
pub fn run_to_end<S: Pather>(
    space: &S,
    req: SearchRequest<'_, S::Node>,
) -> Result<(Vec<SearchEvent<S::Node>>, SearchResult<S::Node>)> {
    let mut run = run(space, req)?;
    let events: Vec<_> = run.by_ref().collect();
    Ok((events, run.finish()?))
}

impl<'a, S: Pather> SearchRun<'a, S> {
    /// Put the source on the frontier.
    fn seed(&mut self) {
        let src = self.source;
        match self.algorithm {
            Algorithm::Bfs => {
                self.state.offer(src, 0, 0, None);
                self.queue.push_back(src);
            }
            Algorithm::Dfs => {
                if self.marking == DfsMarking::OnEnqueue {
                    self.state.offer(src, 0, 0, None);
                }
                self.stack.push(StackEntry {
                    node: src,
                    parent: None,
                    dist: 0,
                    hops: 0,
                });
            }
            Algorithm::Dijkstra | Algorithm::AStar => {
                self.state.offer(src, 0, 0, None);
                let h = self.estimate(src);
                self.heap.push(HeapEntry {
                    f: h,
                    h,
                    g: 0,
                    node: src,
                });
            }
        }
    }

    /// The algorithm this run executes.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Whether the run has reached a terminal status. Buffered events may
    /// still be pending.
    pub fn is_done(&self) -> bool {
        self.status != Status::Running
    }

    /// Advance by exactly one frontier pop.
    fn step(&mut self) {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            log::debug!(
                "{} search cancelled after {} settled",
                self.algorithm,
                self.state.settled_order().len()
            );
            self.status = Status::Cancelled;
            return;
        }
        match self.algorithm {
            Algorithm::Bfs => self.step_bfs(),
            Algorithm::Dfs => self.step_dfs(),
            Algorithm::Dijkstra | Algorithm::AStar => self.step_best_first(),
        }
    }

    /// Mark the frontier as empty.
    pub(crate) fn exhaust(&mut self) {
        self.status = Status::Exhausted;
    }

    /// Finalise `n` and report whether it is the goal.
    pub(crate) fn settle(&mut self, n: S::Node) -> bool {
        self.state.settle(n);
        let distance = self.state.cost_at(n);
        log::trace!("{} settled {:?} at {}", self.algorithm, n, distance);
        self.pending.push_back(SearchEvent::Settled { node: n, distance });
        if self.goal == Some(n) {
            self.status = Status::Found(n);
            return true;
        }
        false
    }

    /// Record an improved tentative value for `n` reached through `via`.
    pub(crate) fn relax(&mut self, n: S::Node, dist: Cost, hops: u32, via: S::Node) {
        if self.state.offer(n, dist, hops, Some(via)) {
            self.pending.push_back(SearchEvent::Relaxed {
                node: n,
                distance: dist,
                via,
            });
        }
    }

    /// Neighbours of `n` in expansion order: ascending, or shuffled when a
    /// seed was given. Hand the buffer back with [`Self::restore_neighbors`].
    pub(crate) fn take_neighbors(&mut self, n: S::Node) -> Vec<(S::Node, Cost)> {
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        self.space.neighbors(n, &mut nbuf);
        nbuf.sort_unstable_by_key(|&(m, _)| m);
        if let Some(rng) = self.rng.as_mut() {
            nbuf.shuffle(rng);
        }
        nbuf
    }

    pub(crate) fn restore_neighbors(&mut self, nbuf: Vec<(S::Node, Cost)>) {
        self.nbuf = nbuf;
    }

    /// Heuristic estimate towards the goal, or 0 when the run has none.
    pub(crate) fn estimate(&self, n: S::Node) -> Cost {
        match (self.heuristic, self.goal) {
            (Some(h), Some(goal)) => h.estimate(n, goal),
            _ => 0,
        }
    }

    /// Drain the remaining events and produce the terminal result.
    ///
    /// Fails only if predecessor links are corrupt ([`Error::Cycle`]).
    pub fn finish(mut self) -> Result<SearchResult<S::Node>> {
        self.by_ref().for_each(drop);
        let outcome = match self.status {
            Status::Found(goal) => Outcome::Found(path::reconstruct(&self.state, goal)?),
            Status::Cancelled => Outcome::Cancelled,
            // Draining leaves no run in `Running`.
            Status::Exhausted | Status::Running => Outcome::Exhausted,
        };
        let settled = self.state.settled_order().len();
        log::debug!(
            "{} search finished: {}, settled {}, stale {}",
            self.algorithm,
            match &outcome {
                Outcome::Found(p) => format!("found cost {}", p.cost),
                Outcome::Exhausted => "exhausted".to_string(),
                Outcome::Cancelled => "cancelled".to_string(),
            },
            settled,
            self.stale
        );
        Ok(SearchResult {
            algorithm: self.algorithm,
            outcome,
            settled,
            stale_discarded: self.stale,
            state: self.state,
        })
    }
}

impl<S: Pather> Iterator for SearchRun<'_, S> {
    type Item = SearchEvent<S::Node>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(ev) = self.pending.pop_front() {
                return Some(ev);
            }
            if self.status != Status::Running {
                return None;
            }
            self.step();
        }
    }
}

impl<S: Pather> std::iter::FusedIterator for SearchRun<'_, S> {}
