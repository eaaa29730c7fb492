use pathlab_core::Result;

use crate::engine::{self, HeapEntry, SearchRun};
use crate::request::{Algorithm, SearchRequest};
use crate::state::PathNode;
use crate::traits::Pather;

impl<S: Pather> SearchRun<'_, S> {
    /// One priority-queue pop, shared by Dijkstra and A*.
    ///
    /// Entries are never removed on relaxation, only superseded. A popped
    /// entry whose location is already settled, or whose cost is above the
    /// best recorded one, is stale and gets dropped here.
    pub(crate) fn step_best_first(&mut self) {
        let Some(entry) = self.heap.pop() else {
            self.exhaust();
            return;
        };
        let cur = entry.node;
        let Some(rec) = self.state.record(cur).copied() else {
            return;
        };
        if rec.settled || entry.g > rec.dist {
            self.stale += 1;
            log::trace!("{} dropped stale entry {:?} at {}", self.algorithm, cur, entry.g);
            return;
        }
        if self.settle(cur) {
            return;
        }

        let nbuf = self.take_neighbors(cur);
        for &(n, w) in nbuf.iter() {
            if self.state.is_settled(n) {
                continue;
            }
            let tentative = rec.dist.saturating_add(w);
            if self.state.distance(n).is_some_and(|d| tentative >= d) {
                continue;
            }
            self.relax(n, tentative, rec.hops + 1, cur);
            let h = self.estimate(n);
            self.heap.push(HeapEntry {
                f: tentative.saturating_add(h),
                h,
                g: tentative,
                node: n,
            });
        }
        self.restore_neighbors(nbuf);
    }
}

/// Single-source Dijkstra over everything reachable from `source`.
///
/// Returns every settled location with its shortest cost, in settle order
/// (so costs are non-decreasing).
pub fn distance_map<S: Pather>(space: &S, source: S::Node) -> Result<Vec<PathNode<S::Node>>> {
    let res = engine::run(space, SearchRequest::new(Algorithm::Dijkstra, source))?.finish()?;
    Ok(res.state.settled_nodes())
}
