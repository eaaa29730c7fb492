use crate::engine::{SearchRun, StackEntry};
use crate::request::DfsMarking;
use crate::traits::Pather;

impl<S: Pather> SearchRun<'_, S> {
    /// One DFS pop, following the run's [`DfsMarking`].
    pub(crate) fn step_dfs(&mut self) {
        let Some(entry) = self.stack.pop() else {
            self.exhaust();
            return;
        };
        let cur = entry.node;

        match self.marking {
            DfsMarking::OnVisit => {
                if self.state.is_settled(cur) {
                    self.stale += 1;
                    return;
                }
                self.state.offer(cur, entry.dist, entry.hops, entry.parent);
            }
            DfsMarking::OnEnqueue => {}
        }
        if self.settle(cur) {
            return;
        }
        let Some(rec) = self.state.record(cur).copied() else {
            return;
        };

        let nbuf = self.take_neighbors(cur);
        let first = self.stack.len();
        for &(n, w) in nbuf.iter() {
            let dist = rec.dist.saturating_add(w);
            match self.marking {
                DfsMarking::OnVisit => {
                    if self.state.is_settled(n) {
                        continue;
                    }
                }
                DfsMarking::OnEnqueue => {
                    if self.state.is_discovered(n) {
                        continue;
                    }
                    self.relax(n, dist, rec.hops + 1, cur);
                }
            }
            self.stack.push(StackEntry {
                node: n,
                parent: Some(cur),
                dist,
                hops: rec.hops + 1,
            });
        }
        // First neighbour in expansion order goes on top.
        self.stack[first..].reverse();
        self.restore_neighbors(nbuf);
    }
}

#[cfg(test)]
mod tests {
    use pathlab_core::{Graph, Grid, Point};

    use crate::engine::{SearchEvent, run_to_end};
    use crate::path::path_cost;
    use crate::request::{Algorithm, DfsMarking, SearchRequest};

    // 0 - 1 - 3
    //  \  |
    //    2
    fn diamond() -> Graph {
        Graph::from_edges([(0, 1, 1), (0, 2, 1), (1, 2, 1), (1, 3, 1)]).unwrap()
    }

    #[test]
    fn on_visit_goes_deep_first() {
        let g = diamond();
        let (_, res) = run_to_end(&g, SearchRequest::new(Algorithm::Dfs, 0)).unwrap();
        assert_eq!(res.state.settled_order(), &[0, 1, 2, 3]);
        assert_eq!(res.state.predecessor(2), Some(1));
        assert_eq!(res.state.hops(2), Some(2));
        // 2 was pushed by 0 and again by 1; the copy from 0 is skipped.
        assert_eq!(res.stale_discarded, 1);
    }

    #[test]
    fn on_enqueue_keeps_first_discoverer() {
        let g = diamond();
        let (events, res) = run_to_end(
            &g,
            SearchRequest::new(Algorithm::Dfs, 0).with_dfs_marking(DfsMarking::OnEnqueue),
        )
        .unwrap();
        assert_eq!(res.state.settled_order(), &[0, 1, 3, 2]);
        assert_eq!(res.state.predecessor(2), Some(0));
        assert_eq!(res.stale_discarded, 0);
        let relaxed: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::Relaxed { node, .. } => Some(*node),
                _ => None,
            })
            .collect();
        assert_eq!(relaxed, vec![1, 2, 3]);
    }

    #[test]
    fn on_visit_emits_no_relaxations() {
        let g = diamond();
        let (events, _) = run_to_end(&g, SearchRequest::new(Algorithm::Dfs, 0)).unwrap();
        assert!(events.iter().all(|e| matches!(e, SearchEvent::Settled { .. })));
    }

    #[test]
    fn found_path_is_walkable() {
        let g = Grid::from_rows(&[
            "....#",
            ".##.#",
            ".#~..",
            ".#.#.",
            "...#.",
        ])
        .unwrap();
        let goal = Point::new(4, 4);
        for marking in [DfsMarking::OnVisit, DfsMarking::OnEnqueue] {
            let (_, res) = run_to_end(
                &g,
                SearchRequest::new(Algorithm::Dfs, Point::ZERO)
                    .with_goal(goal)
                    .with_dfs_marking(marking),
            )
            .unwrap();
            let path = res.path().unwrap();
            assert_eq!(path.nodes.first(), Some(&Point::ZERO));
            assert_eq!(path.nodes.last(), Some(&goal));
            assert_eq!(path_cost(&g, &path.nodes), Some(path.cost));
        }
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let g = Grid::new(8, 8);
        let order = |seed| {
            let (_, res) = run_to_end(
                &g,
                SearchRequest::new(Algorithm::Dfs, Point::ZERO).with_shuffle_seed(seed),
            )
            .unwrap();
            res.state.settled_order().to_vec()
        };
        assert_eq!(order(7), order(7));
        assert_eq!(order(7).len(), 64);
    }
}
