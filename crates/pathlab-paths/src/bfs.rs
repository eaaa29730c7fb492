use crate::engine::SearchRun;
use crate::traits::Pather;

impl<S: Pather> SearchRun<'_, S> {
    /// One BFS dequeue.
    ///
    /// Locations are recorded when enqueued, so each one enters the queue at
    /// most once and keeps the predecessor that discovered it first.
    pub(crate) fn step_bfs(&mut self) {
        let Some(cur) = self.queue.pop_front() else {
            self.exhaust();
            return;
        };
        if self.settle(cur) {
            return;
        }
        let Some(rec) = self.state.record(cur).copied() else {
            return;
        };

        let nbuf = self.take_neighbors(cur);
        for &(n, w) in nbuf.iter() {
            if self.state.is_discovered(n) {
                continue;
            }
            self.relax(n, rec.dist.saturating_add(w), rec.hops + 1, cur);
            self.queue.push_back(n);
        }
        self.restore_neighbors(nbuf);
    }
}

#[cfg(test)]
mod tests {
    use pathlab_core::{Grid, Point};

    use crate::engine::{SearchEvent, run_to_end};
    use crate::path::path_cost;
    use crate::request::{Algorithm, SearchRequest};

    fn walled_4x4() -> Grid {
        let mut g = Grid::new(4, 4);
        g.set(Point::from_row_col(1, 1), pathlab_core::Terrain::Wall).unwrap();
        g.set(Point::from_row_col(1, 2), pathlab_core::Terrain::Wall).unwrap();
        g
    }

    #[test]
    fn finds_fewest_edges_around_walls() {
        let g = walled_4x4();
        let goal = Point::from_row_col(3, 3);
        let (events, res) = run_to_end(
            &g,
            SearchRequest::new(Algorithm::Bfs, Point::ZERO).with_goal(goal),
        )
        .unwrap();
        let path = res.path().unwrap();
        assert_eq!(path.nodes.len() - 1, 6);
        assert_eq!(path.cost, 6);
        assert_eq!(path_cost(&g, &path.nodes), Some(6));

        // Every settled cell is at most 6 steps away, in non-decreasing layers.
        let layers: Vec<u32> = res
            .state
            .settled_order()
            .iter()
            .map(|&p| res.state.hops(p).unwrap())
            .collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*layers.last().unwrap(), 6);
        assert_eq!(layers.iter().filter(|&&d| d < 6).count(), 13);

        let settled_events = events
            .iter()
            .filter(|e| matches!(e, SearchEvent::Settled { .. }))
            .count();
        assert_eq!(settled_events, res.settled);
    }

    #[test]
    fn settles_layers_in_ascending_coordinate_order() {
        let g = Grid::new(3, 3);
        let (_, res) = run_to_end(&g, SearchRequest::new(Algorithm::Bfs, Point::new(1, 1))).unwrap();
        assert_eq!(
            res.state.settled_order(),
            &[
                Point::new(1, 1),
                Point::new(1, 0),
                Point::new(0, 1),
                Point::new(2, 1),
                Point::new(1, 2),
                Point::new(0, 0),
                Point::new(2, 0),
                Point::new(0, 2),
                Point::new(2, 2),
            ]
        );
    }

    #[test]
    fn each_cell_enqueued_once() {
        let g = Grid::new(6, 6);
        let (events, res) = run_to_end(&g, SearchRequest::new(Algorithm::Bfs, Point::ZERO)).unwrap();
        let relaxed = events
            .iter()
            .filter(|e| matches!(e, SearchEvent::Relaxed { .. }))
            .count();
        assert_eq!(relaxed, 35);
        assert_eq!(res.settled, 36);
        assert_eq!(res.stale_discarded, 0);
    }
}
