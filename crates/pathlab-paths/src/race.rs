//! Run two searches side by side over one shared structure.
//!
//! The structure is only borrowed immutably for the duration of the race,
//! so it cannot change underneath either run, and each run owns its own
//! [`SearchState`](crate::SearchState). No winner is computed: the report
//! carries both results untouched.

use std::thread;

use pathlab_core::Result;

use crate::engine::{self, SearchEvent, SearchResult, SearchRun};
use crate::request::SearchRequest;
use crate::traits::Pather;

/// Which side of a race an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lane {
    Left,
    Right,
}

/// Both terminal results of a race.
#[derive(Debug, Clone)]
pub struct RaceReport<N> {
    pub left: SearchResult<N>,
    pub right: SearchResult<N>,
}

impl<N> RaceReport<N> {
    /// The result of one side.
    pub fn lane(&self, lane: Lane) -> &SearchResult<N> {
        match lane {
            Lane::Left => &self.left,
            Lane::Right => &self.right,
        }
    }
}

/// Run both requests to completion (or cancellation) concurrently.
pub fn race<S>(
    space: &S,
    left: SearchRequest<'_, S::Node>,
    right: SearchRequest<'_, S::Node>,
) -> Result<RaceReport<S::Node>>
where
    S: Pather + Sync,
    S::Node: Send + Sync,
{
    race_with(space, left, right, |_, _| {})
}

/// Like [`race`], forwarding every event to `observer` as each lane
/// produces it. Calls from the two lanes interleave arbitrarily.
pub fn race_with<S, F>(
    space: &S,
    left: SearchRequest<'_, S::Node>,
    right: SearchRequest<'_, S::Node>,
    observer: F,
) -> Result<RaceReport<S::Node>>
where
    S: Pather + Sync,
    S::Node: Send + Sync,
    F: Fn(Lane, &SearchEvent<S::Node>) + Sync,
{
    // Validate both before starting either.
    let left = engine::run(space, left)?;
    let right = engine::run(space, right)?;
    log::debug!("race: {} vs {}", left.algorithm(), right.algorithm());

    let observer = &observer;
    let (l, r) = thread::scope(|scope| {
        let lh = scope.spawn(move || drive(left, Lane::Left, observer));
        let rh = scope.spawn(move || drive(right, Lane::Right, observer));
        (join(lh), join(rh))
    });
    Ok(RaceReport {
        left: l?,
        right: r?,
    })
}

fn drive<S, F>(
    mut run: SearchRun<'_, S>,
    lane: Lane,
    observer: &F,
) -> Result<SearchResult<S::Node>>
where
    S: Pather,
    F: Fn(Lane, &SearchEvent<S::Node>),
{
    for ev in run.by_ref() {
        observer(lane, &ev);
    }
    run.finish()
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(v) => v,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pathlab_core::{Error, Grid, Point, Terrain};

    use super::*;
    use crate::distance::Manhattan;
    use crate::request::{Algorithm, CancelToken};

    fn maze() -> Grid {
        Grid::from_rows(&[
            ".....#....",
            ".###.#.##.",
            ".#...#..#.",
            ".#.####.#.",
            ".#......#.",
            ".######~#.",
            "......#...",
        ])
        .unwrap()
    }

    #[test]
    fn both_lanes_report_independently() {
        let g = maze();
        let goal = Point::new(9, 6);
        let report = race(
            &g,
            SearchRequest::new(Algorithm::Dijkstra, Point::ZERO).with_goal(goal),
            SearchRequest::new(Algorithm::AStar, Point::ZERO)
                .with_goal(goal)
                .with_heuristic(&Manhattan),
        )
        .unwrap();
        assert_eq!(report.left.algorithm, Algorithm::Dijkstra);
        assert_eq!(report.right.algorithm, Algorithm::AStar);
        assert_eq!(report.left.cost(), report.right.cost());
        assert!(report.lane(Lane::Left).is_found());
        assert!(report.right.settled <= report.left.settled);
    }

    #[test]
    fn observer_sees_every_settle() {
        let g = maze();
        let goal = Point::new(9, 6);
        let counts = Mutex::new([0usize; 2]);
        let report = race_with(
            &g,
            SearchRequest::new(Algorithm::Bfs, Point::ZERO).with_goal(goal),
            SearchRequest::new(Algorithm::Dfs, Point::ZERO)
                .with_goal(goal)
                .with_shuffle_seed(3),
            |lane, ev| {
                if matches!(ev, SearchEvent::Settled { .. }) {
                    let mut c = counts.lock().unwrap();
                    c[lane as usize] += 1;
                }
            },
        )
        .unwrap();
        let c = counts.into_inner().unwrap();
        assert_eq!(c[0], report.left.settled);
        assert_eq!(c[1], report.right.settled);
    }

    #[test]
    fn one_lane_cancelled_other_finishes() {
        let g = Grid::new(30, 30);
        let token = CancelToken::new();
        token.cancel();
        let goal = Point::new(29, 29);
        let report = race(
            &g,
            SearchRequest::new(Algorithm::Dijkstra, Point::ZERO)
                .with_goal(goal)
                .with_cancel(token),
            SearchRequest::new(Algorithm::AStar, Point::ZERO)
                .with_goal(goal)
                .with_heuristic(&Manhattan),
        )
        .unwrap();
        assert!(report.left.is_cancelled());
        assert_eq!(report.right.cost(), Some(58));
    }

    #[test]
    fn invalid_lane_fails_before_starting() {
        let mut g = Grid::new(4, 4);
        g.set(Point::new(1, 1), Terrain::Wall).unwrap();
        let err = race(
            &g,
            SearchRequest::new(Algorithm::Bfs, Point::ZERO),
            SearchRequest::new(Algorithm::AStar, Point::ZERO),
        )
        .err();
        assert!(matches!(err, Some(Error::Configuration(_))));
    }
}
