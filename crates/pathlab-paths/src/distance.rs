use pathlab_core::{Cost, Graph, NodeId, Point};

use crate::traits::Heuristic;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> Cost {
    let (dx, dy) = axis_deltas(a, b);
    dx + dy
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> Cost {
    let (dx, dy) = axis_deltas(a, b);
    dx.max(dy)
}

fn axis_deltas(a: Point, b: Point) -> (Cost, Cost) {
    (
        (Cost::from(a.x) - Cost::from(b.x)).abs(),
        (Cost::from(a.y) - Cost::from(b.y)).abs(),
    )
}

/// Manhattan heuristic for 4-connected grids where every step costs at
/// least 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl Heuristic<Point> for Manhattan {
    fn estimate(&self, from: Point, goal: Point) -> Cost {
        manhattan(from, goal)
    }
}

/// Floored straight-line distance between graph node positions.
///
/// Admissible only when node positions are laid out so that no edge weight
/// is smaller than the distance between its endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Euclidean<'g>(pub &'g Graph);

impl Heuristic<NodeId> for Euclidean<'_> {
    fn estimate(&self, from: NodeId, goal: NodeId) -> Cost {
        self.0.straight_line(from, goal)
    }
}
