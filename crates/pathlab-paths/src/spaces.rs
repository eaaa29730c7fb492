//! [`Pather`] adapters for the two concrete models.

use pathlab_core::{Cost, Graph, Grid, NodeId, Point};

use crate::traits::Pather;

impl Pather for Graph {
    type Node = NodeId;

    fn contains(&self, n: NodeId) -> bool {
        Graph::contains(self, n)
    }

    fn neighbors(&self, n: NodeId, buf: &mut Vec<(NodeId, Cost)>) {
        buf.extend(Graph::neighbors(self, n));
    }
}

impl Pather for Grid {
    type Node = Point;

    fn contains(&self, p: Point) -> bool {
        Grid::contains(self, p)
    }

    fn neighbors(&self, p: Point, buf: &mut Vec<(Point, Cost)>) {
        buf.extend(Grid::neighbors(self, p));
    }
}
