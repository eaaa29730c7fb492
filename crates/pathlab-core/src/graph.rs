//! Undirected weighted graph with positioned nodes.
//!
//! Node positions exist only to feed distance heuristics; identity and
//! adjacency are by [`NodeId`]. Adjacency is kept in ordered maps so that
//! neighbour enumeration is ascending by id without any extra sorting.

use std::collections::BTreeMap;

use crate::Cost;
use crate::error::{Error, Result};

/// Stable node identity, unique within a [`Graph`].
pub type NodeId = u32;

/// Largest accepted edge weight. Any simple path has fewer than
/// `NodeId::MAX` edges, so path costs stay far below [`Cost::MAX`].
pub const MAX_WEIGHT: Cost = i32::MAX as Cost;

/// A node: identity plus a position used for heuristic distance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// An undirected edge, reported with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub weight: Cost,
}

/// A reversible edit, recorded for [`Graph::undo`].
#[derive(Debug, Clone, Copy)]
enum Edit {
    AddNode(NodeId),
    AddEdge {
        a: NodeId,
        b: NodeId,
        replaced: Option<Cost>,
    },
}

/// Undirected graph with positive integer edge weights.
///
/// At most one edge exists per unordered pair; adding it again replaces the
/// weight.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeMap<NodeId, Node>,
    adj: BTreeMap<NodeId, BTreeMap<NodeId, Cost>>,
    history: Vec<Edit>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(a, b, weight)` triples, creating any missing
    /// node at the origin.
    pub fn from_edges(edges: impl IntoIterator<Item = (NodeId, NodeId, Cost)>) -> Result<Self> {
        let mut g = Self::new();
        for (a, b, w) in edges {
            for id in [a, b] {
                if !g.nodes.contains_key(&id) {
                    g.add_node(id, 0.0, 0.0)?;
                }
            }
            g.add_edge(a, b, w)?;
        }
        Ok(g)
    }

    /// Insert a node with an explicit id.
    pub fn add_node(&mut self, id: NodeId, x: f64, y: f64) -> Result<()> {
        if self.nodes.contains_key(&id) {
            return Err(Error::DuplicateNode(id));
        }
        self.nodes.insert(id, Node { id, x, y });
        self.adj.insert(id, BTreeMap::new());
        self.history.push(Edit::AddNode(id));
        Ok(())
    }

    /// Insert a node with the next free id (one past the largest id in use)
    /// and return that id.
    ///
    /// Fails with [`Error::Configuration`] once `NodeId::MAX` is taken.
    pub fn push_node(&mut self, x: f64, y: f64) -> Result<NodeId> {
        let id = match self.nodes.keys().next_back() {
            None => 0,
            Some(&last) => last
                .checked_add(1)
                .ok_or_else(|| Error::config(format!("no node id left after {last}")))?,
        };
        self.nodes.insert(id, Node { id, x, y });
        self.adj.insert(id, BTreeMap::new());
        self.history.push(Edit::AddNode(id));
        Ok(id)
    }

    /// Insert or re-weight the undirected edge `a`–`b`.
    ///
    /// Returns the previous weight when the edge already existed.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: Cost) -> Result<Option<Cost>> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(Error::config(format!("self-loop on node {a}")));
        }
        if !(1..=MAX_WEIGHT).contains(&weight) {
            return Err(Error::config(format!(
                "edge {a}-{b} has weight {weight}, weights must be within 1..={MAX_WEIGHT}"
            )));
        }
        let replaced = self.link(a, b, weight);
        self.history.push(Edit::AddEdge { a, b, replaced });
        Ok(replaced)
    }

    /// Remove the edge `a`–`b`, returning its weight if it existed.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Option<Cost> {
        let w = self.adj.get_mut(&a)?.remove(&b);
        if let Some(m) = self.adj.get_mut(&b) {
            m.remove(&a);
        }
        w
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        if let Some(nbrs) = self.adj.remove(&id) {
            for n in nbrs.keys() {
                if let Some(m) = self.adj.get_mut(n) {
                    m.remove(&id);
                }
            }
        }
        Some(node)
    }

    /// Revert the most recent node or edge insertion.
    ///
    /// Returns `false` when there is nothing left to undo. Edits whose
    /// target was removed in the meantime are skipped.
    pub fn undo(&mut self) -> bool {
        while let Some(edit) = self.history.pop() {
            match edit {
                Edit::AddNode(id) => {
                    if self.remove_node(id).is_some() {
                        return true;
                    }
                }
                Edit::AddEdge { a, b, replaced } => {
                    if self.weight(a, b).is_none() {
                        continue;
                    }
                    match replaced {
                        Some(w) => {
                            self.link(a, b, w);
                        }
                        None => {
                            self.remove_edge(a, b);
                        }
                    }
                    return true;
                }
            }
        }
        false
    }

    /// Remove every node, edge and edit record.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.adj.clear();
        self.history.clear();
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Whether the graph contains a node with this id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Every edge once, with `a < b`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adj.iter().flat_map(|(&a, nbrs)| {
            nbrs.iter()
                .filter(move |&(&b, _)| a < b)
                .map(move |(&b, &weight)| Edge { a, b, weight })
        })
    }

    /// Neighbours of `id` with their edge weights, ascending by id.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, Cost)> + '_ {
        self.adj
            .get(&id)
            .into_iter()
            .flat_map(|m| m.iter().map(|(&n, &w)| (n, w)))
    }

    /// Weight of the edge `a`–`b`, if present.
    pub fn weight(&self, a: NodeId, b: NodeId) -> Option<Cost> {
        self.adj.get(&a)?.get(&b).copied()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adj.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    /// Floored straight-line distance between two node positions.
    ///
    /// Returns 0 if either node is missing.
    pub fn straight_line(&self, a: NodeId, b: NodeId) -> Cost {
        match (self.nodes.get(&a), self.nodes.get(&b)) {
            (Some(p), Some(q)) => (p.x - q.x).hypot(p.y - q.y).floor() as Cost,
            _ => 0,
        }
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(Error::bounds(id))
        }
    }

    fn link(&mut self, a: NodeId, b: NodeId, w: Cost) -> Option<Cost> {
        let prev = self.adj.entry(a).or_default().insert(b, w);
        self.adj.entry(b).or_default().insert(a, w);
        prev
    }
}
