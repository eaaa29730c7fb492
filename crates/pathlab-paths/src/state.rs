use std::collections::HashMap;
use std::hash::Hash;

use pathlab_core::Cost;

/// Sentinel value meaning "unreachable" in distance queries.
pub const UNREACHABLE: Cost = Cost::MAX;

/// A location with an associated cost, as returned by distance-map queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode<N> {
    pub node: N,
    pub cost: Cost,
}

/// Per-location search record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Record<N> {
    pub(crate) dist: Cost,
    pub(crate) hops: u32,
    pub(crate) parent: Option<N>,
    pub(crate) settled: bool,
}

/// Search state owned by a single run.
///
/// Maps every touched location to its tentative distance, hop count and
/// predecessor, and remembers the order in which locations were settled.
/// The searched structure itself is never written to.
#[derive(Debug, Clone)]
pub struct SearchState<N> {
    records: HashMap<N, Record<N>>,
    order: Vec<N>,
}

impl<N> Default for SearchState<N> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> SearchState<N> {
    pub(crate) fn record(&self, n: N) -> Option<&Record<N>> {
        self.records.get(&n)
    }

    /// Write a tentative value. Settled records are left untouched and
    /// `false` is returned.
    pub(crate) fn offer(&mut self, n: N, dist: Cost, hops: u32, parent: Option<N>) -> bool {
        let r = self.records.entry(n).or_insert(Record {
            dist: UNREACHABLE,
            hops: 0,
            parent: None,
            settled: false,
        });
        if r.settled {
            return false;
        }
        r.dist = dist;
        r.hops = hops;
        r.parent = parent;
        true
    }

    pub(crate) fn settle(&mut self, n: N) {
        if let Some(r) = self.records.get_mut(&n) {
            if !r.settled {
                r.settled = true;
                self.order.push(n);
            }
        }
    }

    /// Best recorded distance to `n`, settled or tentative.
    pub fn distance(&self, n: N) -> Option<Cost> {
        self.records.get(&n).map(|r| r.dist)
    }

    /// Like [`distance`](Self::distance) but returns [`UNREACHABLE`] for
    /// locations the run never touched.
    pub fn cost_at(&self, n: N) -> Cost {
        self.distance(n).unwrap_or(UNREACHABLE)
    }

    /// Number of edges between the source and `n` along predecessor links.
    pub fn hops(&self, n: N) -> Option<u32> {
        self.records.get(&n).map(|r| r.hops)
    }

    /// Recorded predecessor of `n`. `None` for the source and for untouched
    /// locations.
    pub fn predecessor(&self, n: N) -> Option<N> {
        self.records.get(&n).and_then(|r| r.parent)
    }

    /// Whether `n` has been finalised.
    pub fn is_settled(&self, n: N) -> bool {
        self.records.get(&n).is_some_and(|r| r.settled)
    }

    /// Whether the run ever recorded a tentative value for `n`.
    pub fn is_discovered(&self, n: N) -> bool {
        self.records.contains_key(&n)
    }

    /// Locations in the order they were settled.
    pub fn settled_order(&self) -> &[N] {
        &self.order
    }

    /// Settled locations with their final distances, in settle order.
    pub fn settled_nodes(&self) -> Vec<PathNode<N>> {
        self.order
            .iter()
            .map(|&node| PathNode {
                node,
                cost: self.cost_at(node),
            })
            .collect()
    }
}
