//! Error type shared by the graph/grid models, the search engine and the
//! maze generator.
//!
//! A search that runs out of frontier is *not* an error (it ends with an
//! `Exhausted` outcome), and neither is cancellation. These variants cover
//! construction mistakes, misuse at invocation time, and reconstruction
//! misuse.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors produced by pathlab crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid invocation or construction parameters: A* without a goal or
    /// heuristic, an inadmissible heuristic, a non-positive edge weight, a
    /// malformed grid description.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A location outside the graph or grid.
    #[error("location {location} is out of bounds")]
    Bounds { location: String },

    /// Path reconstruction requested for a goal that was never settled.
    #[error("no path: goal {goal} was never settled")]
    NoPath { goal: String },

    /// Predecessor links loop back on themselves.
    #[error("predecessor cycle detected at {location}")]
    Cycle { location: String },

    /// A node id is already present in the graph.
    #[error("node {0} already exists")]
    DuplicateNode(NodeId),
}

impl Error {
    /// Build a [`Error::Configuration`] from any message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`Error::Bounds`] for a debug-printable location.
    pub fn bounds(location: impl std::fmt::Debug) -> Self {
        Self::Bounds {
            location: format!("{location:?}"),
        }
    }

    /// Build a [`Error::NoPath`] for a debug-printable goal.
    pub fn no_path(goal: impl std::fmt::Debug) -> Self {
        Self::NoPath {
            goal: format!("{goal:?}"),
        }
    }

    /// Build a [`Error::Cycle`] for a debug-printable location.
    pub fn cycle(location: impl std::fmt::Debug) -> Self {
        Self::Cycle {
            location: format!("{location:?}"),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
