//! Graph-specific error types.

use lf_core::{LfError, NodeId};
use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Circuit graph construction and editing errors.
///
/// Every rejected edit leaves the graph exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A referenced node doesn't exist.
    #[error("Node {node} not found")]
    NodeNotFound { node: NodeId },

    /// An edge from a node to itself.
    #[error("Wire from node {node} to itself")]
    SelfLoop { node: NodeId },

    /// The edge would close a cycle.
    #[error("Wire {from} -> {to} would create a cycle")]
    WouldCreateCycle { from: NodeId, to: NodeId },

    /// No edge between the two nodes.
    #[error("No wire {from} -> {to}")]
    EdgeNotFound { from: NodeId, to: NodeId },

    /// A gate class name that isn't one of the supported gate types.
    #[error("Unknown gate type '{name}'")]
    UnknownGate { name: String },

    /// The graph contains a cycle (should be unreachable through the public API).
    #[error("Graph contains a cycle through {remaining} node(s)")]
    Cyclic { remaining: usize },

    /// An edge references a node that is not in the graph.
    #[error("Wire {from} -> {to} references a missing node")]
    DanglingEdge { from: NodeId, to: NodeId },
}

impl From<GraphError> for LfError {
    fn from(err: GraphError) -> Self {
        LfError::Invariant {
            what: err.to_string(),
        }
    }
}
