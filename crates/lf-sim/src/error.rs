//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered during simulation.
///
/// These indicate a graph that broke its own invariants; bad input values
/// never produce an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Graph error: {0}")]
    Graph(#[from] lf_graph::GraphError),

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<lf_core::LfError> for SimError {
    fn from(e: lf_core::LfError) -> Self {
        SimError::Invariant {
            what: e.to_string(),
        }
    }
}
