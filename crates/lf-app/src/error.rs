//! Error types for the lf-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors behind one
/// interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Document error: {0}")]
    Document(String),

    #[error("Failed to read circuit file: {path}")]
    DocumentRead {
        path: PathBuf,
        source: lf_project::ProjectError,
    },

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for lf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<lf_project::ProjectError> for AppError {
    fn from(err: lf_project::ProjectError) -> Self {
        AppError::Document(err.to_string())
    }
}

impl From<lf_graph::GraphError> for AppError {
    fn from(err: lf_graph::GraphError) -> Self {
        match err {
            lf_graph::GraphError::NodeNotFound { node } => AppError::NodeNotFound(node.to_string()),
            other => AppError::Graph(other.to_string()),
        }
    }
}

impl From<lf_sim::SimError> for AppError {
    fn from(err: lf_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<lf_synth::SynthError> for AppError {
    fn from(err: lf_synth::SynthError) -> Self {
        AppError::Synthesis(err.to_string())
    }
}
