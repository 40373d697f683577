//! Error types for expression synthesis and analysis.

use thiserror::Error;

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// Errors that can occur while synthesizing or analysing expressions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthError {
    /// Expression text could not be parsed.
    #[error("Parse error at byte {pos}: {message}")]
    Parse { pos: usize, message: String },

    /// A variable has no value in the assignment being evaluated.
    #[error("Unbound variable '{name}'")]
    UnboundVariable { name: String },

    /// Enumerating 2^N rows would exceed the configured limit.
    #[error("Expression has {count} variables (limit {max})")]
    TooManyVariables { count: usize, max: usize },

    /// The graph broke an invariant while being traversed.
    #[error("Graph error: {0}")]
    Graph(#[from] lf_graph::GraphError),

    /// Shared sub-circuits would be copied into a tree above the size bound.
    #[error("Expression for node {node} would exceed {max} nodes")]
    ExpressionTooLarge { node: String, max: usize },

    /// Synthesis produced text that does not parse back.
    #[error("Synthesized expression for node {node} is malformed: {message}")]
    Inconsistent { node: String, message: String },
}
