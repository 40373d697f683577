//! Shared application service layer for logicflow.
//!
//! Frontends go through this crate to load circuit documents, build and
//! edit graphs, run simulations, and produce analysis and export payloads.

pub mod circuit_service;
pub mod error;
pub mod export;
pub mod report;
pub mod session;

// Re-export key types for convenience
pub use circuit_service::{
    CircuitBuild, CircuitSummary, build_circuit, build_from_doc, doc_inputs, load_circuit,
    resolve_inputs, resolve_layered_inputs, save_circuit,
};
pub use error::{AppError, AppResult};
pub use export::{expression_csv, expressions_text, truth_table_csv, write_exports};
pub use report::{
    AnalysisReport, AnalysisStatus, OutputCell, SimulationRow, SimulationTable, SinkAnalysis,
    analyze, run_simulation,
};
pub use session::Session;
