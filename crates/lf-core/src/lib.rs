//! lf-core: stable foundation for logicflow.
//!
//! Contains:
//! - ids (stable compact IDs for circuit nodes)
//! - geometry (points, bounding boxes, tolerance hit-testing)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod ids;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LfError, LfResult};
pub use geometry::*;
pub use ids::*;
