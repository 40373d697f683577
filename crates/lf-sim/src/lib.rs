//! Topological simulation of logicflow circuit graphs.
//!
//! Provides:
//! - Primary input assignment with a configurable policy for unset inputs
//! - Gate evaluation in dependency order
//! - Unresolved-value propagation and arity warnings

pub mod error;
pub mod sim;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use sim::{InputValues, SimOptions, SimOutcome, UnsetInputPolicy, simulate, simulate_with};
