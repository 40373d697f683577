//! lf-graph: circuit graph layer for logicflow.
//!
//! Provides:
//! - Core graph data structures (Node, NodeKind, Edge, Graph)
//! - Gate kinds with exhaustive boolean semantics
//! - Graph builder resolving placements and strokes into wires
//! - Detector output adaptation
//!
//! # Example
//!
//! ```
//! use lf_core::{BoundingBox, Point};
//! use lf_graph::{build_graph, BuildOptions, PlacedComponent, Stroke};
//!
//! let components = [
//!     PlacedComponent::new("a", "A", BoundingBox::new(0.0, 0.0, 20.0, 20.0)),
//!     PlacedComponent::new("g", "NOT", BoundingBox::new(100.0, 0.0, 40.0, 20.0)),
//! ];
//! let wires = [Stroke::line(Point::new(18.0, 10.0), Point::new(102.0, 10.0))];
//! let (graph, report) = build_graph(&components, &wires, &BuildOptions::default());
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(report.edges_added, 1);
//! ```

pub mod builder;
pub mod detect;
pub mod error;
pub mod gate;
pub mod graph;
pub mod validate;

// Re-exports for ergonomics
pub use builder::{
    BuildOptions, BuildReport, Connection, GraphBuilder, PlacedComponent, Stroke, TieBreak,
    build_graph, build_graph_declarative, resolve_point,
};
pub use detect::{Detection, build_from_detections, components_from_detections};
pub use error::{GraphError, GraphResult};
pub use gate::{Arity, ArityWarning, GateKind};
pub use graph::{Edge, Graph, Node, NodeKind};
pub use validate::{arity_warnings, validate};
