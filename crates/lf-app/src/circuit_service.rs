//! Circuit document loading and graph construction.

use std::collections::BTreeMap;
use std::path::Path;

use lf_core::NodeId;
use lf_graph::{BuildOptions, BuildReport, Graph, GraphBuilder, components_from_detections};
use lf_project::{BuildMode, CircuitDoc};
use lf_sim::InputValues;
use serde::Serialize;
use tracing::info;

use crate::error::{AppError, AppResult};

/// A graph built from a document, with the bookkeeping needed to address
/// its nodes by document name.
#[derive(Debug, Clone)]
pub struct CircuitBuild {
    pub graph: Graph,
    pub report: BuildReport,
    pub mode: BuildMode,
    /// Node created for each accepted component id.
    pub components: BTreeMap<String, NodeId>,
}

/// Counts shown after a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitSummary {
    pub nodes: usize,
    pub edges: usize,
    pub primary_inputs: Vec<NodeId>,
    pub sinks: Vec<NodeId>,
}

impl CircuitBuild {
    pub fn summary(&self) -> CircuitSummary {
        CircuitSummary {
            nodes: self.graph.node_count(),
            edges: self.graph.edges().len(),
            primary_inputs: self.graph.primary_inputs(),
            sinks: self.graph.sinks(),
        }
    }
}

/// Load and validate a circuit document (YAML or JSON by extension).
pub fn load_circuit(path: &Path) -> AppResult<CircuitDoc> {
    lf_project::load(path).map_err(|source| AppError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_circuit(path: &Path, doc: &CircuitDoc) -> AppResult<()> {
    lf_project::save(path, doc)?;
    Ok(())
}

/// Build the graph a document describes.
///
/// Detected gates are placed first, then explicit components and canvas
/// images. Wiring follows [`CircuitDoc::build_mode`].
pub fn build_circuit(doc: &CircuitDoc, options: &BuildOptions) -> CircuitBuild {
    let (detected, skipped) = components_from_detections(&doc.detections(), options);
    let placed = doc.placed_components();

    let mut builder = GraphBuilder::new(*options);
    builder.note_skipped_detections(skipped);
    for component in detected.iter().chain(&placed) {
        builder.add_component(component);
    }

    let mode = doc.build_mode();
    match mode {
        BuildMode::Geometric => {
            for stroke in doc.strokes() {
                builder.add_stroke(&stroke);
            }
        }
        BuildMode::Declarative => {
            for connection in doc.connection_list().unwrap_or_default() {
                builder.connect(&connection);
            }
        }
        BuildMode::Chain => builder.chain(),
    }

    let components = detected
        .iter()
        .chain(&placed)
        .filter_map(|c| builder.node_for(&c.id).map(|id| (c.id.clone(), id)))
        .collect();
    let (graph, report) = builder.finish();
    info!(name = %doc.name, ?mode, "circuit built");

    CircuitBuild {
        graph,
        report,
        mode,
        components,
    }
}

/// Build with the document's own settings.
pub fn build_from_doc(doc: &CircuitDoc) -> CircuitBuild {
    build_circuit(doc, &doc.settings.build_options())
}

/// Resolve input keys to node ids.
///
/// A key names a primary input by label, by component id, or by numeric
/// node id, tried in that order. A label shared by several primary
/// inputs is ambiguous and must be addressed another way.
pub fn resolve_inputs(
    build: &CircuitBuild,
    values: &BTreeMap<String, bool>,
) -> AppResult<InputValues> {
    let primary = build.graph.primary_inputs();
    let mut resolved = InputValues::new();

    for (key, &value) in values {
        let by_label: Vec<NodeId> = primary
            .iter()
            .copied()
            .filter(|id| build.graph.node(*id).is_some_and(|n| n.label == *key))
            .collect();
        let id = match by_label.as_slice() {
            [only] => *only,
            [_, _, ..] => {
                return Err(AppError::InvalidInput(format!(
                    "input label '{key}' is shared by {} nodes",
                    by_label.len()
                )));
            }
            [] => match build.components.get(key) {
                Some(id) => *id,
                None => key
                    .parse::<u32>()
                    .ok()
                    .and_then(NodeId::try_from_index)
                    .filter(|id| build.graph.contains(*id))
                    .ok_or_else(|| AppError::NodeNotFound(key.clone()))?,
            },
        };
        resolved.insert(id, value);
    }
    Ok(resolved)
}

/// Resolve document values, then apply `overrides` on top.
///
/// Each layer is resolved on its own, so an override addressing a node by
/// id still beats a document value addressing it by label.
pub fn resolve_layered_inputs(
    build: &CircuitBuild,
    base: &BTreeMap<String, bool>,
    overrides: &BTreeMap<String, bool>,
) -> AppResult<InputValues> {
    let mut resolved = resolve_inputs(build, base)?;
    resolved.extend(resolve_inputs(build, overrides)?);
    Ok(resolved)
}

/// Document `inputs` as booleans.
pub fn doc_inputs(doc: &CircuitDoc) -> BTreeMap<String, bool> {
    doc.inputs.iter().map(|(k, v)| (k.clone(), *v == 1)).collect()
}
