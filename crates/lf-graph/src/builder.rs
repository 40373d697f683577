//! Incremental graph builder.
//!
//! Two ways in:
//! - geometric: placed components plus free-hand strokes, each stroke
//!   resolved to a wire by hit-testing its first and last point
//! - declarative: classified components plus explicit connections, or a
//!   linear chain when no connection data exists
//!
//! Bad input never aborts a build. Anything that cannot become a node or a
//! wire is dropped and counted in the [`BuildReport`].

use std::collections::HashMap;

use lf_core::{BoundingBox, DEFAULT_TOLERANCE, NodeId, Point, Real};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::GraphError;
use crate::gate::GateKind;
use crate::graph::{Edge, Graph, NodeKind};

/// Which component wins when a point hits several tolerance-expanded boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Smallest box area; equal areas fall back to the earliest placed.
    #[default]
    SmallestArea,
    /// Earliest placed component.
    FirstMatch,
}

/// Options for graph construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    /// Slack added on every side of a box when hit-testing stroke endpoints.
    pub tolerance: Real,
    pub tie_break: TieBreak,
    /// Detections scoring below this are skipped.
    pub min_confidence: Real,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            tie_break: TieBreak::default(),
            min_confidence: 0.0,
        }
    }
}

/// A classified glyph placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedComponent {
    /// Caller-side handle, used by strokes-free connection lists.
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub bbox: BoundingBox,
}

impl PlacedComponent {
    /// Create a component, inferring its kind from the label: a gate name
    /// makes a gate, anything else a primary input.
    pub fn new(id: impl Into<String>, label: impl Into<String>, bbox: BoundingBox) -> Self {
        let label = label.into();
        let kind = label
            .parse::<GateKind>()
            .map_or(NodeKind::Input, NodeKind::Gate);
        Self {
            id: id.into(),
            label,
            kind,
            bbox,
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A free-hand stroke; only its first and last points matter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn line(from: Point, to: Point) -> Self {
        Self::new(vec![from, to])
    }

    /// First and last point, if the stroke is well-formed.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        if self.points.len() < 2 {
            return None;
        }
        let start = *self.points.first()?;
        let end = *self.points.last()?;
        (start.is_finite() && end.is_finite()).then_some((start, end))
    }
}

/// An explicit wire between two components, by component id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Summary of what a build kept and what it dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BuildReport {
    pub nodes_added: usize,
    pub edges_added: usize,
    /// Components with a non-finite or negative box.
    pub malformed_components: usize,
    /// Components whose id was already used.
    pub duplicate_components: usize,
    /// Detections with an unknown class or below the confidence threshold.
    pub skipped_detections: usize,
    /// Strokes with fewer than two points or non-finite endpoints.
    pub malformed_strokes: usize,
    /// Wires with an endpoint that hit no component.
    pub unresolved_endpoints: usize,
    /// Wires whose endpoints resolved to the same component.
    pub self_loops: usize,
    /// Wires refused because they would close a cycle.
    pub rejected_cycles: usize,
}

impl BuildReport {
    /// Number of wires that were offered but not added.
    pub fn dropped_wires(&self) -> usize {
        self.malformed_strokes + self.unresolved_endpoints + self.self_loops + self.rejected_cycles
    }
}

/// Resolve a point to the component whose tolerance-expanded box contains it.
///
/// Only nodes with geometry are candidates; candidates are visited in id
/// (placement) order and ties are settled by `options.tie_break`.
pub fn resolve_point(graph: &Graph, point: Point, options: &BuildOptions) -> Option<NodeId> {
    let mut best: Option<(NodeId, Real)> = None;
    for node in graph.nodes() {
        let Some(bbox) = node.geometry else {
            continue;
        };
        if !bbox.contains_with_tolerance(point, options.tolerance) {
            continue;
        }
        match options.tie_break {
            TieBreak::FirstMatch => return Some(node.id),
            TieBreak::SmallestArea => {
                if best.is_none_or(|(_, area)| bbox.area() < area) {
                    best = Some((node.id, bbox.area()));
                }
            }
        }
    }
    best.map(|(id, _)| id)
}

/// Builder for constructing a circuit graph from raw placement data.
///
/// Use `add_component`, then `add_stroke` or `connect`, and call `finish()`
/// to get the graph together with its [`BuildReport`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
    graph: Graph,
    by_name: HashMap<String, NodeId>,
    order: Vec<NodeId>,
    report: BuildReport,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Node created for the component with this id.
    pub fn node_for(&self, component_id: &str) -> Option<NodeId> {
        self.by_name.get(component_id).copied()
    }

    /// Add a placed component and return its node id.
    ///
    /// Malformed boxes and repeated ids are dropped (the first id wins).
    pub fn add_component(&mut self, component: &PlacedComponent) -> Option<NodeId> {
        if component.bbox.validate().is_err() {
            debug!(component = %component.id, "dropping component with malformed box");
            self.report.malformed_components += 1;
            return None;
        }
        if self.by_name.contains_key(&component.id) {
            debug!(component = %component.id, "dropping duplicate component id");
            self.report.duplicate_components += 1;
            return None;
        }
        let id = self.graph.add_node(
            component.kind,
            component.label.clone(),
            Some(component.bbox),
        );
        self.by_name.insert(component.id.clone(), id);
        self.order.push(id);
        self.report.nodes_added += 1;
        Some(id)
    }

    /// Resolve a stroke to a wire and add it.
    pub fn add_stroke(&mut self, stroke: &Stroke) -> Option<Edge> {
        let Some((start, end)) = stroke.endpoints() else {
            debug!(points = stroke.points.len(), "skipping malformed stroke");
            self.report.malformed_strokes += 1;
            return None;
        };

        let from = resolve_point(&self.graph, start, &self.options);
        let to = resolve_point(&self.graph, end, &self.options);
        debug!(
            start = ?(start.x, start.y),
            end = ?(end.x, end.y),
            ?from,
            ?to,
            "resolved stroke"
        );

        match (from, to) {
            (Some(from), Some(to)) => self.try_connect(from, to),
            _ => {
                self.report.unresolved_endpoints += 1;
                None
            }
        }
    }

    /// Add a wire between two components by their ids.
    pub fn connect(&mut self, connection: &Connection) -> Option<Edge> {
        match (self.node_for(&connection.from), self.node_for(&connection.to)) {
            (Some(from), Some(to)) => self.try_connect(from, to),
            _ => {
                debug!(from = %connection.from, to = %connection.to, "connection names unknown component");
                self.report.unresolved_endpoints += 1;
                None
            }
        }
    }

    /// Connect every component to the next one in placement order.
    pub fn chain(&mut self) {
        let pairs: Vec<(NodeId, NodeId)> = self.order.windows(2).map(|w| (w[0], w[1])).collect();
        for (from, to) in pairs {
            self.try_connect(from, to);
        }
    }

    fn try_connect(&mut self, from: NodeId, to: NodeId) -> Option<Edge> {
        match self.graph.connect(from, to) {
            Ok(()) => {
                self.report.edges_added += 1;
                Some(Edge { from, to })
            }
            Err(GraphError::SelfLoop { .. }) => {
                self.report.self_loops += 1;
                None
            }
            Err(err) => {
                debug!(%from, %to, error = %err, "wire rejected");
                self.report.rejected_cycles += 1;
                None
            }
        }
    }

    /// Count detections skipped before they reached the builder.
    pub fn note_skipped_detections(&mut self, count: usize) {
        self.report.skipped_detections += count;
    }

    /// Finish building, returning the graph and what was dropped along the way.
    pub fn finish(self) -> (Graph, BuildReport) {
        let report = self.report;
        info!(
            nodes = report.nodes_added,
            edges = report.edges_added,
            dropped_wires = report.dropped_wires(),
            "graph built"
        );
        (self.graph, report)
    }
}

/// Build a graph from placed components and free-hand strokes.
pub fn build_graph(
    components: &[PlacedComponent],
    wires: &[Stroke],
    options: &BuildOptions,
) -> (Graph, BuildReport) {
    let mut builder = GraphBuilder::new(*options);
    for component in components {
        builder.add_component(component);
    }
    for stroke in wires {
        builder.add_stroke(stroke);
    }
    builder.finish()
}

/// Build a graph from classified components and explicit connections.
///
/// With `connections == None` the components are chained in order; this is
/// a fallback for sources that carry no connection data. `Some(&[])` means
/// no wires at all.
pub fn build_graph_declarative(
    components: &[PlacedComponent],
    connections: Option<&[Connection]>,
    options: &BuildOptions,
) -> (Graph, BuildReport) {
    let mut builder = GraphBuilder::new(*options);
    for component in components {
        builder.add_component(component);
    }
    match connections {
        Some(connections) => {
            for connection in connections {
                builder.connect(connection);
            }
        }
        None => builder.chain(),
    }
    builder.finish()
}
