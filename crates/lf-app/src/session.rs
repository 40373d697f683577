//! Interactive editing session over one circuit graph.
//!
//! Every structural edit goes through [`Graph`], which clears computed
//! outputs; a fresh simulation is needed before outputs show again.

use lf_core::{BoundingBox, NodeId, Point};
use lf_graph::{
    BuildOptions, BuildReport, Connection, Edge, GateKind, Graph, Node, PlacedComponent, Stroke,
    build_graph, build_graph_declarative, resolve_point,
};
use lf_sim::{InputValues, SimOptions};
use lf_synth::SynthOptions;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::report::{AnalysisReport, SimulationTable, analyze, run_simulation};

#[derive(Debug, Clone, Default)]
pub struct Session {
    graph: Graph,
    pub build_options: BuildOptions,
    pub sim_options: SimOptions,
    pub synth_options: SynthOptions,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(
        build_options: BuildOptions,
        sim_options: SimOptions,
        synth_options: SynthOptions,
    ) -> Self {
        Self {
            graph: Graph::new(),
            build_options,
            sim_options,
            synth_options,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn add_gate(&mut self, kind: GateKind) -> NodeId {
        self.graph.add_gate(kind)
    }

    pub fn add_input(&mut self, name: impl Into<String>) -> NodeId {
        self.graph.add_input(name)
    }

    /// Place a component so that later strokes can hit it.
    pub fn place(&mut self, component: &PlacedComponent) -> AppResult<NodeId> {
        component
            .bbox
            .validate()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        Ok(self
            .graph
            .add_node(component.kind, component.label.clone(), Some(component.bbox)))
    }

    /// Wire `src -> dst`. Self-wires and cycle-closing wires are refused.
    pub fn add_wire(&mut self, src: NodeId, dst: NodeId) -> AppResult<()> {
        self.graph.connect(src, dst)?;
        Ok(())
    }

    /// Resolve a drawn stroke against placed components and wire it.
    pub fn draw_wire(&mut self, start: Point, end: Point) -> AppResult<Edge> {
        let from = resolve_point(&self.graph, start, &self.build_options);
        let to = resolve_point(&self.graph, end, &self.build_options);
        debug!(?from, ?to, "stroke endpoints");
        match (from, to) {
            (Some(from), Some(to)) => {
                self.graph.connect(from, to)?;
                Ok(Edge { from, to })
            }
            _ => Err(AppError::InvalidInput(
                "stroke endpoint is not on a component".to_string(),
            )),
        }
    }

    /// Remove a node together with its wires.
    pub fn remove_node(&mut self, id: NodeId) -> AppResult<Node> {
        Ok(self.graph.remove_node(id)?)
    }

    pub fn remove_wire(&mut self, src: NodeId, dst: NodeId) -> AppResult<()> {
        self.graph.disconnect(src, dst)?;
        Ok(())
    }

    pub fn move_node(&mut self, id: NodeId, bbox: BoundingBox) -> AppResult<()> {
        bbox.validate()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        self.graph.set_geometry(id, bbox)?;
        Ok(())
    }

    pub fn rename(&mut self, id: NodeId, label: impl Into<String>) -> AppResult<()> {
        self.graph.set_label(id, label)?;
        Ok(())
    }

    /// Drop every wire, keeping the components.
    pub fn clear_wires(&mut self) {
        self.graph.clear_edges();
    }

    /// Drop everything. Ids handed out before stay retired.
    pub fn clear(&mut self) {
        self.graph.clear();
    }

    /// Replace the graph with one built from a new batch of components and
    /// strokes.
    pub fn load_components(
        &mut self,
        components: &[PlacedComponent],
        wires: &[Stroke],
    ) -> BuildReport {
        let (graph, report) = build_graph(components, wires, &self.build_options);
        self.graph = graph;
        report
    }

    /// Replace the graph with a declarative build; `None` chains the
    /// components in order.
    pub fn load_declarative(
        &mut self,
        components: &[PlacedComponent],
        connections: Option<&[Connection]>,
    ) -> BuildReport {
        let (graph, report) = build_graph_declarative(components, connections, &self.build_options);
        self.graph = graph;
        report
    }

    /// Simulate and keep the computed outputs on the session graph.
    pub fn simulate(&mut self, inputs: &InputValues) -> AppResult<SimulationTable> {
        let (outcome, table) = run_simulation(&self.graph, inputs, &self.sim_options)?;
        self.graph = outcome.graph;
        Ok(table)
    }

    pub fn output(&self, id: NodeId) -> Option<bool> {
        self.graph.node(id).and_then(|n| n.output)
    }

    pub fn analyze(&self) -> AppResult<AnalysisReport> {
        analyze(&self.graph, &self.synth_options)
    }
}
