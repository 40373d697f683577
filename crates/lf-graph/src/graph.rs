//! Core circuit graph data structures.

use std::collections::{BTreeMap, BTreeSet};

use lf_core::{BoundingBox, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::gate::GateKind;
use crate::validate;

/// What a node is: a primary input or a logic gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "gate", rename_all = "snake_case")]
pub enum NodeKind {
    Input,
    Gate(GateKind),
}

impl NodeKind {
    pub fn gate(&self) -> Option<GateKind> {
        match self {
            NodeKind::Input => None,
            NodeKind::Gate(kind) => Some(*kind),
        }
    }

    /// Short type name for tables: `INPUT` or the gate name.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Input => "INPUT",
            NodeKind::Gate(kind) => kind.name(),
        }
    }
}

/// A node in the circuit graph.
///
/// `geometry` is only consulted while resolving wires; `output` is written
/// only by the simulator and is cleared whenever the topology changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<BoundingBox>,
    /// `None` means not computed or unresolved.
    #[serde(default)]
    pub output: Option<bool>,
}

/// A directed wire from `from`'s output to one of `to`'s inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

/// The circuit graph: typed nodes and directed wires, acyclic at all times.
///
/// Nodes are kept ordered by id (creation order); edges are kept in
/// insertion order, which is the operand order seen by each gate.
/// Parallel edges are allowed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
    /// Next id index; never decremented, so ids are never reused.
    #[serde(skip)]
    next_index: u32,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId::from_index(self.next_index);
        self.next_index += 1;
        id
    }

    /// Add a node of any kind and return its id.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        label: impl Into<String>,
        geometry: Option<BoundingBox>,
    ) -> NodeId {
        let id = self.alloc_id();
        let label = label.into();
        debug!(node = %id, kind = kind.type_name(), label = %label, "add node");
        self.nodes.insert(
            id,
            Node {
                id,
                kind,
                label,
                geometry,
                output: None,
            },
        );
        self.clear_outputs();
        id
    }

    /// Add a primary input labelled `label`.
    pub fn add_input(&mut self, label: impl Into<String>) -> NodeId {
        self.add_node(NodeKind::Input, label, None)
    }

    /// Add a gate labelled with its type name.
    pub fn add_gate(&mut self, kind: GateKind) -> NodeId {
        self.add_node(NodeKind::Gate(kind), kind.name(), None)
    }

    /// Add a wire `from -> to`.
    ///
    /// Rejects unknown endpoints, self-loops and wires that would close a
    /// cycle; the graph is unchanged on error.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> GraphResult<()> {
        self.require(from)?;
        self.require(to)?;
        if from == to {
            return Err(GraphError::SelfLoop { node: from });
        }
        if validate::reaches(self, to, from) {
            return Err(GraphError::WouldCreateCycle { from, to });
        }
        self.edges.push(Edge { from, to });
        self.clear_outputs();
        debug!(%from, %to, "add wire");
        Ok(())
    }

    /// Remove one wire `from -> to` (the earliest inserted, if parallel).
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) -> GraphResult<()> {
        let pos = self
            .edges
            .iter()
            .position(|e| e.from == from && e.to == to)
            .ok_or(GraphError::EdgeNotFound { from, to })?;
        self.edges.remove(pos);
        self.clear_outputs();
        Ok(())
    }

    /// Remove a node and every wire incident to it.
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let node = self
            .nodes
            .remove(&id)
            .ok_or(GraphError::NodeNotFound { node: id })?;
        let before = self.edges.len();
        self.edges.retain(|e| e.from != id && e.to != id);
        debug!(node = %id, wires = before - self.edges.len(), "remove node");
        self.clear_outputs();
        Ok(node)
    }

    /// Replace a node's geometry (a move on the drawing surface).
    pub fn set_geometry(&mut self, id: NodeId, geometry: BoundingBox) -> GraphResult<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound { node: id })?;
        node.geometry = Some(geometry);
        Ok(())
    }

    /// Rename a node.
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> GraphResult<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound { node: id })?;
        node.label = label.into();
        Ok(())
    }

    /// Record a computed output.
    pub fn set_output(&mut self, id: NodeId, output: Option<bool>) -> GraphResult<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound { node: id })?;
        node.output = output;
        Ok(())
    }

    /// Forget every computed output.
    pub fn clear_outputs(&mut self) {
        for node in self.nodes.values_mut() {
            node.output = None;
        }
    }

    /// Drop every wire, keeping the nodes.
    pub fn clear_edges(&mut self) {
        self.edges.clear();
        self.clear_outputs();
    }

    /// Drop every node and wire. Ids handed out before are not reused.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    fn require(&self, id: NodeId) -> GraphResult<()> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound { node: id })
        }
    }

    /// Iterate nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All wires in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Sources feeding `id`, in wire insertion order, with multiplicity.
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.to == id)
            .map(|e| e.from)
            .collect()
    }

    /// Targets fed by `id`, in wire insertion order, with multiplicity.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.from == id)
            .map(|e| e.to)
            .collect()
    }

    /// Predecessor lists for every node, built in a single pass over the wires.
    pub fn predecessor_lists(&self) -> BTreeMap<NodeId, Vec<NodeId>> {
        let mut lists: BTreeMap<NodeId, Vec<NodeId>> =
            self.nodes.keys().map(|&id| (id, Vec::new())).collect();
        for edge in &self.edges {
            if let Some(list) = lists.get_mut(&edge.to) {
                list.push(edge.from);
            }
        }
        lists
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.to == id).count()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.from == id).count()
    }

    /// Nodes with no incoming wire, in id order.
    pub fn primary_inputs(&self) -> Vec<NodeId> {
        let fed: BTreeSet<NodeId> = self.edges.iter().map(|e| e.to).collect();
        self.node_ids().filter(|id| !fed.contains(id)).collect()
    }

    /// Nodes with no outgoing wire, in id order.
    pub fn sinks(&self) -> Vec<NodeId> {
        let feeding: BTreeSet<NodeId> = self.edges.iter().map(|e| e.from).collect();
        self.node_ids().filter(|id| !feeding.contains(id)).collect()
    }

    /// Topological order of all nodes.
    ///
    /// Kahn's algorithm with the smallest ready id taken first, so the
    /// order depends on topology and ids only.
    pub fn topological_order(&self) -> GraphResult<Vec<NodeId>> {
        let mut in_degree: BTreeMap<NodeId, usize> =
            self.nodes.keys().map(|&id| (id, 0)).collect();
        let mut adj: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();

        for edge in &self.edges {
            let deg = in_degree
                .get_mut(&edge.to)
                .ok_or(GraphError::DanglingEdge {
                    from: edge.from,
                    to: edge.to,
                })?;
            *deg += 1;
            adj.entry(edge.from).or_default().push(edge.to);
        }

        let mut ready: BTreeSet<NodeId> = in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(id) = ready.pop_first() {
            order.push(id);
            for next in adj.get(&id).map(Vec::as_slice).unwrap_or_default() {
                if let Some(deg) = in_degree.get_mut(next) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert(*next);
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            return Err(GraphError::Cyclic {
                remaining: self.nodes.len() - order.len(),
            });
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        g.remove_node(a).unwrap();
        let b = g.add_input("B");
        assert_ne!(a, b);
        g.clear();
        let c = g.add_input("C");
        assert!(c > b);
    }

    #[test]
    fn self_loop_rejected() {
        let mut g = Graph::new();
        let a = g.add_gate(GateKind::And);
        assert_eq!(g.connect(a, a), Err(GraphError::SelfLoop { node: a }));
        assert!(g.edges().is_empty());
    }

    #[test]
    fn cycle_rejected_and_graph_unchanged() {
        let mut g = Graph::new();
        let a = g.add_gate(GateKind::Or);
        let b = g.add_gate(GateKind::Not);
        g.connect(a, b).unwrap();
        let before = g.edges().to_vec();

        assert_eq!(
            g.connect(b, a),
            Err(GraphError::WouldCreateCycle { from: b, to: a })
        );
        assert_eq!(g.edges(), before.as_slice());
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        let b = g.add_input("B");
        let and = g.add_gate(GateKind::And);
        let not = g.add_gate(GateKind::Not);
        g.connect(a, and).unwrap();
        g.connect(b, and).unwrap();
        g.connect(and, not).unwrap();

        g.remove_node(and).unwrap();
        assert!(g.edges().is_empty());
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn parallel_edges_keep_multiplicity() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        let x = g.add_gate(GateKind::Xor);
        g.connect(a, x).unwrap();
        g.connect(a, x).unwrap();
        assert_eq!(g.predecessors(x), vec![a, a]);
        g.disconnect(a, x).unwrap();
        assert_eq!(g.in_degree(x), 1);
    }

    #[test]
    fn primary_inputs_and_sinks() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        let b = g.add_input("B");
        let and = g.add_gate(GateKind::And);
        g.connect(a, and).unwrap();
        g.connect(b, and).unwrap();
        assert_eq!(g.primary_inputs(), vec![a, b]);
        assert_eq!(g.sinks(), vec![and]);
    }

    #[test]
    fn topological_order_respects_edges() {
        let mut g = Graph::new();
        let not = g.add_gate(GateKind::Not);
        let a = g.add_input("A");
        let or = g.add_gate(GateKind::Or);
        g.connect(a, not).unwrap();
        g.connect(not, or).unwrap();
        g.connect(a, or).unwrap();

        let order = g.topological_order().unwrap();
        assert_eq!(order, vec![a, not, or]);
    }

    #[test]
    fn structural_edits_clear_outputs() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        g.set_output(a, Some(true)).unwrap();
        let n = g.add_gate(GateKind::Not);
        assert_eq!(g.node(a).unwrap().output, None);
        g.set_output(a, Some(true)).unwrap();
        g.connect(a, n).unwrap();
        assert_eq!(g.node(a).unwrap().output, None);
    }
}
