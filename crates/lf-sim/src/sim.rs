//! Simulation runner.

use std::collections::BTreeMap;

use lf_core::NodeId;
use lf_graph::{ArityWarning, Graph, NodeKind};
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};

/// Values for primary inputs, keyed by node id.
pub type InputValues = BTreeMap<NodeId, bool>;

/// What a primary input reads when the caller gave it no value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnsetInputPolicy {
    /// Read as `0`.
    #[default]
    Low,
    /// Leave unresolved; everything downstream is unresolved too.
    Unresolved,
}

/// Options for simulation runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimOptions {
    pub unset_inputs: UnsetInputPolicy,
}

/// Result of a simulation run.
#[derive(Clone, Debug)]
pub struct SimOutcome {
    /// Copy of the input graph with every node's `output` populated
    /// (`None` where unresolved).
    pub graph: Graph,
    /// Gates evaluated with a mismatched input count.
    pub warnings: Vec<ArityWarning>,
    /// Supplied values that did not address a primary input.
    pub ignored_inputs: Vec<NodeId>,
}

impl SimOutcome {
    /// Computed output of a node (`None` if unresolved or unknown).
    pub fn output(&self, id: NodeId) -> Option<bool> {
        self.graph.node(id).and_then(|n| n.output)
    }

    /// Every node's output in id order.
    pub fn outputs(&self) -> BTreeMap<NodeId, Option<bool>> {
        self.graph.nodes().map(|n| (n.id, n.output)).collect()
    }
}

/// Simulate with default options (unset primary inputs read `0`).
pub fn simulate(graph: &Graph, inputs: &InputValues) -> SimResult<SimOutcome> {
    simulate_with(graph, inputs, &SimOptions::default())
}

/// Compute every node's output in topological order.
///
/// Primary inputs are the nodes with no incoming wire, whatever their kind.
/// A gate with any unresolved operand is unresolved. An input node that
/// has been wired into passes its first operand through.
pub fn simulate_with(
    graph: &Graph,
    inputs: &InputValues,
    opts: &SimOptions,
) -> SimResult<SimOutcome> {
    let order = graph.topological_order()?;
    let preds = graph.predecessor_lists();

    let ignored_inputs: Vec<NodeId> = inputs
        .keys()
        .filter(|id| preds.get(*id).is_none_or(|p| !p.is_empty()))
        .copied()
        .collect();
    for id in &ignored_inputs {
        warn!(node = %id, "value supplied for a node that is not a primary input");
    }

    let mut values: BTreeMap<NodeId, Option<bool>> = BTreeMap::new();
    let mut warnings = Vec::new();

    for id in order {
        let sources = preds.get(&id).ok_or_else(|| SimError::Invariant {
            what: format!("no predecessor list for node {id}"),
        })?;
        let node = graph.node(id).ok_or_else(|| SimError::Invariant {
            what: format!("node {id} missing from graph"),
        })?;

        let value = if sources.is_empty() {
            match (inputs.get(&id), opts.unset_inputs) {
                (Some(&v), _) => Some(v),
                (None, UnsetInputPolicy::Low) => Some(false),
                (None, UnsetInputPolicy::Unresolved) => None,
            }
        } else {
            let operands: Option<Vec<bool>> = sources
                .iter()
                .map(|src| values.get(src).copied().flatten())
                .collect();
            match (node.kind, operands) {
                (_, None) => None,
                (NodeKind::Input, Some(ops)) => ops.first().copied(),
                (NodeKind::Gate(kind), Some(ops)) => {
                    if let Some(warning) = kind.check_arity(id, ops.len()) {
                        warn!(%warning, "arity mismatch");
                        warnings.push(warning);
                    }
                    Some(kind.evaluate(&ops))
                }
            }
        };
        debug!(node = %id, label = %node.label, ?value, "evaluated");
        values.insert(id, value);
    }

    let mut out = graph.clone();
    for (id, value) in values {
        out.set_output(id, value)?;
    }

    Ok(SimOutcome {
        graph: out,
        warnings,
        ignored_inputs,
    })
}
