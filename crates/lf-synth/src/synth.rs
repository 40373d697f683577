//! Expression synthesis from a circuit graph.

use std::collections::{BTreeMap, BTreeSet};

use lf_core::NodeId;
use lf_graph::{ArityWarning, GateKind, Graph, NodeKind};
use tracing::{debug, warn};

use crate::error::{SynthError, SynthResult};
use crate::expr::Expr;
use crate::parse::parse_expression;

/// Largest expression tree, in nodes, that synthesis will build.
///
/// Shared sub-circuits are copied into every consumer, so reconvergent
/// fan-out can double the tree at each level.
pub const MAX_EXPRESSION_NODES: usize = 1 << 16;

/// The expression computed at one sink node.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkExpression {
    pub node: NodeId,
    pub label: String,
    pub expr: Expr,
    pub text: String,
}

/// Per-sink expressions of a circuit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Synthesis {
    /// One entry per sink, keyed by node id.
    pub outputs: BTreeMap<NodeId, SinkExpression>,
    /// Variable name used for each primary input.
    pub symbols: BTreeMap<String, NodeId>,
    /// Gates combined with a mismatched operand count.
    pub warnings: Vec<ArityWarning>,
}

impl Synthesis {
    /// `true` when the graph has no sink, so no output is defined.
    pub fn no_outputs(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn expression(&self, sink: NodeId) -> Option<&str> {
        self.outputs.get(&sink).map(|s| s.text.as_str())
    }

    /// Sink id to expression text.
    pub fn expressions(&self) -> BTreeMap<NodeId, String> {
        self.outputs
            .iter()
            .map(|(id, s)| (*id, s.text.clone()))
            .collect()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn sanitize(label: &str) -> String {
    let mut name: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        name.insert(0, 'n');
    }
    name
}

/// Assign a variable name to every primary input.
///
/// A label that is a valid identifier and unique among primary inputs is
/// used as is; otherwise the name is the sanitized label suffixed with the
/// node id.
fn assign_symbols(graph: &Graph, primary: &[NodeId]) -> BTreeMap<NodeId, String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in primary {
        if let Some(node) = graph.node(*id) {
            *counts.entry(node.label.as_str()).or_default() += 1;
        }
    }

    let mut taken: BTreeSet<String> = counts
        .iter()
        .filter(|(label, n)| **n == 1 && is_identifier(label))
        .map(|(label, _)| label.to_string())
        .collect();

    let mut symbols = BTreeMap::new();
    for id in primary {
        let Some(node) = graph.node(*id) else {
            continue;
        };
        let label = node.label.as_str();
        let name = if counts.get(label) == Some(&1) && is_identifier(label) {
            label.to_string()
        } else {
            let mut name = format!("{}_{}", sanitize(label), id);
            while taken.contains(&name) {
                name.push('_');
            }
            taken.insert(name.clone());
            name
        };
        symbols.insert(*id, name);
    }
    symbols
}

/// Combine operand expressions according to a gate type.
///
/// Uses the same operand fitting as evaluation: fixed-arity gates keep
/// their leading operands and read missing ones as `0`.
pub fn gate_expression(kind: GateKind, operands: &[Expr]) -> Expr {
    if operands.is_empty() {
        return Expr::Const(false);
    }
    let (mut ops, _) = kind.fit_operands(operands, Expr::Const(false));
    match kind {
        GateKind::And => Expr::And(ops),
        GateKind::Or => Expr::Or(ops),
        GateKind::Nand => Expr::not(Expr::And(ops)),
        GateKind::Nor => Expr::not(Expr::Or(ops)),
        GateKind::Not => Expr::not(ops.swap_remove(0)),
        GateKind::Xor | GateKind::Xnor => {
            let rhs = ops.swap_remove(1);
            let lhs = ops.swap_remove(0);
            let xor = Expr::xor(lhs, rhs);
            if kind == GateKind::Xnor {
                Expr::not(xor)
            } else {
                xor
            }
        }
    }
}

/// Build a symbolic expression for every sink node.
///
/// Nodes are visited in topological order; primary inputs become
/// variables and each gate combines its predecessors' expressions in wire
/// order. A graph without sinks yields an empty [`Synthesis`].
pub fn synthesize_expression(graph: &Graph) -> SynthResult<Synthesis> {
    let order = graph.topological_order()?;
    let preds = graph.predecessor_lists();
    let sinks = graph.sinks();
    if sinks.is_empty() {
        debug!("graph has no sink; no output defined");
        return Ok(Synthesis::default());
    }

    let primary: Vec<NodeId> = preds
        .iter()
        .filter(|(_, p)| p.is_empty())
        .map(|(id, _)| *id)
        .collect();
    let symbol_of = assign_symbols(graph, &primary);

    let mut exprs: BTreeMap<NodeId, Expr> = BTreeMap::new();
    let mut sizes: BTreeMap<NodeId, usize> = BTreeMap::new();
    let mut warnings = Vec::new();

    for id in order {
        let node = graph
            .node(id)
            .ok_or(lf_graph::GraphError::NodeNotFound { node: id })?;
        let sources = preds.get(&id).map(Vec::as_slice).unwrap_or_default();

        let size = match (node.kind, sources.first()) {
            (_, None) => 1,
            (NodeKind::Input, Some(first)) => sizes.get(first).copied().unwrap_or(1),
            (NodeKind::Gate(_), Some(_)) => sources.iter().fold(1usize, |acc, src| {
                acc.saturating_add(sizes.get(src).copied().unwrap_or(1))
            }),
        };
        if size > MAX_EXPRESSION_NODES {
            return Err(SynthError::ExpressionTooLarge {
                node: id.to_string(),
                max: MAX_EXPRESSION_NODES,
            });
        }
        sizes.insert(id, size);

        let expr = if sources.is_empty() {
            let name = symbol_of
                .get(&id)
                .ok_or(lf_graph::GraphError::NodeNotFound { node: id })?;
            Expr::var(name.clone())
        } else {
            let operands = sources
                .iter()
                .map(|src| {
                    exprs
                        .get(src)
                        .cloned()
                        .ok_or(lf_graph::GraphError::NodeNotFound { node: *src })
                })
                .collect::<Result<Vec<_>, _>>()?;
            match node.kind {
                NodeKind::Input => operands[0].clone(),
                NodeKind::Gate(kind) => {
                    if let Some(warning) = kind.check_arity(id, operands.len()) {
                        warn!(%warning, "arity mismatch");
                        warnings.push(warning);
                    }
                    gate_expression(kind, &operands)
                }
            }
        };
        exprs.insert(id, expr);
    }

    let mut outputs = BTreeMap::new();
    for sink in sinks {
        let (Some(node), Some(expr)) = (graph.node(sink), exprs.remove(&sink)) else {
            continue;
        };
        let text = expr.to_string();
        // the text is handed to the table builders, so it has to parse back
        parse_expression(&text).map_err(|e| SynthError::Inconsistent {
            node: sink.to_string(),
            message: e.to_string(),
        })?;
        debug!(sink = %sink, label = %node.label, expression = %text, "synthesized");
        outputs.insert(
            sink,
            SinkExpression {
                node: sink,
                label: node.label.clone(),
                expr,
                text,
            },
        );
    }

    Ok(Synthesis {
        outputs,
        symbols: symbol_of.into_iter().map(|(id, name)| (name, id)).collect(),
        warnings,
    })
}
