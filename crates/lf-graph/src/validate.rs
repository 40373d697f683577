//! Graph validation logic.

use std::collections::{BTreeMap, HashSet};

use lf_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::gate::ArityWarning;
use crate::graph::Graph;

/// Whether `target` is reachable from `start` along wires (including `start == target`).
pub(crate) fn reaches(graph: &Graph, start: NodeId, target: NodeId) -> bool {
    if start == target {
        return true;
    }
    let mut adj: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for edge in graph.edges() {
        adj.entry(edge.from).or_default().push(edge.to);
    }

    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        for &next in adj.get(&id).map(Vec::as_slice).unwrap_or_default() {
            if next == target {
                return true;
            }
            stack.push(next);
        }
    }
    false
}

/// Validate the graph structure: no dangling wires, no self-loops, acyclic.
pub fn validate(graph: &Graph) -> GraphResult<()> {
    for edge in graph.edges() {
        if !graph.contains(edge.from) || !graph.contains(edge.to) {
            return Err(GraphError::DanglingEdge {
                from: edge.from,
                to: edge.to,
            });
        }
        if edge.from == edge.to {
            return Err(GraphError::SelfLoop { node: edge.from });
        }
    }

    // Check for cycles by attempting to compute a topological order
    graph.topological_order()?;

    Ok(())
}

/// Arity mismatches of every gate that is fed by at least one wire.
///
/// Gates with no incoming wire are primary inputs and take their value
/// from the caller, so they are not reported.
pub fn arity_warnings(graph: &Graph) -> Vec<ArityWarning> {
    graph
        .predecessor_lists()
        .into_iter()
        .filter(|(_, preds)| !preds.is_empty())
        .filter_map(|(id, preds)| {
            let kind = graph.node(id)?.kind.gate()?;
            kind.check_arity(id, preds.len())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{Arity, GateKind};

    #[test]
    fn validate_empty_graph() {
        assert!(validate(&Graph::new()).is_ok());
    }

    #[test]
    fn reachability_follows_direction() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        let n = g.add_gate(GateKind::Not);
        let o = g.add_gate(GateKind::Or);
        g.connect(a, n).unwrap();
        g.connect(n, o).unwrap();

        assert!(reaches(&g, a, o));
        assert!(!reaches(&g, o, a));
        assert!(reaches(&g, n, n));
    }

    #[test]
    fn arity_warnings_skip_primary_gates() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        let b = g.add_input("B");
        let lone_xor = g.add_gate(GateKind::Xor);
        let not = g.add_gate(GateKind::Not);
        g.connect(a, not).unwrap();
        g.connect(b, not).unwrap();
        g.connect(not, lone_xor).unwrap();

        let warnings = arity_warnings(&g);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].kind, GateKind::Xor);
        assert_eq!(warnings[0].expected, Arity::Exactly(2));
        assert_eq!(warnings[1].node, not);
        assert_eq!(warnings[1].actual, 2);
    }
}
