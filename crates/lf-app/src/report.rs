//! Presentation payloads for simulation and analysis.

use std::collections::BTreeMap;
use std::fmt;

use lf_core::NodeId;
use lf_graph::{ArityWarning, Graph};
use lf_sim::{InputValues, SimOptions, SimOutcome, simulate_with};
use lf_synth::{
    SynthError, SynthOptions, TransformRow, TruthTable, synthesize_expression,
    transformation_table_for, truth_table_for,
};
use serde::{Serialize, Serializer};
use tracing::info;

use crate::error::AppResult;

/// A node output as displayed: `0`, `1`, or `unresolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputCell(pub Option<bool>);

impl fmt::Display for OutputCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.0 {
            Some(true) => "1",
            Some(false) => "0",
            None => "unresolved",
        })
    }
}

impl Serialize for OutputCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationRow {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub output: OutputCell,
}

/// Every node's output after a run, in node id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationTable {
    pub rows: Vec<SimulationRow>,
    pub warnings: Vec<ArityWarning>,
    pub ignored_inputs: Vec<NodeId>,
}

impl From<&SimOutcome> for SimulationTable {
    fn from(outcome: &SimOutcome) -> Self {
        let rows = outcome
            .graph
            .nodes()
            .map(|node| SimulationRow {
                id: node.id,
                label: node.label.clone(),
                node_type: node.kind.type_name(),
                output: OutputCell(node.output),
            })
            .collect();
        Self {
            rows,
            warnings: outcome.warnings.clone(),
            ignored_inputs: outcome.ignored_inputs.clone(),
        }
    }
}

/// Simulate and tabulate in one step.
pub fn run_simulation(
    graph: &Graph,
    inputs: &InputValues,
    options: &SimOptions,
) -> AppResult<(SimOutcome, SimulationTable)> {
    let outcome = simulate_with(graph, inputs, options)?;
    let table = SimulationTable::from(&outcome);
    Ok((outcome, table))
}

/// Whether any sink exists to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Ok,
    /// The graph has no sink, so no output is defined.
    NoOutputs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinkAnalysis {
    pub node: NodeId,
    pub label: String,
    pub expression: String,
    /// `None` when the expression has too many variables to enumerate.
    pub truth_table: Option<TruthTable>,
    pub transformations: Vec<TransformRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub status: AnalysisStatus,
    pub sinks: Vec<SinkAnalysis>,
    /// Variable name of each primary input.
    pub symbols: BTreeMap<String, NodeId>,
    pub warnings: Vec<ArityWarning>,
}

impl AnalysisReport {
    pub fn sink(&self, node: NodeId) -> Option<&SinkAnalysis> {
        self.sinks.iter().find(|s| s.node == node)
    }
}

/// Synthesize every sink and attach its truth and transformation tables.
pub fn analyze(graph: &Graph, options: &SynthOptions) -> AppResult<AnalysisReport> {
    let synthesis = synthesize_expression(graph)?;
    if synthesis.no_outputs() {
        info!("no sink in graph; nothing to analyze");
        return Ok(AnalysisReport {
            status: AnalysisStatus::NoOutputs,
            sinks: Vec::new(),
            symbols: synthesis.symbols,
            warnings: synthesis.warnings,
        });
    }

    let mut sinks = Vec::with_capacity(synthesis.outputs.len());
    for out in synthesis.outputs.values() {
        let truth_table = match truth_table_for(&out.expr, options) {
            Ok(table) => Some(table),
            Err(SynthError::TooManyVariables { count, max }) => {
                info!(sink = %out.node, count, max, "truth table skipped");
                None
            }
            Err(err) => return Err(err.into()),
        };
        sinks.push(SinkAnalysis {
            node: out.node,
            label: out.label.clone(),
            expression: out.text.clone(),
            truth_table,
            transformations: transformation_table_for(&out.expr, options),
        });
    }

    Ok(AnalysisReport {
        status: AnalysisStatus::Ok,
        sinks,
        symbols: synthesis.symbols,
        warnings: synthesis.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_graph::GateKind;
    use lf_sim::UnsetInputPolicy;

    #[test]
    fn outputs_render_as_bits_or_unresolved() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        let b = g.add_input("B");
        let and = g.add_gate(GateKind::And);
        g.connect(a, and).unwrap();
        g.connect(b, and).unwrap();

        let opts = SimOptions {
            unset_inputs: UnsetInputPolicy::Unresolved,
        };
        let (_, table) = run_simulation(&g, &InputValues::from([(a, true)]), &opts).unwrap();
        let cells: Vec<String> = table.rows.iter().map(|r| r.output.to_string()).collect();
        assert_eq!(cells, vec!["1", "unresolved", "unresolved"]);
        assert_eq!(table.rows[2].node_type, "AND");
        assert_eq!(table.rows[0].node_type, "INPUT");
    }

    #[test]
    fn empty_graph_has_no_outputs() {
        let report = analyze(&Graph::new(), &SynthOptions::default()).unwrap();
        assert_eq!(report.status, AnalysisStatus::NoOutputs);
        assert!(report.sinks.is_empty());
    }

    #[test]
    fn oversized_sink_keeps_expression_without_table() {
        let mut g = Graph::new();
        let or = g.add_gate(GateKind::Or);
        for name in ["A", "B", "C"] {
            let input = g.add_input(name);
            g.connect(input, or).unwrap();
        }
        let report = analyze(&g, &SynthOptions { max_variables: 2 }).unwrap();
        let sink = report.sink(or).unwrap();
        assert_eq!(sink.expression, "A | B | C");
        assert!(sink.truth_table.is_none());
        assert!(
            sink.transformations
                .iter()
                .all(|row| row.rule != "Sum of products")
        );
    }
}
