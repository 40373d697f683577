//! Plain-text and CSV exports of an analysis.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use lf_synth::{Assignment, SynthOptions, input_rows, truth_table};

use crate::error::{AppError, AppResult};
use crate::report::{AnalysisReport, AnalysisStatus};

/// Column name per sink: the label, or `label_id` when labels collide.
fn sink_columns(report: &AnalysisReport) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for sink in &report.sinks {
        *counts.entry(sink.label.as_str()).or_default() += 1;
    }
    report
        .sinks
        .iter()
        .map(|sink| {
            if counts[sink.label.as_str()] == 1 {
                sink.label.clone()
            } else {
                format!("{}_{}", sink.label, sink.node)
            }
        })
        .collect()
}

/// One `<sink label> = <expression>` line per sink.
pub fn expressions_text(report: &AnalysisReport) -> String {
    let mut text = String::new();
    for sink in &report.sinks {
        text.push_str(&format!("{} = {}\n", sink.label, sink.expression));
    }
    text
}

/// Truth table CSV over every sink.
///
/// The header is the sorted union of the sinks' variables followed by one
/// column per sink; rows enumerate all assignments in ascending binary
/// order. With a single sink this is exactly that sink's truth table.
pub fn truth_table_csv(report: &AnalysisReport, options: &SynthOptions) -> AppResult<String> {
    if report.status == AnalysisStatus::NoOutputs {
        return Err(AppError::InvalidInput(
            "circuit has no output to tabulate".to_string(),
        ));
    }

    let exprs = report
        .sinks
        .iter()
        .map(|sink| lf_synth::parse_expression(&sink.expression))
        .collect::<Result<Vec<_>, _>>()?;
    let variables: Vec<String> = exprs
        .iter()
        .flat_map(|e| e.variables())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let rows = input_rows(variables.len(), *options)?;

    let mut header = variables.clone();
    header.extend(sink_columns(report));
    let mut csv = header.join(",");
    csv.push('\n');

    let bit = |b: bool| if b { "1" } else { "0" };
    for inputs in rows {
        let env: Assignment = variables.iter().cloned().zip(inputs.iter().copied()).collect();
        let mut cells: Vec<&str> = inputs.iter().map(|&b| bit(b)).collect();
        for expr in &exprs {
            cells.push(bit(expr.eval(&env)?));
        }
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }
    Ok(csv)
}

/// CSV of a single expression's truth table.
pub fn expression_csv(expression: &str, output_name: &str) -> AppResult<String> {
    Ok(truth_table(expression)?.to_csv(output_name))
}

/// Write whichever exports were requested.
pub fn write_exports(
    report: &AnalysisReport,
    options: &SynthOptions,
    csv_path: Option<&Path>,
    text_path: Option<&Path>,
) -> AppResult<()> {
    if let Some(path) = csv_path {
        std::fs::write(path, truth_table_csv(report, options)?)?;
        tracing::info!(path = %path.display(), "truth table written");
    }
    if let Some(path) = text_path {
        std::fs::write(path, expressions_text(report))?;
        tracing::info!(path = %path.display(), "expressions written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::analyze;
    use lf_graph::{GateKind, Graph};

    fn half_adder() -> Graph {
        let mut g = Graph::new();
        let a = g.add_input("A");
        let b = g.add_input("B");
        let x = g.add_gate(GateKind::Xor);
        let c = g.add_gate(GateKind::And);
        for gate in [x, c] {
            g.connect(a, gate).unwrap();
            g.connect(b, gate).unwrap();
        }
        g
    }

    #[test]
    fn text_lists_each_sink() {
        let report = analyze(&half_adder(), &SynthOptions::default()).unwrap();
        assert_eq!(expressions_text(&report), "XOR = A ^ B\nAND = A & B\n");
    }

    #[test]
    fn csv_has_one_column_per_sink() {
        let report = analyze(&half_adder(), &SynthOptions::default()).unwrap();
        let csv = truth_table_csv(&report, &SynthOptions::default()).unwrap();
        assert_eq!(csv, "A,B,XOR,AND\n0,0,0,0\n0,1,1,0\n1,0,1,0\n1,1,0,1\n");
    }

    #[test]
    fn single_sink_matches_expression_csv() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        let n = g.add_gate(GateKind::Not);
        g.connect(a, n).unwrap();
        let report = analyze(&g, &SynthOptions::default()).unwrap();
        let csv = truth_table_csv(&report, &SynthOptions::default()).unwrap();
        assert_eq!(csv, expression_csv("~A", "NOT").unwrap());
    }

    #[test]
    fn colliding_labels_get_ids() {
        let mut g = Graph::new();
        let a = g.add_input("A");
        let n1 = g.add_gate(GateKind::Not);
        let n2 = g.add_gate(GateKind::Not);
        g.connect(a, n1).unwrap();
        g.connect(a, n2).unwrap();
        let report = analyze(&g, &SynthOptions::default()).unwrap();
        let csv = truth_table_csv(&report, &SynthOptions::default()).unwrap();
        assert!(csv.starts_with("A,NOT_1,NOT_2\n"));
    }

    #[test]
    fn no_outputs_cannot_be_tabulated() {
        let report = analyze(&Graph::new(), &SynthOptions::default()).unwrap();
        assert!(truth_table_csv(&report, &SynthOptions::default()).is_err());
        assert_eq!(expressions_text(&report), "");
    }
}
