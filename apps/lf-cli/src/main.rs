use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lf_app::{
    AnalysisReport, AnalysisStatus, AppError, AppResult, CircuitBuild, SimulationTable, analyze,
    build_circuit, doc_inputs, expression_csv, load_circuit, resolve_layered_inputs,
    run_simulation, write_exports,
};
use lf_graph::{BuildOptions, BuildReport};
use lf_sim::UnsetInputPolicy;
use lf_synth::{SynthOptions, TransformRow, TruthTable, transformation_table, truth_table};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lf")]
#[command(about = "LogicFlow CLI - build, simulate and analyze logic circuits", long_about = None)]
struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
    /// Hit-test tolerance for stroke endpoints (overrides the document)
    #[arg(long, global = true)]
    tolerance: Option<f64>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and show nodes, wires and what was dropped
    Build {
        /// Path to the circuit document (YAML or JSON)
        doc: PathBuf,
    },
    /// Simulate the circuit and print every node's output
    Simulate {
        /// Path to the circuit document (YAML or JSON)
        doc: PathBuf,
        /// Input value as LABEL_OR_ID=0|1 (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, bool)>,
        /// Leave inputs without a value unresolved instead of reading 0
        #[arg(long)]
        unset_unresolved: bool,
    },
    /// Derive expressions, truth tables and transformations for each output
    Synth {
        /// Path to the circuit document (YAML or JSON)
        doc: PathBuf,
    },
    /// Print the truth table of an expression
    TruthTable {
        expression: String,
        /// Output column name
        #[arg(long, default_value = "Y")]
        output_name: String,
        /// Print as CSV
        #[arg(long)]
        csv: bool,
    },
    /// Print the transformation table of an expression
    Transform { expression: String },
    /// Export truth table (CSV) and expressions (text) of a circuit
    Export {
        /// Path to the circuit document (YAML or JSON)
        doc: PathBuf,
        /// Truth table CSV output path
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Expression text output path
        #[arg(long)]
        text: Option<PathBuf>,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, bool), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL_OR_ID=0|1, got '{raw}'"))?;
    let value = match value.trim() {
        "0" => false,
        "1" => true,
        other => return Err(format!("value must be 0 or 1, got '{other}'")),
    };
    Ok((key.trim().to_string(), value))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let out = Output { json: cli.json };
    match cli.command {
        Commands::Build { doc } => cmd_build(&doc, cli.tolerance, out),
        Commands::Simulate {
            doc,
            set,
            unset_unresolved,
        } => cmd_simulate(&doc, cli.tolerance, &set, unset_unresolved, out),
        Commands::Synth { doc } => cmd_synth(&doc, cli.tolerance, out),
        Commands::TruthTable {
            expression,
            output_name,
            csv,
        } => cmd_truth_table(&expression, &output_name, csv, out),
        Commands::Transform { expression } => cmd_transform(&expression, out),
        Commands::Export { doc, csv, text } => {
            cmd_export(&doc, cli.tolerance, csv.as_deref(), text.as_deref())
        }
    }
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn print_json<T: Serialize>(&self, value: &T) -> AppResult<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::InvalidInput(format!("Failed to serialize output: {e}")))?;
        println!("{text}");
        Ok(())
    }
}

struct Loaded {
    doc: lf_project::CircuitDoc,
    build: CircuitBuild,
}

fn load_and_build(path: &Path, tolerance: Option<f64>) -> AppResult<Loaded> {
    let doc = load_circuit(path)?;
    let mut options: BuildOptions = doc.settings.build_options();
    if let Some(tolerance) = tolerance {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "tolerance must be finite and non-negative, got {tolerance}"
            )));
        }
        options.tolerance = tolerance;
    }
    tracing::debug!(?options, "build options");
    let build = build_circuit(&doc, &options);
    Ok(Loaded { doc, build })
}

fn print_report(report: &BuildReport) {
    println!(
        "Built {} node(s), {} wire(s)",
        report.nodes_added, report.edges_added
    );
    let dropped = [
        ("malformed components", report.malformed_components),
        ("duplicate components", report.duplicate_components),
        ("skipped detections", report.skipped_detections),
        ("malformed strokes", report.malformed_strokes),
        ("unresolved endpoints", report.unresolved_endpoints),
        ("self-loops", report.self_loops),
        ("cycle-forming wires", report.rejected_cycles),
    ];
    for (what, count) in dropped {
        if count > 0 {
            println!("  dropped {count} {what}");
        }
    }
}

fn cmd_build(path: &Path, tolerance: Option<f64>, out: Output) -> AppResult<()> {
    let Loaded { doc, build } = load_and_build(path, tolerance)?;

    if out.json {
        #[derive(Serialize)]
        struct BuildOutput<'a> {
            name: &'a str,
            report: &'a BuildReport,
            summary: lf_app::CircuitSummary,
            graph: &'a lf_graph::Graph,
        }
        return out.print_json(&BuildOutput {
            name: &doc.name,
            report: &build.report,
            summary: build.summary(),
            graph: &build.graph,
        });
    }

    println!("Circuit: {} ({:?} build)", doc.name, build.mode);
    print_report(&build.report);
    println!("Nodes:");
    for node in build.graph.nodes() {
        println!("  {:>4}  {:<6} {}", node.id, node.kind.type_name(), node.label);
    }
    println!("Wires:");
    for edge in build.graph.edges() {
        println!("  {} -> {}", edge.from, edge.to);
    }
    Ok(())
}

fn print_simulation(table: &SimulationTable) {
    println!("{:>4}  {:<12} {:<6} output", "id", "label", "type");
    for row in &table.rows {
        println!(
            "{:>4}  {:<12} {:<6} {}",
            row.id, row.label, row.node_type, row.output
        );
    }
    for warning in &table.warnings {
        println!("warning: {warning}");
    }
    for id in &table.ignored_inputs {
        println!("warning: value for node {id} ignored (not a primary input)");
    }
}

fn cmd_simulate(
    path: &Path,
    tolerance: Option<f64>,
    set: &[(String, bool)],
    unset_unresolved: bool,
    out: Output,
) -> AppResult<()> {
    let Loaded { doc, build } = load_and_build(path, tolerance)?;

    let overrides: BTreeMap<String, bool> = set.iter().cloned().collect();
    let inputs = resolve_layered_inputs(&build, &doc_inputs(&doc), &overrides)?;

    let mut options = doc.settings.sim_options();
    if unset_unresolved {
        options.unset_inputs = UnsetInputPolicy::Unresolved;
    }
    let (_, table) = run_simulation(&build.graph, &inputs, &options)?;

    if out.json {
        return out.print_json(&table);
    }
    print_simulation(&table);
    Ok(())
}

fn print_truth_table(table: &TruthTable, output_name: &str) {
    let bit = |b: bool| if b { "1" } else { "0" };
    let mut header = table.variables.join(" ");
    if !header.is_empty() {
        header.push_str(" | ");
    }
    header.push_str(output_name);
    println!("{header}");
    for row in &table.rows {
        let cells: Vec<String> = table
            .variables
            .iter()
            .zip(&row.inputs)
            .map(|(name, &b)| format!("{:>width$}", bit(b), width = name.len()))
            .collect();
        let mut line = cells.join(" ");
        if !line.is_empty() {
            line.push_str(" | ");
        }
        line.push_str(bit(row.output));
        println!("{line}");
    }
}

fn print_transformations(rows: &[TransformRow]) {
    let width = rows.iter().map(|r| r.rule.len()).max().unwrap_or(0);
    for row in rows {
        println!("  {:<width$}  {}", row.rule, row.expression);
    }
}

fn print_analysis(report: &AnalysisReport) {
    if report.status == AnalysisStatus::NoOutputs {
        println!("No outputs: the circuit has no sink node.");
        return;
    }
    for sink in &report.sinks {
        println!("{} (node {}) = {}", sink.label, sink.node, sink.expression);
        match &sink.truth_table {
            Some(table) => print_truth_table(table, &sink.label),
            None => println!("  (too many variables for a truth table)"),
        }
        println!("Transformations:");
        print_transformations(&sink.transformations);
        println!();
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
}

fn cmd_synth(path: &Path, tolerance: Option<f64>, out: Output) -> AppResult<()> {
    let Loaded { doc, build } = load_and_build(path, tolerance)?;
    let report = analyze(&build.graph, &doc.settings.synth_options())?;

    if out.json {
        return out.print_json(&report);
    }
    print_analysis(&report);
    Ok(())
}

fn cmd_truth_table(expression: &str, output_name: &str, csv: bool, out: Output) -> AppResult<()> {
    if csv {
        print!("{}", expression_csv(expression, output_name)?);
        return Ok(());
    }
    let table = truth_table(expression)?;
    if out.json {
        return out.print_json(&table);
    }
    print_truth_table(&table, output_name);
    Ok(())
}

fn cmd_transform(expression: &str, out: Output) -> AppResult<()> {
    let rows = transformation_table(expression)?;
    if out.json {
        return out.print_json(&rows);
    }
    print_transformations(&rows);
    Ok(())
}

fn cmd_export(
    path: &Path,
    tolerance: Option<f64>,
    csv: Option<&Path>,
    text: Option<&Path>,
) -> AppResult<()> {
    if csv.is_none() && text.is_none() {
        return Err(AppError::InvalidInput(
            "nothing to export: pass --csv and/or --text".to_string(),
        ));
    }
    let Loaded { doc, build } = load_and_build(path, tolerance)?;
    let options: SynthOptions = doc.settings.synth_options();
    let report = analyze(&build.graph, &options)?;
    if report.status == AnalysisStatus::NoOutputs {
        println!("No outputs: the circuit has no sink node; nothing exported.");
        return Ok(());
    }

    write_exports(&report, &options, csv, text)?;
    if let Some(path) = csv {
        println!("✓ Truth table exported to {}", path.display());
    }
    if let Some(path) = text {
        println!("✓ Expressions exported to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_parse() {
        assert_eq!(parse_assignment("A=1"), Ok(("A".to_string(), true)));
        assert_eq!(parse_assignment(" 3 = 0"), Ok(("3".to_string(), false)));
        assert!(parse_assignment("A").is_err());
        assert!(parse_assignment("A=2").is_err());
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lf",
            "simulate",
            "c.yaml",
            "--set",
            "A=1",
            "--set",
            "B=0",
            "--json",
            "--tolerance",
            "20",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.tolerance, Some(20.0));
        match cli.command {
            Commands::Simulate { set, .. } => assert_eq!(set.len(), 2),
            _ => panic!("expected simulate"),
        }
    }
}
