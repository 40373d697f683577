//! Smoke tests for the lf-app service layer over the demo circuits.

use std::path::PathBuf;

use lf_app::{
    AnalysisStatus, analyze, build_from_doc, doc_inputs, expressions_text, load_circuit,
    resolve_inputs, run_simulation, truth_table_csv,
};

fn demo(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("demos");
    path.push(name);
    path
}

fn outputs_by_label(name: &str) -> Vec<(String, String)> {
    let doc = load_circuit(&demo(name)).expect("Failed to load circuit");
    let build = build_from_doc(&doc);
    let inputs = resolve_inputs(&build, &doc_inputs(&doc)).unwrap();
    let (_, table) = run_simulation(&build.graph, &inputs, &doc.settings.sim_options()).unwrap();
    table
        .rows
        .into_iter()
        .map(|r| (r.label, r.output.to_string()))
        .collect()
}

#[test]
fn half_adder_demo() {
    let doc = load_circuit(&demo("half_adder.yaml")).unwrap();
    let build = build_from_doc(&doc);
    assert_eq!(build.report.edges_added, 4);

    let report = analyze(&build.graph, &doc.settings.synth_options()).unwrap();
    assert_eq!(report.status, AnalysisStatus::Ok);
    assert_eq!(expressions_text(&report), "XOR = A ^ B\nAND = A & B\n");

    let outputs = outputs_by_label("half_adder.yaml");
    assert!(outputs.contains(&("XOR".to_string(), "0".to_string())));
    assert!(outputs.contains(&("AND".to_string(), "1".to_string())));
}

#[test]
fn drawn_nand_demo() {
    let doc = load_circuit(&demo("drawn_nand.yaml")).unwrap();
    let build = build_from_doc(&doc);
    assert_eq!(build.report.edges_added, 3);
    assert_eq!(build.report.unresolved_endpoints, 1);

    let report = analyze(&build.graph, &doc.settings.synth_options()).unwrap();
    assert_eq!(report.sinks.len(), 1);
    assert_eq!(report.sinks[0].expression, "~(A & B)");

    let outputs = outputs_by_label("drawn_nand.yaml");
    assert_eq!(outputs.last(), Some(&("NOT".to_string(), "1".to_string())));
}

#[test]
fn canvas_demo() {
    let doc = load_circuit(&demo("canvas_or.json")).unwrap();
    let build = build_from_doc(&doc);
    assert_eq!(build.report.edges_added, 2);

    let report = analyze(&build.graph, &doc.settings.synth_options()).unwrap();
    assert_eq!(report.sinks[0].expression, "A | B");
    let csv = truth_table_csv(&report, &doc.settings.synth_options()).unwrap();
    assert_eq!(csv, "A,B,OR\n0,0,0\n0,1,1\n1,0,1\n1,1,1\n");
}

#[test]
fn detected_demo() {
    let doc = load_circuit(&demo("detected_xor.yaml")).unwrap();
    let build = build_from_doc(&doc);
    assert_eq!(build.report.skipped_detections, 2);
    assert_eq!(build.report.edges_added, 2);
    assert!(build.components.contains_key("xor_0"));

    let report = analyze(&build.graph, &doc.settings.synth_options()).unwrap();
    assert_eq!(report.sinks[0].expression, "A ^ B");
    let rules: Vec<&str> = report.sinks[0]
        .transformations
        .iter()
        .map(|r| r.rule)
        .collect();
    assert!(rules.contains(&"XOR expansion"));
}
