//! Integration tests for lf-graph.

use lf_core::{BoundingBox, Point};
use lf_graph::{
    BuildOptions, Connection, Detection, GateKind, Graph, GraphError, NodeKind, PlacedComponent,
    Stroke, build_from_detections, build_graph, build_graph_declarative, validate,
};
use proptest::prelude::*;

fn half_adder_parts() -> Vec<PlacedComponent> {
    vec![
        PlacedComponent::new("a", "A", BoundingBox::new(0.0, 0.0, 20.0, 20.0)),
        PlacedComponent::new("b", "B", BoundingBox::new(0.0, 100.0, 20.0, 20.0)),
        PlacedComponent::new("x", "XOR", BoundingBox::new(200.0, 0.0, 60.0, 40.0)),
        PlacedComponent::new("c", "AND", BoundingBox::new(200.0, 100.0, 60.0, 40.0)),
    ]
}

#[test]
fn strokes_resolve_to_wires() {
    let wires = vec![
        Stroke::line(Point::new(10.0, 10.0), Point::new(205.0, 10.0)),
        Stroke::line(Point::new(10.0, 110.0), Point::new(205.0, 30.0)),
        // endpoints slightly outside the boxes, within tolerance
        Stroke::new(vec![
            Point::new(25.0, 5.0),
            Point::new(120.0, 60.0),
            Point::new(190.0, 110.0),
        ]),
        Stroke::line(Point::new(-10.0, 125.0), Point::new(195.0, 145.0)),
    ];
    let (graph, report) = build_graph(&half_adder_parts(), &wires, &BuildOptions::default());

    assert_eq!(report.edges_added, 4);
    assert_eq!(report.dropped_wires(), 0);
    assert_eq!(graph.sinks().len(), 2);
    assert_eq!(graph.primary_inputs().len(), 2);
    validate(&graph).unwrap();

    let xor = graph
        .nodes()
        .find(|n| n.kind == NodeKind::Gate(GateKind::Xor))
        .unwrap();
    let labels: Vec<String> = graph
        .predecessors(xor.id)
        .into_iter()
        .map(|id| graph.node(id).unwrap().label.clone())
        .collect();
    assert_eq!(labels, vec!["A", "B"]);
}

#[test]
fn tolerance_edge_resolves_one_unit_further_does_not() {
    let parts = vec![
        PlacedComponent::new("a", "A", BoundingBox::new(0.0, 0.0, 20.0, 20.0)),
        PlacedComponent::new("n", "NOT", BoundingBox::new(100.0, 0.0, 40.0, 20.0)),
    ];
    // 15 units left of the NOT box
    let at_edge = Stroke::line(Point::new(10.0, 10.0), Point::new(85.0, 10.0));
    let (_, report) = build_graph(&parts, &[at_edge], &BuildOptions::default());
    assert_eq!(report.edges_added, 1);

    let beyond = Stroke::line(Point::new(10.0, 10.0), Point::new(84.0, 10.0));
    let (_, report) = build_graph(&parts, &[beyond], &BuildOptions::default());
    assert_eq!(report.edges_added, 0);
    assert_eq!(report.unresolved_endpoints, 1);
}

#[test]
fn stroke_missing_every_component_adds_nothing() {
    let stray = Stroke::line(Point::new(500.0, 500.0), Point::new(700.0, 700.0));
    let (graph, report) = build_graph(&half_adder_parts(), &[stray], &BuildOptions::default());

    assert!(graph.edges().is_empty());
    assert_eq!(graph.node_count(), 4);
    assert_eq!(report.unresolved_endpoints, 1);
}

#[test]
fn degenerate_strokes_are_dropped() {
    let wires = vec![
        Stroke::new(vec![Point::new(10.0, 10.0)]),
        Stroke::new(vec![]),
        // both ends in the same box
        Stroke::line(Point::new(205.0, 5.0), Point::new(250.0, 30.0)),
    ];
    let (graph, report) = build_graph(&half_adder_parts(), &wires, &BuildOptions::default());
    assert!(graph.edges().is_empty());
    assert_eq!(report.malformed_strokes, 2);
    assert_eq!(report.self_loops, 1);
}

#[test]
fn cycle_forming_stroke_is_rejected() {
    let parts = vec![
        PlacedComponent::new("o", "OR", BoundingBox::new(0.0, 0.0, 40.0, 40.0)),
        PlacedComponent::new("n", "NOT", BoundingBox::new(200.0, 0.0, 40.0, 40.0)),
    ];
    let wires = vec![
        Stroke::line(Point::new(20.0, 20.0), Point::new(220.0, 20.0)),
        Stroke::line(Point::new(220.0, 20.0), Point::new(20.0, 20.0)),
    ];
    let (graph, report) = build_graph(&parts, &wires, &BuildOptions::default());
    assert_eq!(report.edges_added, 1);
    assert_eq!(report.rejected_cycles, 1);
    validate(&graph).unwrap();
}

#[test]
fn explicit_connections_are_authoritative() {
    let parts = half_adder_parts();
    let connections = vec![
        Connection::new("a", "x"),
        Connection::new("b", "x"),
        Connection::new("a", "c"),
        Connection::new("b", "c"),
        Connection::new("a", "missing"),
    ];
    let (graph, report) =
        build_graph_declarative(&parts, Some(&connections), &BuildOptions::default());
    assert_eq!(report.edges_added, 4);
    assert_eq!(report.unresolved_endpoints, 1);
    assert_eq!(graph.sinks().len(), 2);
}

#[test]
fn detections_seed_gates_and_extra_inputs() {
    let detections = vec![Detection {
        class: "and".into(),
        x: 230.0,
        y: 20.0,
        width: 60.0,
        height: 40.0,
        confidence: 0.93,
    }];
    let inputs = vec![
        PlacedComponent::new("in_a", "A", BoundingBox::new(0.0, 0.0, 20.0, 20.0)),
        PlacedComponent::new("in_b", "B", BoundingBox::new(0.0, 60.0, 20.0, 20.0)),
    ];
    let wires = vec![
        Stroke::line(Point::new(10.0, 10.0), Point::new(200.0, 10.0)),
        Stroke::line(Point::new(10.0, 70.0), Point::new(200.0, 30.0)),
    ];
    let (graph, report) =
        build_from_detections(&detections, &inputs, &wires, &BuildOptions::default());
    assert_eq!(report.nodes_added, 3);
    assert_eq!(report.edges_added, 2);
    assert_eq!(graph.sinks().len(), 1);
}

#[test]
fn reverse_edge_fails_and_leaves_graph_unchanged() {
    let mut g = Graph::new();
    let a = g.add_gate(GateKind::And);
    let b = g.add_gate(GateKind::Or);
    g.connect(a, b).unwrap();
    let before: Vec<_> = g.edges().to_vec();

    let err = g.connect(b, a).unwrap_err();
    assert_eq!(err, GraphError::WouldCreateCycle { from: b, to: a });
    assert_eq!(g.edges(), before.as_slice());
}

proptest! {
    #[test]
    fn random_edits_keep_graph_acyclic(
        edits in prop::collection::vec((0usize..8, 0usize..8), 0..40)
    ) {
        let mut g = Graph::new();
        let ids: Vec<_> = (0..8)
            .map(|i| if i < 3 { g.add_input(format!("I{i}")) } else { g.add_gate(GateKind::Or) })
            .collect();

        for (from, to) in edits {
            let before = g.edges().len();
            match g.connect(ids[from], ids[to]) {
                Ok(()) => prop_assert_eq!(g.edges().len(), before + 1),
                Err(_) => prop_assert_eq!(g.edges().len(), before),
            }
        }
        prop_assert!(validate(&g).is_ok());
        prop_assert_eq!(g.topological_order().unwrap().len(), 8);
    }
}
