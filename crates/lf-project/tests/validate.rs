use lf_project::schema::*;
use lf_project::{ValidationError, parse_yaml, validate_doc};

fn component(id: &str, label: &str) -> ComponentDef {
    ComponentDef::new(id, label, 0.0, 0.0, 10.0, 10.0)
}

#[test]
fn placement_problems_are_left_to_the_builder() {
    let src = r#"
version: 1
name: rough
components:
  - { id: a, label: A, left: 0, top: 0, width: 10, height: 10 }
  - { id: a, label: B, left: 50, top: 0, width: 10, height: 10 }
  - { id: g, label: NOT, left: 100, top: 0, width: 10 }
connections:
  - { from: a, to: missing }
"#;
    let doc = parse_yaml(src).unwrap();
    assert_eq!(doc.components.len(), 3);
    assert_eq!(doc.components[2].height, None);
}

#[test]
fn short_wire_points_still_load() {
    let src = "version: 1\nname: w\nwires:\n  - points: [[0, 0], [5]]\n";
    let doc = parse_yaml(src).unwrap();
    assert_eq!(doc.wires[0].points, vec![vec![0.0, 0.0], vec![5.0]]);
}

#[test]
fn detection_without_a_box_still_loads() {
    let mut doc = CircuitDoc::new("detected");
    doc.detections = vec![DetectionDef {
        class: "not".to_string(),
        x: Some(5.0),
        y: Some(5.0),
        width: None,
        height: None,
        confidence: 1.0,
    }];
    doc.components = vec![component("a", "A")];
    validate_doc(&doc).unwrap();
}

#[test]
fn bad_settings() {
    for (yaml, field) in [
        ("tolerance: -1", "settings.tolerance"),
        ("min_confidence: 1.5", "settings.min_confidence"),
        ("max_variables: 0", "settings.max_variables"),
    ] {
        let src = format!("version: 1\nname: s\nsettings:\n  {yaml}\n");
        match parse_yaml(&src) {
            Err(lf_project::ProjectError::Validation(ValidationError::InvalidValue {
                field: f,
                ..
            })) => assert_eq!(f, field),
            other => panic!("{yaml}: {other:?}"),
        }
    }
}

#[test]
fn non_binary_input_value() {
    let mut doc = CircuitDoc::new("inputs");
    doc.inputs.insert("A".to_string(), 2);
    assert!(matches!(
        validate_doc(&doc),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn declared_gate_must_name_a_gate() {
    let mut doc = CircuitDoc::new("kind");
    let mut c = component("x", "LATCH");
    c.kind = Some(ComponentKindDef::Gate);
    doc.components = vec![c];
    assert!(validate_doc(&doc).is_err());
}

#[test]
fn newer_version_rejected() {
    let mut doc = CircuitDoc::new("future");
    doc.version = LATEST_VERSION + 1;
    assert_eq!(
        validate_doc(&doc),
        Err(ValidationError::UnsupportedVersion {
            version: LATEST_VERSION + 1
        })
    );
}
