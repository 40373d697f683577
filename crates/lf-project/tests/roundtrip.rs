use lf_project::schema::*;
use lf_project::{load, load_yaml, save, save_yaml, validate_doc};

fn two_input_doc() -> CircuitDoc {
    let mut doc = CircuitDoc::new("Two inputs");
    let mut gate = ComponentDef::new("g", "NOT", 100.0, 0.0, 40.0, 40.0);
    gate.kind = Some(ComponentKindDef::Gate);
    doc.components = vec![ComponentDef::new("a", "A", 0.0, 0.0, 40.0, 40.0), gate];
    doc.wires = vec![WireDef {
        points: vec![vec![40.0, 20.0], vec![100.0, 20.0]],
    }];
    doc.settings.unset_inputs = UnsetInputsDef::Unresolved;
    doc.inputs.insert("A".to_string(), 1);
    doc
}

#[test]
fn roundtrip_yaml_empty_doc() {
    let doc = CircuitDoc::new("Empty");
    validate_doc(&doc).unwrap();

    let path = std::env::temp_dir().join("lf_project_roundtrip_empty.yaml");
    save_yaml(&path, &doc).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(doc, loaded);
}

#[test]
fn roundtrip_by_extension() {
    let doc = two_input_doc();
    for name in ["lf_project_roundtrip.yaml", "lf_project_roundtrip.json"] {
        let path = std::env::temp_dir().join(name);
        save(&path, &doc).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(doc, loaded, "{name}");
    }
}

#[test]
fn unknown_extension_is_rejected() {
    let path = std::env::temp_dir().join("lf_project_roundtrip.txt");
    assert!(matches!(
        save(&path, &CircuitDoc::new("x")),
        Err(lf_project::ProjectError::UnknownFormat { .. })
    ));
}

#[test]
fn settings_default_when_omitted() {
    let doc = lf_project::parse_yaml("version: 1\nname: bare\nsettings:\n  tolerance: 4\n").unwrap();
    assert_eq!(doc.settings.tolerance, 4.0);
    assert_eq!(doc.settings.max_variables, 16);
    assert_eq!(doc.settings.tie_break, TieBreakDef::SmallestArea);
    assert_eq!(doc.settings.unset_inputs, UnsetInputsDef::Low);
    assert!(doc.connections.is_none());
}
