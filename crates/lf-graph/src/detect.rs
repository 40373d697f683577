//! Adapting gate-detector output into placed components.

use lf_core::{BoundingBox, Real};
use tracing::debug;

use crate::builder::{BuildOptions, BuildReport, GraphBuilder, PlacedComponent, Stroke};
use crate::gate::GateKind;
use crate::graph::{Graph, NodeKind};

/// One detection from the gate recognizer. `(x, y)` is the box centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub class: String,
    pub x: Real,
    pub y: Real,
    pub width: Real,
    pub height: Real,
    pub confidence: Real,
}

/// Convert detections to placed gate components.
///
/// Unknown classes and detections below `options.min_confidence` are
/// skipped; the second value is how many were. Ids follow
/// `<class>_<n>` where `n` counts accepted components.
pub fn components_from_detections(
    detections: &[Detection],
    options: &BuildOptions,
) -> (Vec<PlacedComponent>, usize) {
    let mut components = Vec::with_capacity(detections.len());
    let mut skipped = 0;

    for det in detections {
        if det.confidence < options.min_confidence {
            debug!(class = %det.class, confidence = det.confidence, "detection below threshold");
            skipped += 1;
            continue;
        }
        let Ok(kind) = det.class.parse::<GateKind>() else {
            debug!(class = %det.class, "no gate type for detection class");
            skipped += 1;
            continue;
        };
        let id = format!("{}_{}", det.class.trim().to_lowercase(), components.len());
        components.push(PlacedComponent {
            id,
            label: kind.name().to_string(),
            kind: NodeKind::Gate(kind),
            bbox: BoundingBox::from_center(det.x, det.y, det.width, det.height),
        });
    }

    (components, skipped)
}

/// Seed a graph from detections plus any extra placed components (e.g.
/// hand-placed inputs), then resolve the strokes.
pub fn build_from_detections(
    detections: &[Detection],
    extra: &[PlacedComponent],
    wires: &[Stroke],
    options: &BuildOptions,
) -> (Graph, BuildReport) {
    let (detected, skipped) = components_from_detections(detections, options);
    let mut builder = GraphBuilder::new(*options);
    builder.note_skipped_detections(skipped);
    for component in detected.iter().chain(extra) {
        builder.add_component(component);
    }
    for stroke in wires {
        builder.add_stroke(stroke);
    }
    builder.finish()
}
