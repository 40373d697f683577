//! Conversion from document definitions to builder inputs.

use lf_core::{BoundingBox, Point};
use lf_graph::{
    BuildOptions, Connection, Detection, GateKind, NodeKind, PlacedComponent, Stroke, TieBreak,
};
use lf_sim::{SimOptions, UnsetInputPolicy};
use lf_synth::SynthOptions;
use tracing::debug;

use crate::schema::{
    CanvasObjectDef, CircuitDoc, ComponentDef, ComponentKindDef, PathSegmentDef, PathTokenDef,
    SettingsDef, TieBreakDef, UnsetInputsDef, WireDef,
};

/// How a document's wires are turned into edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Strokes hit-tested against component boxes.
    Geometric,
    /// Explicit connections between component ids.
    Declarative,
    /// No wiring data at all: components are chained in order.
    Chain,
}

impl SettingsDef {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            tolerance: self.tolerance,
            tie_break: match self.tie_break {
                TieBreakDef::SmallestArea => TieBreak::SmallestArea,
                TieBreakDef::FirstMatch => TieBreak::FirstMatch,
            },
            min_confidence: self.min_confidence,
        }
    }

    pub fn sim_options(&self) -> SimOptions {
        SimOptions {
            unset_inputs: match self.unset_inputs {
                UnsetInputsDef::Low => UnsetInputPolicy::Low,
                UnsetInputsDef::Unresolved => UnsetInputPolicy::Unresolved,
            },
        }
    }

    pub fn synth_options(&self) -> SynthOptions {
        SynthOptions {
            max_variables: self.max_variables,
        }
    }
}

/// Box from optional fields. A missing field reads as NaN, so the builder
/// drops the component and counts it as malformed.
fn document_box(
    left: Option<f64>,
    top: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
) -> BoundingBox {
    let field = |v: Option<f64>| v.unwrap_or(f64::NAN);
    BoundingBox::new(field(left), field(top), field(width), field(height))
}

impl From<&ComponentDef> for PlacedComponent {
    fn from(def: &ComponentDef) -> Self {
        let bbox = document_box(def.left, def.top, def.width, def.height);
        let component = PlacedComponent::new(def.id.clone(), def.label.clone(), bbox);
        match def.kind {
            Some(ComponentKindDef::Input) => component.with_kind(NodeKind::Input),
            // validation guarantees the label names a gate
            Some(ComponentKindDef::Gate) | None => component,
        }
    }
}

impl From<&WireDef> for Stroke {
    fn from(def: &WireDef) -> Self {
        let points = def
            .points
            .iter()
            .map(|coords| match coords.as_slice() {
                [x, y, ..] => Some(Point::new(*x, *y)),
                _ => None,
            })
            .collect::<Option<Vec<_>>>();
        match points {
            Some(points) => Stroke::new(points),
            None => {
                debug!(points = def.points.len(), "wire has a short point");
                Stroke::default()
            }
        }
    }
}

/// The point a path segment ends on: its first two numbers.
fn segment_point(segment: &PathSegmentDef) -> Option<Point> {
    let mut numbers = segment.iter().filter_map(|token| match token {
        PathTokenDef::Number(n) => Some(*n),
        PathTokenDef::Command(_) => None,
    });
    Some(Point::new(numbers.next()?, numbers.next()?))
}

/// Stroke of a canvas path. Any short segment makes the whole stroke
/// malformed, which the builder then drops.
fn path_stroke(path: &[PathSegmentDef]) -> Stroke {
    match path.iter().map(segment_point).collect::<Option<Vec<_>>>() {
        Some(points) => Stroke::new(points),
        None => {
            debug!(segments = path.len(), "canvas path has a short segment");
            Stroke::default()
        }
    }
}

impl CircuitDoc {
    /// Declarative when connections are given, else geometric when anything
    /// is drawn, else a chain.
    pub fn build_mode(&self) -> BuildMode {
        let drawn = !self.wires.is_empty()
            || self.canvas.as_ref().is_some_and(|c| {
                c.objects.iter().any(|o| {
                    matches!(o, CanvasObjectDef::Line { .. } | CanvasObjectDef::Path { .. })
                })
            });
        match (&self.connections, drawn) {
            (Some(_), _) => BuildMode::Declarative,
            (None, true) => BuildMode::Geometric,
            (None, false) => BuildMode::Chain,
        }
    }

    pub fn detections(&self) -> Vec<Detection> {
        self.detections
            .iter()
            .map(|d| Detection {
                class: d.class.clone(),
                x: d.x.unwrap_or(f64::NAN),
                y: d.y.unwrap_or(f64::NAN),
                width: d.width.unwrap_or(f64::NAN),
                height: d.height.unwrap_or(f64::NAN),
                confidence: d.confidence,
            })
            .collect()
    }

    /// Explicit components followed by canvas images, in document order.
    /// Images without a `gate_id` are named `gate_<n>` by image ordinal.
    pub fn placed_components(&self) -> Vec<PlacedComponent> {
        let mut out: Vec<PlacedComponent> = self.components.iter().map(Into::into).collect();
        let images = self.canvas.iter().flat_map(|c| &c.objects).filter_map(|o| match o {
            CanvasObjectDef::Image {
                left,
                top,
                width,
                height,
                label,
                gate_id,
            } => Some((document_box(*left, *top, *width, *height), label, gate_id)),
            _ => None,
        });
        for (n, (bbox, label, gate_id)) in images.enumerate() {
            let id = gate_id.clone().unwrap_or_else(|| format!("gate_{n}"));
            // canvas labels come lowercase from the recognizer
            let label = match label.parse::<GateKind>() {
                Ok(kind) => kind.name().to_string(),
                Err(_) => label.clone(),
            };
            out.push(PlacedComponent::new(id, label, bbox));
        }
        out
    }

    /// Free-hand wires followed by canvas lines and paths.
    pub fn strokes(&self) -> Vec<Stroke> {
        let mut out: Vec<Stroke> = self.wires.iter().map(Into::into).collect();
        for object in self.canvas.iter().flat_map(|c| &c.objects) {
            if let CanvasObjectDef::Line { path } | CanvasObjectDef::Path { path } = object {
                out.push(path_stroke(path));
            }
        }
        out
    }

    pub fn connection_list(&self) -> Option<Vec<Connection>> {
        self.connections.as_ref().map(|list| {
            list.iter()
                .map(|c| Connection::new(c.from.clone(), c.to.clone()))
                .collect()
        })
    }
}
