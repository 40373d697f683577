//! Circuit document schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

/// A circuit as stored on disk.
///
/// Placement data comes in three shapes that may be mixed: detector
/// output, explicit `components`, and a drawing-surface `canvas`. Wires
/// are either free-hand (`wires`, canvas lines) or declared by component
/// id (`connections`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircuitDoc {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub settings: SettingsDef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detections: Vec<DetectionDef>,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wires: Vec<WireDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ConnectionDef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<CanvasDef>,
    /// Input values by primary-input label or node id, as `0`/`1`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, u8>,
}

impl CircuitDoc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            settings: SettingsDef::default(),
            detections: Vec::new(),
            components: Vec::new(),
            wires: Vec::new(),
            connections: None,
            canvas: None,
            inputs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsDef {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub tie_break: TieBreakDef,
    #[serde(default)]
    pub min_confidence: f64,
    #[serde(default)]
    pub unset_inputs: UnsetInputsDef,
    #[serde(default = "default_max_variables")]
    pub max_variables: usize,
}

impl Default for SettingsDef {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            tie_break: TieBreakDef::default(),
            min_confidence: 0.0,
            unset_inputs: UnsetInputsDef::default(),
            max_variables: default_max_variables(),
        }
    }
}

fn default_tolerance() -> f64 {
    lf_core::DEFAULT_TOLERANCE
}

fn default_max_variables() -> usize {
    16
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakDef {
    #[default]
    SmallestArea,
    FirstMatch,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnsetInputsDef {
    #[default]
    Low,
    Unresolved,
}

/// Recognizer output; `x`/`y` is the box centre.
///
/// Box fields are optional so that an incomplete detection is dropped and
/// counted at build time instead of failing the whole document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionDef {
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub id: String,
    pub label: String,
    /// Overrides the kind inferred from the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ComponentKindDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl ComponentDef {
    /// A component with every box field present and its kind taken from the label.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: None,
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKindDef {
    Input,
    Gate,
}

/// A free-hand stroke as `[x, y]` points. A point with fewer than two
/// coordinates makes the stroke malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireDef {
    #[serde(default)]
    pub points: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionDef {
    pub from: String,
    pub to: String,
}

/// Drawing-surface export: a flat list of typed objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CanvasDef {
    #[serde(default)]
    pub objects: Vec<CanvasObjectDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasObjectDef {
    /// A placed gate or input glyph.
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        top: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
        #[serde(default)]
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gate_id: Option<String>,
    },
    Line {
        #[serde(default)]
        path: Vec<PathSegmentDef>,
    },
    Path {
        #[serde(default)]
        path: Vec<PathSegmentDef>,
    },
    /// Any other drawing object (text, rectangles, ...); ignored.
    #[serde(other)]
    Other,
}

/// One path segment, e.g. `["M", 10, 20]` or `["L", 30, 40]`.
pub type PathSegmentDef = Vec<PathTokenDef>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PathTokenDef {
    Number(f64),
    Command(String),
}
