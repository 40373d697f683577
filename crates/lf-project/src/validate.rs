//! Document validation logic.

use lf_graph::GateKind;

use crate::schema::{CircuitDoc, ComponentKindDef, LATEST_VERSION, SettingsDef};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Check the version, settings, declared gate labels and input values.
///
/// Placement problems (missing or malformed boxes, short strokes, repeated
/// component ids, connections to unknown ids) are not rejected here; the
/// builder drops them and counts them in its report.
pub fn validate_doc(doc: &CircuitDoc) -> Result<(), ValidationError> {
    if doc.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: doc.version,
        });
    }
    validate_settings(&doc.settings)?;

    for component in &doc.components {
        if component.kind == Some(ComponentKindDef::Gate)
            && component.label.parse::<GateKind>().is_err()
        {
            return Err(invalid(
                &format!("components.{}.label", component.id),
                &component.label,
                "not a gate type",
            ));
        }
    }

    for (key, value) in &doc.inputs {
        if *value > 1 {
            return Err(invalid(&format!("inputs.{key}"), value, "must be 0 or 1"));
        }
    }

    Ok(())
}

pub fn validate_settings(settings: &SettingsDef) -> Result<(), ValidationError> {
    if !settings.tolerance.is_finite() || settings.tolerance < 0.0 {
        return Err(invalid(
            "settings.tolerance",
            settings.tolerance,
            "must be finite and non-negative",
        ));
    }
    if !(0.0..=1.0).contains(&settings.min_confidence) {
        return Err(invalid(
            "settings.min_confidence",
            settings.min_confidence,
            "must be within [0, 1]",
        ));
    }
    if settings.max_variables == 0 || settings.max_variables > 30 {
        return Err(invalid(
            "settings.max_variables",
            settings.max_variables,
            "must be within 1..=30",
        ));
    }
    Ok(())
}
