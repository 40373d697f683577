//! lf-project: circuit document format, loading and validation.

pub mod convert;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use convert::BuildMode;
pub use schema::*;
pub use validate::{ValidationError, validate_doc, validate_settings};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported document format: {path}")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<CircuitDoc> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml(&content)
}

pub fn parse_yaml(content: &str) -> ProjectResult<CircuitDoc> {
    let doc: CircuitDoc = serde_yaml::from_str(content)?;
    validate_doc(&doc)?;
    Ok(doc)
}

pub fn save_yaml(path: &Path, doc: &CircuitDoc) -> ProjectResult<()> {
    validate_doc(doc)?;
    let content = serde_yaml::to_string(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<CircuitDoc> {
    let content = std::fs::read_to_string(path)?;
    parse_json(&content)
}

pub fn parse_json(content: &str) -> ProjectResult<CircuitDoc> {
    let doc: CircuitDoc = serde_json::from_str(content)?;
    validate_doc(&doc)?;
    Ok(doc)
}

pub fn save_json(path: &Path, doc: &CircuitDoc) -> ProjectResult<()> {
    validate_doc(doc)?;
    let content = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> ProjectResult<Format> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(ProjectError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Load a document, choosing the format by file extension.
pub fn load(path: &Path) -> ProjectResult<CircuitDoc> {
    let doc = match format_of(path)? {
        Format::Yaml => load_yaml(path)?,
        Format::Json => load_json(path)?,
    };
    tracing::debug!(path = %path.display(), name = %doc.name, "loaded circuit document");
    Ok(doc)
}

/// Save a document, choosing the format by file extension.
pub fn save(path: &Path, doc: &CircuitDoc) -> ProjectResult<()> {
    match format_of(path)? {
        Format::Yaml => save_yaml(path, doc),
        Format::Json => save_json(path, doc),
    }
}
