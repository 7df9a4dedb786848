//! Error types for event parsing and fixture loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors that reject an inbound payload before dispatch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// No schema is registered for the tag, or the tag name is not known
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    /// The payload is not a JSON object
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A field failed schema validation
    #[error("Schema violation on field '{field}': {reason}")]
    SchemaViolation { field: String, reason: String },
}

impl ParseError {
    /// Name of the offending field for schema violations
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::SchemaViolation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub(crate) fn violation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::MalformedPayload(err.to_string())
    }
}

/// A fixture file that could not be loaded
#[derive(Error, Debug, Clone)]
#[error("Failed to load fixture {}: {reason}", path.display())]
pub struct FixtureLoadError {
    /// File (or directory) that failed
    pub path: PathBuf,

    /// Filename stem, which would have been the tag
    pub stem: String,

    /// What went wrong
    pub reason: String,
}

impl FixtureLoadError {
    pub(crate) fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        let path = path.into();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            stem,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
