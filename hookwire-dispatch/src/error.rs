//! Error types for handler loading and execution

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Failure raised by a handler while processing an event
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum HandlerError {
    /// The handler reported a failure
    #[error("Handler failed: {0}")]
    Failed(String),

    /// An external command exited unsuccessfully
    #[error("Command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    /// An external command could not be run
    #[error("IO error: {0}")]
    Io(String),

    /// The handler panicked
    #[error("Handler panicked: {0}")]
    Panicked(String),

    /// The handler exceeded its time limit
    #[error("Handler timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    /// Dispatch was cancelled while the handler ran
    #[error("Handler cancelled")]
    Cancelled,
}

impl HandlerError {
    /// Create a generic failure
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        HandlerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::Failed(err.to_string())
    }
}

/// A handler failure recorded in a dispatch report
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("Handler '{handler}' failed: {cause}")]
pub struct HandlerExecutionError {
    /// Name of the failing handler
    pub handler: String,

    /// What the handler raised
    pub cause: HandlerError,
}

/// A handler definition that could not be loaded
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to load handler from {origin}: {reason}")]
pub struct HandlerLoadError {
    /// File path or factory name the definition came from
    pub origin: String,

    /// What went wrong
    pub reason: String,
}

impl HandlerLoadError {
    pub fn new(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}
