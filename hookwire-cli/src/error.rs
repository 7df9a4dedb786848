//! Error types for the Hookwire CLI.

use hookwire_config::ConfigError;
use hookwire_events::ParseError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// IO error (stdin, payload files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A payload was rejected by the parser
    #[error("Payload rejected: {0}")]
    Parse(#[from] ParseError),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Fixture or schema checks failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// One or more handlers failed
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Report could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
