//! CLI error types

use thiserror::Error;
use tocc_primitives::{NotationError, PrimitiveError};

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed operation given on the command line
    #[error("Invalid operation: {0}")]
    Primitive(#[from] PrimitiveError),

    /// Scenario whose operations do not parse
    #[error("Invalid scenario '{name}': {source}")]
    Scenario {
        /// Scenario name
        name: String,
        /// Parse failure
        source: NotationError,
    },

    /// No scenario with this name
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// Two scenarios share a name
    #[error("Duplicate scenario name: {0}")]
    DuplicateScenario(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

impl From<NotationError> for CliError {
    fn from(e: NotationError) -> Self {
        CliError::Primitive(e.into())
    }
}
