//! Error types for Hermeneut
//!
//! These are the fatal errors: a payload that cannot be read at all, a broken
//! configuration. Problems with individual nodes or relations never surface
//! here; they become [`Diagnostic`](crate::domain::graph::Diagnostic)s and the
//! batch carries on.

use thiserror::Error;

/// Result type alias using Hermeneut's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Hermeneut error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (E001-E099)
    #[error("Invalid payload: {0}. Expected {{nodes, relations}} or a work_schema_metadata wrapper.")]
    InvalidPayload(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Ontology errors (E100-E199)
    #[error("Unknown event category '{0}'")]
    UnknownCategory(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "E001",
            Self::Json(_) => "E002",
            Self::InvalidInput(_) => "E003",
            Self::UnknownCategory(_) => "E100",
            Self::ConfigError(_) => "E600",
            Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidPayload(_) | Self::Json(_) => {
                Some("hermeneut check <input.json>".to_string())
            }
            Self::ConfigError(_) => Some("hermeneut config list".to_string()),
            _ => None,
        }
    }
}
