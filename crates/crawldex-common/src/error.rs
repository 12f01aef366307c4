//! Error types for crawldex

use thiserror::Error;

/// Result type alias for crawldex operations
pub type Result<T> = std::result::Result<T, CrawldexError>;

/// Main error type for crawldex
///
/// Decode failures (`Io`, `Json`) and normalizer contract violations
/// (`MissingField`, `TypeConversion`) are fatal and abort an ingestion run.
/// A bulk call that is accepted only partially is not represented here: the
/// pipeline reports it by returning a short success count instead.
#[derive(Error, Debug)]
pub enum CrawldexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field '{0}'")]
    MissingField(String),

    #[error("Cannot convert field '{field}': {value}")]
    TypeConversion { field: String, value: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CrawldexError {
    /// Create a missing-field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create a type-conversion error
    pub fn type_conversion(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TypeConversion {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
