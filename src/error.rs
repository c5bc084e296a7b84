//! Error types for the planner.
//!
//! Storage decode failures are normally absorbed by the record store (an
//! unreadable collection reads as empty), so `Decode` only surfaces when a
//! caller explicitly asks for strict loading.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for planner operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// No record with the given id exists in the collection.
    #[error("{collection} not found: {id}")]
    NotFound {
        /// Collection that was searched.
        collection: &'static str,
        /// The id that did not match.
        id: String,
    },

    /// A submitted date or numeric field could not be parsed.
    #[error("invalid {field} '{value}': {reason}")]
    Format {
        /// Name of the offending field.
        field: String,
        /// The raw value as submitted.
        value: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A backing document exists but does not decode.
    #[error("{collection} is unreadable: {reason}")]
    Decode {
        /// Collection whose document failed to decode.
        collection: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// File system operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    Config(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

/// A specialized Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

impl From<figment::Error> for PlannerError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl PlannerError {
    /// Create a not-found error for a collection.
    #[must_use]
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Create a format error for a submitted field.
    #[must_use]
    pub fn format(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Format {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error means the addressed record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a rejected input value.
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
