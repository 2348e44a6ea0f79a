//! Error types for mapping operations.
//!
//! Only data-integrity problems in the input schemas abort a mapping run.
//! Unrecognized types, weak names and unmatched fields are ordinary outcomes
//! that surface as notes on the mapping result, never as errors.

use thiserror::Error;

use crate::validation::ValidationError;

/// Main error type for mapsheet operations.
#[derive(Debug, Error)]
pub enum MapsheetError {
    /// Input schema violates a structural invariant; no partial result exists
    #[error("Data integrity violation: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Input document failed schema validation
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Structural problems in a schema handed to the engine.
///
/// Raised before any matching happens; the engine never drops or merges
/// fields to work around them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityError {
    /// The schema has no fields at all
    #[error("schema '{schema}' has no fields")]
    EmptySchema { schema: String },

    /// Two fields share a name when compared case-insensitively
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },
}

/// Convenience type alias for Results with MapsheetError
pub type Result<T> = std::result::Result<T, MapsheetError>;

impl MapsheetError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Returns true when the error comes from invalid schema input rather
    /// than from the environment.
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, Self::DataIntegrity(_))
    }
}
