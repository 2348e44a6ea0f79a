//! JSON Schema validation for schema documents.
//!
//! A schema document is the on-disk form of a [`SchemaDescriptor`] as
//! produced by a connector or written by hand. Validation checks the format
//! version and the document structure before typed deserialization, so that
//! malformed input is reported field by field instead of as a single serde
//! error.
//!
//! Emptiness and duplicate field names are deliberately not checked here;
//! the mapping engine reports those as data-integrity errors.
//!
//! # Example
//! ```rust
//! use mapsheet_core::validation::validate_and_parse_schema;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = validate_and_parse_schema(r#"{
//!     "format_version": "1.0",
//!     "dialect": "mssql",
//!     "qualified_name": "crm.dbo.Contact",
//!     "fields": [
//!         { "name": "ContactID", "native_type": "int", "nullable": false, "is_identifier": true },
//!         { "name": "Email", "native_type": "nvarchar", "length": 255 }
//!     ]
//! }"#)?;
//!
//! assert_eq!(schema.fields.len(), 2);
//! # Ok(())
//! # }
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::{SchemaDescriptor, SchemaDocument};

/// JSON Schema validation errors with field-level reporting
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation { message: String },

    /// Validation failed with specific field errors
    #[error("Schema document validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<String>,
    },

    /// Unsupported format version detected
    #[error("Unsupported format version '{version}'. Supported versions: {supported:?}")]
    UnsupportedVersion {
        version: String,
        supported: Vec<String>,
    },

    /// JSON parsing error
    #[error("JSON parsing failed: {source}")]
    JsonParsing {
        #[from]
        source: serde_json::Error,
    },
}

/// Supported format versions
const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Embedded JSON Schema for v1.0 schema documents
const SCHEMA_V1_0: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Mapsheet Schema Document v1.0",
  "type": "object",
  "required": ["format_version", "dialect", "qualified_name", "fields"],
  "properties": {
    "format_version": {
      "type": "string",
      "pattern": "^1\\.0$"
    },
    "dialect": { "enum": ["salesforce", "mssql", "mysql", "redshift"] },
    "qualified_name": { "type": "string", "minLength": 1 },
    "fields": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["name", "native_type"],
        "additionalProperties": false,
        "properties": {
          "name": { "type": "string", "minLength": 1 },
          "native_type": { "type": "string" },
          "nullable": { "type": "boolean", "default": true },
          "length": { "type": ["integer", "null"], "minimum": 0 },
          "precision": { "type": ["integer", "null"], "minimum": 0 },
          "scale": { "type": ["integer", "null"], "minimum": 0 },
          "is_identifier": { "type": "boolean", "default": false }
        }
      }
    }
  }
}"#;

/// Compiled JSON Schema instance (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Initialize and compile the JSON Schema for validation
///
/// Safe to call more than once; later calls keep the first compiled schema.
///
/// # Errors
/// Returns `ValidationError::SchemaCompilation` if the embedded schema is invalid.
pub fn initialize_schema_validator() -> Result<(), ValidationError> {
    let schema_json: Value =
        serde_json::from_str(SCHEMA_V1_0).map_err(|e| ValidationError::SchemaCompilation {
            message: format!("Failed to parse embedded schema: {}", e),
        })?;

    let compiled = jsonschema::validator_for(&schema_json).map_err(|e| {
        ValidationError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        }
    })?;

    let _ = COMPILED_SCHEMA.set(compiled);

    Ok(())
}

fn validator() -> Result<&'static Validator, ValidationError> {
    if COMPILED_SCHEMA.get().is_none() {
        initialize_schema_validator()?;
    }
    COMPILED_SCHEMA
        .get()
        .ok_or_else(|| ValidationError::SchemaCompilation {
            message: "Schema validator not initialized".to_string(),
        })
}

/// Validate a schema document against the embedded JSON Schema
///
/// Checks the format version first so that documents from a newer format
/// get a version error rather than a list of structural complaints.
///
/// # Errors
/// Returns every structural violation found, each prefixed with the JSON
/// pointer of the offending value.
pub fn validate_schema_document(json_value: &Value) -> Result<(), ValidationError> {
    let schema = validator()?;

    validate_format_version(json_value)?;

    let errors: Vec<String> = schema
        .iter_errors(json_value)
        .map(|error| format!("{}: {}", error.instance_path(), error))
        .collect();

    if !errors.is_empty() {
        return Err(ValidationError::ValidationFailed {
            error_count: errors.len(),
            errors,
        });
    }

    Ok(())
}

/// Ensures the format_version field is present and supported.
fn validate_format_version(json_value: &Value) -> Result<(), ValidationError> {
    let version = json_value
        .get("format_version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ValidationError::ValidationFailed {
            error_count: 1,
            errors: vec!["Missing required field 'format_version'".to_string()],
        })?;

    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(ValidationError::UnsupportedVersion {
            version: version.to_string(),
            supported: SUPPORTED_VERSIONS.iter().map(|s| s.to_string()).collect(),
        });
    }

    Ok(())
}

/// Validate and load a schema document from JSON text
///
/// Combines JSON parsing, schema validation and deserialization.
///
/// # Errors
/// Returns validation errors for malformed JSON or schema violations.
pub fn validate_and_parse_schema(json_str: &str) -> Result<SchemaDescriptor, ValidationError> {
    let json_value: Value = serde_json::from_str(json_str)?;
    validate_and_parse_value(json_value)
}

/// Same as [`validate_and_parse_schema`] for an already parsed value.
pub fn validate_and_parse_value(json_value: Value) -> Result<SchemaDescriptor, ValidationError> {
    validate_schema_document(&json_value)?;

    let document: SchemaDocument = serde_json::from_value(json_value)?;

    Ok(document.schema)
}

/// Get the embedded JSON Schema as a parsed Value for external use
pub fn get_schema_definition() -> Result<Value, ValidationError> {
    serde_json::from_str(SCHEMA_V1_0).map_err(|e| ValidationError::SchemaCompilation {
        message: format!("Failed to parse embedded schema: {}", e),
    })
}
