//! Core mapping engine for mapsheet.
//!
//! Given a source and a target schema, possibly from different metadata
//! dialects (Salesforce, SQL Server, MySQL, Redshift), this crate produces a
//! deterministic field-to-field mapping with type-compatibility verdicts,
//! confidence scores and a report ready for spreadsheet export.
//!
//! # Pipeline
//! - [`taxonomy`] classifies native types into canonical types
//! - [`compatibility`] judges a source/target type pairing
//! - [`matcher`] scores field names against candidate targets
//! - [`engine`] runs the greedy assignment over whole schemas
//! - [`report`] turns the result into rows and summary statistics
//!
//! The core is synchronous and performs no I/O; reading schema documents
//! and writing reports is left to callers.
//!
//! # Example
//! ```rust
//! use mapsheet_core::{Dialect, FieldDescriptor, SchemaDescriptor, assemble, generate};
//!
//! let source = SchemaDescriptor::new(
//!     Dialect::Salesforce,
//!     "Contact",
//!     vec![
//!         FieldDescriptor::new("Email", "email").with_length(80),
//!         FieldDescriptor::new("Birthdate", "date"),
//!     ],
//! );
//! let target = SchemaDescriptor::new(
//!     Dialect::Mssql,
//!     "crm.dbo.Contact",
//!     vec![
//!         FieldDescriptor::new("email", "nvarchar(255)"),
//!         FieldDescriptor::new("birth_date", "datetime2"),
//!     ],
//! );
//!
//! let result = generate(&source, &target)?;
//! let report = assemble(&result, &source, &target);
//! assert_eq!(report.summary.matched, 2);
//! # Ok::<(), mapsheet_core::MapsheetError>(())
//! ```

pub mod catalog;
pub mod compatibility;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod report;
pub mod taxonomy;
pub mod validation;

// Re-export commonly used types
pub use catalog::CatalogRow;
pub use config::{ConfigValidationError, EngineConfig, TypeWeights};
pub use engine::{MappingEngine, generate};
pub use error::{DataIntegrityError, MapsheetError, Result};
pub use logging::init_logging;
pub use models::{
    CanonicalType, Dialect, FieldDescriptor, FieldMapping, MappingResult, MappingSummary,
    SchemaDescriptor, SchemaDocument, TypeCompatibility,
};
pub use report::{
    MappingRunRecord, MatchType, ReportDocument, ReportRow, ReportSummary, RunStatus, assemble,
};
pub use taxonomy::classify;

pub use validation::{
    ValidationError, initialize_schema_validator, validate_and_parse_schema,
    validate_schema_document,
};
