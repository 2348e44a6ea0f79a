//! Core data models for schema mapping.
//!
//! This module defines the normalized schema shape consumed from connector
//! collaborators and the mapping result produced by the engine. All models
//! are serializable; results contain no timestamps or random identifiers so
//! that identical inputs serialize to identical bytes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::DataIntegrityError;

/// Current schema document format version
pub const FORMAT_VERSION: &str = "1.0";

/// Supported metadata dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Salesforce,
    Mssql,
    Mysql,
    Redshift,
}

impl Dialect {
    /// Every supported dialect, in display order.
    pub const ALL: [Dialect; 4] = [
        Dialect::Salesforce,
        Dialect::Mssql,
        Dialect::Mysql,
        Dialect::Redshift,
    ];

    /// Lowercase tag used in documents and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Salesforce => "salesforce",
            Dialect::Mssql => "mssql",
            Dialect::Mysql => "mysql",
            Dialect::Redshift => "redshift",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Salesforce => write!(f, "Salesforce"),
            Dialect::Mssql => write!(f, "SQL Server"),
            Dialect::Mysql => write!(f, "MySQL"),
            Dialect::Redshift => write!(f, "Redshift"),
        }
    }
}

/// Error returned when a dialect tag is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect '{0}' (expected one of: salesforce, mssql, mysql, redshift)")]
pub struct ParseDialectError(pub String);

impl std::str::FromStr for Dialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "salesforce" | "sfdc" => Ok(Dialect::Salesforce),
            "mssql" | "sqlserver" | "sql server" => Ok(Dialect::Mssql),
            "mysql" => Ok(Dialect::Mysql),
            "redshift" => Ok(Dialect::Redshift),
            _ => Err(ParseDialectError(s.to_string())),
        }
    }
}

/// Dialect-independent classification of a native column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalType {
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    Datetime,
    Binary,
    Identifier,
    Unknown,
}

impl std::fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CanonicalType::Text => "text",
            CanonicalType::Integer => "integer",
            CanonicalType::Decimal => "decimal",
            CanonicalType::Boolean => "boolean",
            CanonicalType::Date => "date",
            CanonicalType::Datetime => "datetime",
            CanonicalType::Binary => "binary",
            CanonicalType::Identifier => "identifier",
            CanonicalType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

fn default_nullable() -> bool {
    true
}

/// One column/field of a schema, as normalized by a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Type as the source system reports it, e.g. `nvarchar(255)`
    pub native_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Declared character length; overrides a parsed parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Primary key or record id
    #[serde(default)]
    pub is_identifier: bool,
}

impl FieldDescriptor {
    /// Creates a nullable, non-identifier field with no declared sizes.
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            nullable: true,
            length: None,
            precision: None,
            scale: None,
            is_identifier: false,
        }
    }

    /// Sets nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the declared length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the declared precision and scale.
    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Marks the field as an identifier.
    pub fn with_identifier(mut self, is_identifier: bool) -> Self {
        self.is_identifier = is_identifier;
        self
    }
}

/// Ordered field list of one object/table in a given dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub dialect: Dialect,
    pub qualified_name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDescriptor {
    /// Creates a schema descriptor from fields in connector order.
    pub fn new(
        dialect: Dialect,
        qualified_name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            dialect,
            qualified_name: qualified_name.into(),
            fields,
        }
    }

    /// Looks up a field by name, ignoring case.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        let wanted = name.to_lowercase();
        self.fields.iter().find(|f| f.name.to_lowercase() == wanted)
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Checks the structural invariants the engine relies on: at least one
    /// field, and field names unique under case-insensitive comparison.
    pub fn check_integrity(&self) -> Result<(), DataIntegrityError> {
        if self.fields.is_empty() {
            return Err(DataIntegrityError::EmptySchema {
                schema: self.qualified_name.clone(),
            });
        }

        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.to_lowercase()) {
                return Err(DataIntegrityError::DuplicateField {
                    schema: self.qualified_name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Versioned on-disk representation of a [`SchemaDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub format_version: String,
    #[serde(flatten)]
    pub schema: SchemaDescriptor,
}

impl SchemaDocument {
    /// Wraps a descriptor with the current format version.
    pub fn new(schema: SchemaDescriptor) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            schema,
        }
    }
}

/// Type-compatibility verdict for one accepted field pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCompatibility {
    Exact,
    Compatible,
    Lossy,
    Incompatible,
}

impl std::fmt::Display for TypeCompatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeCompatibility::Exact => "exact",
            TypeCompatibility::Compatible => "compatible",
            TypeCompatibility::Lossy => "lossy",
            TypeCompatibility::Incompatible => "incompatible",
        };
        f.write_str(name)
    }
}

/// Mapping outcome for a single source field.
///
/// Unmatched source fields keep `target_field` and `type_compatibility`
/// empty and carry a zero confidence; `name_score` still records the best
/// similarity that was seen so reviewers can tell near misses apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub source_field: String,
    pub target_field: Option<String>,
    pub name_score: f64,
    pub type_compatibility: Option<TypeCompatibility>,
    pub confidence: f64,
    pub notes: Vec<String>,
}

impl FieldMapping {
    /// Creates an unmatched mapping for a source field.
    pub fn unmatched(source_field: impl Into<String>, name_score: f64, note: String) -> Self {
        Self {
            source_field: source_field.into(),
            target_field: None,
            name_score,
            type_compatibility: None,
            confidence: 0.0,
            notes: vec![note],
        }
    }

    /// Returns true when a target field was accepted for this source field.
    pub fn is_matched(&self) -> bool {
        self.target_field.is_some()
    }
}

/// Counts per compatibility bucket plus unmatched fields on both sides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub exact: usize,
    pub compatible: usize,
    pub lossy: usize,
    pub incompatible: usize,
    pub unmatched_source: usize,
    pub unmatched_target: usize,
}

impl MappingSummary {
    /// Tallies one accepted pairing.
    pub fn record(&mut self, compatibility: TypeCompatibility) {
        let bucket = match compatibility {
            TypeCompatibility::Exact => &mut self.exact,
            TypeCompatibility::Compatible => &mut self.compatible,
            TypeCompatibility::Lossy => &mut self.lossy,
            TypeCompatibility::Incompatible => &mut self.incompatible,
        };
        *bucket += 1;
    }

    /// Number of accepted pairings across all buckets.
    pub fn matched(&self) -> usize {
        self.exact + self.compatible + self.lossy + self.incompatible
    }
}

/// Complete outcome of one mapping request.
///
/// Built once by the engine and handed to the report assembler; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    /// One entry per source field, in source order
    pub mappings: Vec<FieldMapping>,
    /// Target fields no source field claimed, in target order
    pub unmatched_targets: Vec<String>,
    pub summary: MappingSummary,
    /// Unrecognized native types seen during the run, first-seen order
    pub warnings: Vec<String>,
}

impl MappingResult {
    /// Looks up the mapping for a source field, ignoring case.
    pub fn mapping_for(&self, source_field: &str) -> Option<&FieldMapping> {
        let wanted = source_field.to_lowercase();
        self.mappings
            .iter()
            .find(|m| m.source_field.to_lowercase() == wanted)
    }

    /// Accepted pairings only, in source order.
    pub fn matched(&self) -> impl Iterator<Item = &FieldMapping> {
        self.mappings.iter().filter(|m| m.is_matched())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            Dialect::Mssql,
            "crm.dbo.Contact",
            vec![
                FieldDescriptor::new("ContactID", "int").with_identifier(true),
                FieldDescriptor::new("Email", "nvarchar(255)"),
            ],
        )
    }

    #[test]
    fn test_dialect_display_and_parse() {
        assert_eq!(Dialect::Mssql.to_string(), "SQL Server");
        assert_eq!(Dialect::Redshift.as_str(), "redshift");
        assert_eq!("MySQL".parse::<Dialect>(), Ok(Dialect::Mysql));
        assert_eq!(" salesforce ".parse::<Dialect>(), Ok(Dialect::Salesforce));
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_field_lookup_is_case_insensitive() {
        let schema = contact_schema();
        assert_eq!(
            schema.field("contactid").map(|f| f.name.as_str()),
            Some("ContactID")
        );
        assert!(schema.field("Phone").is_none());
        assert_eq!(schema.field_names(), vec!["ContactID", "Email"]);
    }

    #[test]
    fn test_integrity_rejects_case_insensitive_duplicates() {
        let mut schema = contact_schema();
        schema.fields.push(FieldDescriptor::new("EMAIL", "varchar(100)"));

        assert_eq!(
            schema.check_integrity(),
            Err(DataIntegrityError::DuplicateField {
                schema: "crm.dbo.Contact".to_string(),
                field: "EMAIL".to_string(),
            })
        );
    }

    #[test]
    fn test_integrity_rejects_empty_schema() {
        let schema = SchemaDescriptor::new(Dialect::Salesforce, "Account", Vec::new());
        assert!(matches!(
            schema.check_integrity(),
            Err(DataIntegrityError::EmptySchema { .. })
        ));
        assert!(contact_schema().check_integrity().is_ok());
    }

    #[test]
    fn test_field_defaults_when_deserializing() {
        let field: FieldDescriptor =
            serde_json::from_str(r#"{"name": "Id", "native_type": "id"}"#).unwrap();
        assert!(field.nullable);
        assert!(!field.is_identifier);
        assert_eq!(field.length, None);
    }

    #[test]
    fn test_schema_document_flattens_descriptor() {
        let document = SchemaDocument::new(contact_schema());
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["format_version"], "1.0");
        assert_eq!(json["dialect"], "mssql");
        assert_eq!(json["fields"][1]["native_type"], "nvarchar(255)");

        let parsed: SchemaDocument = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_summary_record_and_matched() {
        let mut summary = MappingSummary::default();
        summary.record(TypeCompatibility::Exact);
        summary.record(TypeCompatibility::Lossy);
        summary.record(TypeCompatibility::Exact);
        summary.unmatched_source = 2;

        assert_eq!(summary.exact, 2);
        assert_eq!(summary.lossy, 1);
        assert_eq!(summary.matched(), 3);
    }
}
