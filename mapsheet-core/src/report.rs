//! Report assembly and run-history records.
//!
//! A [`ReportDocument`] is the single handoff artifact for presentation
//! layers: spreadsheet writers, JSON previews and run-history storage all
//! read from it. Assembly is pure; this module performs no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Dialect, FieldDescriptor, MappingResult, SchemaDescriptor, TypeCompatibility,
};
use crate::taxonomy::NativeType;

/// Note carried by trailing rows for target fields nothing mapped onto
pub const NO_SOURCE_NOTE: &str = "no source mapped";

/// Row classification: the type verdict, or `unmatched`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Compatible,
    Lossy,
    Incompatible,
    Unmatched,
}

impl From<Option<TypeCompatibility>> for MatchType {
    fn from(compatibility: Option<TypeCompatibility>) -> Self {
        match compatibility {
            Some(TypeCompatibility::Exact) => MatchType::Exact,
            Some(TypeCompatibility::Compatible) => MatchType::Compatible,
            Some(TypeCompatibility::Lossy) => MatchType::Lossy,
            Some(TypeCompatibility::Incompatible) => MatchType::Incompatible,
            None => MatchType::Unmatched,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchType::Exact => "exact",
            MatchType::Compatible => "compatible",
            MatchType::Lossy => "lossy",
            MatchType::Incompatible => "incompatible",
            MatchType::Unmatched => "unmatched",
        };
        f.write_str(name)
    }
}

/// Identifies one side of the mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub qualified_name: String,
    pub dialect: Dialect,
}

impl From<&SchemaDescriptor> for ReportHeader {
    fn from(schema: &SchemaDescriptor) -> Self {
        Self {
            qualified_name: schema.qualified_name.clone(),
            dialect: schema.dialect,
        }
    }
}

/// One spreadsheet row. Blank strings mark the missing side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub source_field: String,
    pub source_type: String,
    pub source_length: Option<u32>,
    pub target_field: String,
    pub target_type: String,
    pub target_length: Option<u32>,
    pub match_type: MatchType,
    /// Rounded to two decimals
    pub confidence: f64,
    /// Notes joined with "; "
    pub notes: String,
}

/// Accepted pairings per type verdict
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByClassification {
    pub exact: usize,
    pub compatible: usize,
    pub lossy: usize,
    pub incompatible: usize,
}

/// Coverage statistics for dashboards and history records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of source fields
    pub total: usize,
    pub matched: usize,
    /// `matched / total`, 0.0 for an empty source
    pub match_rate: f64,
    pub by_classification: ByClassification,
    pub unmatched_sources: usize,
    pub unmatched_targets: Vec<String>,
}

/// Format-neutral mapping report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub source: ReportHeader,
    pub target: ReportHeader,
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ReportDocument {
    /// Rows with a source field, in source order.
    pub fn source_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|r| !r.source_field.is_empty())
    }

    /// True when any row needs a human look before the ETL run.
    pub fn needs_review(&self) -> bool {
        self.rows.iter().any(|r| {
            matches!(
                r.match_type,
                MatchType::Lossy | MatchType::Incompatible | MatchType::Unmatched
            )
        })
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Declared length, else the first parameter of the native type.
fn display_length(field: &FieldDescriptor) -> Option<u32> {
    field
        .length
        .or_else(|| NativeType::parse(&field.native_type).size())
}

/// Builds the report for a mapping result.
///
/// One row per source field in source order, followed by one row per
/// unmatched target field in target order. Field names in `result` that
/// cannot be found in the schemas still get a row, with blank type columns.
pub fn assemble(
    result: &MappingResult,
    source: &SchemaDescriptor,
    target: &SchemaDescriptor,
) -> ReportDocument {
    let mut rows = Vec::with_capacity(result.mappings.len() + result.unmatched_targets.len());

    for mapping in &result.mappings {
        let source_field = source.field(&mapping.source_field);
        let target_field = mapping
            .target_field
            .as_deref()
            .and_then(|name| target.field(name));

        rows.push(ReportRow {
            source_field: mapping.source_field.clone(),
            source_type: source_field
                .map(|f| f.native_type.clone())
                .unwrap_or_default(),
            source_length: source_field.and_then(display_length),
            target_field: mapping.target_field.clone().unwrap_or_default(),
            target_type: target_field
                .map(|f| f.native_type.clone())
                .unwrap_or_default(),
            target_length: target_field.and_then(display_length),
            match_type: mapping.type_compatibility.into(),
            confidence: round2(mapping.confidence),
            notes: mapping.notes.join("; "),
        });
    }

    for name in &result.unmatched_targets {
        let target_field = target.field(name);
        rows.push(ReportRow {
            source_field: String::new(),
            source_type: String::new(),
            source_length: None,
            target_field: name.clone(),
            target_type: target_field
                .map(|f| f.native_type.clone())
                .unwrap_or_default(),
            target_length: target_field.and_then(display_length),
            match_type: MatchType::Unmatched,
            confidence: 0.0,
            notes: NO_SOURCE_NOTE.to_string(),
        });
    }

    let total = result.mappings.len();
    let matched = result.matched().count();
    let summary = ReportSummary {
        total,
        matched,
        match_rate: if total == 0 {
            0.0
        } else {
            matched as f64 / total as f64
        },
        by_classification: ByClassification {
            exact: result.summary.exact,
            compatible: result.summary.compatible,
            lossy: result.summary.lossy,
            incompatible: result.summary.incompatible,
        },
        unmatched_sources: total - matched,
        unmatched_targets: result.unmatched_targets.clone(),
    };

    ReportDocument {
        source: source.into(),
        target: target.into(),
        rows,
        summary,
        warnings: result.warnings.clone(),
    }
}

/// Outcome recorded in run history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every row is an exact or compatible pairing
    Completed,
    /// At least one row is lossy, incompatible or unmatched
    Review,
}

/// Summary of one mapping run, handed to the run-history collaborator.
///
/// This is the only mapping artifact with a timestamp and random id; the
/// report it is built from stays deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRunRecord {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub source: ReportHeader,
    pub target: ReportHeader,
    pub total_fields: usize,
    pub matched_fields: usize,
    pub match_rate: f64,
    pub status: RunStatus,
}

impl MappingRunRecord {
    /// Creates a record for a finished report.
    pub fn from_report(report: &ReportDocument, created_by: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            created_by: created_by.into(),
            source: report.source.clone(),
            target: report.target.clone(),
            total_fields: report.summary.total,
            matched_fields: report.summary.matched,
            match_rate: report.summary.match_rate,
            status: if report.needs_review() {
                RunStatus::Review
            } else {
                RunStatus::Completed
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generate;

    fn account_schemas() -> (SchemaDescriptor, SchemaDescriptor) {
        let source = SchemaDescriptor::new(
            Dialect::Salesforce,
            "Account",
            vec![
                FieldDescriptor::new("Name", "string").with_length(255),
                FieldDescriptor::new("AnnualRevenue", "currency"),
                FieldDescriptor::new("Description", "textarea"),
            ],
        );
        let target = SchemaDescriptor::new(
            Dialect::Mssql,
            "crm.dbo.Account",
            vec![
                FieldDescriptor::new("Name", "nvarchar(100)"),
                FieldDescriptor::new("Annual_Revenue", "decimal(18,2)"),
                FieldDescriptor::new("Region", "nvarchar(50)"),
            ],
        );
        (source, target)
    }

    #[test]
    fn test_rows_follow_source_order_then_unmatched_targets() {
        let (source, target) = account_schemas();
        let result = generate(&source, &target).unwrap();
        let report = assemble(&result, &source, &target);

        let sources: Vec<&str> = report.rows.iter().map(|r| r.source_field.as_str()).collect();
        assert_eq!(sources, vec!["Name", "AnnualRevenue", "Description", ""]);

        let trailing = &report.rows[3];
        assert_eq!(trailing.target_field, "Region");
        assert_eq!(trailing.target_type, "nvarchar(50)");
        assert_eq!(trailing.target_length, Some(50));
        assert_eq!(trailing.match_type, MatchType::Unmatched);
        assert_eq!(trailing.notes, NO_SOURCE_NOTE);
        assert_eq!(report.source_rows().count(), source.fields.len());
    }

    #[test]
    fn test_row_columns_and_rounding() {
        let (source, target) = account_schemas();
        let result = generate(&source, &target).unwrap();
        let report = assemble(&result, &source, &target);

        let name = &report.rows[0];
        assert_eq!(name.source_type, "string");
        assert_eq!(name.source_length, Some(255));
        assert_eq!(name.target_length, Some(100));
        assert_eq!(name.match_type, MatchType::Lossy);
        assert_eq!(name.confidence, 0.7);

        let revenue = &report.rows[1];
        assert_eq!(revenue.target_field, "Annual_Revenue");
        assert_eq!(revenue.match_type, MatchType::Compatible);
        // 0.9 * 0.85
        assert_eq!(revenue.confidence, 0.77);
        assert!(revenue.notes.contains("; "));

        let description = &report.rows[2];
        assert_eq!(description.target_field, "");
        assert_eq!(description.target_type, "");
        assert_eq!(description.match_type, MatchType::Unmatched);
        assert_eq!(description.confidence, 0.0);
    }

    #[test]
    fn test_summary_statistics() {
        let (source, target) = account_schemas();
        let result = generate(&source, &target).unwrap();
        let report = assemble(&result, &source, &target);

        let summary = &report.summary;
        assert_eq!(summary.total, 3);
        assert_eq!(summary.matched, 2);
        assert!((summary.match_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.by_classification.lossy, 1);
        assert_eq!(summary.by_classification.compatible, 1);
        assert_eq!(summary.unmatched_sources, 1);
        assert_eq!(summary.unmatched_targets, vec!["Region"]);
        assert_eq!(report.source.qualified_name, "Account");
        assert_eq!(report.target.dialect, Dialect::Mssql);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.765), 0.77);
        assert_eq!(round2(0.7), 0.7);
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_match_type_serializes_lowercase() {
        let json = serde_json::to_string(&MatchType::Unmatched).unwrap();
        assert_eq!(json, "\"unmatched\"");
        assert_eq!(MatchType::from(Some(TypeCompatibility::Lossy)), MatchType::Lossy);
    }

    #[test]
    fn test_run_record_status() {
        let (source, target) = account_schemas();
        let result = generate(&source, &target).unwrap();
        let report = assemble(&result, &source, &target);

        let record = MappingRunRecord::from_report(&report, "etl-team");
        assert_eq!(record.status, RunStatus::Review);
        assert_eq!(record.created_by, "etl-team");
        assert_eq!(record.total_fields, 3);
        assert_eq!(record.matched_fields, 2);
        assert_eq!(record.source.dialect, Dialect::Salesforce);

        let clean_source = SchemaDescriptor::new(
            Dialect::Mysql,
            "shop.customer",
            vec![FieldDescriptor::new("id", "int")],
        );
        let clean_target = SchemaDescriptor::new(
            Dialect::Redshift,
            "dw.customer",
            vec![FieldDescriptor::new("ID", "integer")],
        );
        let result = generate(&clean_source, &clean_target).unwrap();
        let report = assemble(&result, &clean_source, &clean_target);
        let record = MappingRunRecord::from_report(&report, "etl-team");
        assert_eq!(record.status, RunStatus::Completed);
        assert_eq!(record.match_rate, 1.0);

        let other = MappingRunRecord::from_report(&report, "etl-team");
        assert_ne!(record.run_id, other.run_id);
    }
}
