//! Greedy field-to-field mapping between two schemas.
//!
//! Source fields are visited once, in schema order. Each takes its best
//! remaining target by name score, the pairing is checked for type
//! compatibility, and the target is consumed only when the pairing is
//! accepted. The pass is deterministic: no randomness, no hash ordering.

use std::collections::BTreeSet;

use crate::Result;
use crate::compatibility::{resolve, unrecognized_type_warning};
use crate::config::EngineConfig;
use crate::error::MapsheetError;
use crate::matcher::TargetIndex;
use crate::models::{
    FieldDescriptor, FieldMapping, MappingResult, MappingSummary, SchemaDescriptor,
    TypeCompatibility,
};

/// Mapping engine holding validated thresholds and weights.
///
/// The engine keeps no state between calls, so one instance can be shared
/// across threads and used for any number of concurrent `generate` calls.
///
/// # Example
///
/// ```rust
/// use mapsheet_core::engine::MappingEngine;
/// use mapsheet_core::models::{Dialect, FieldDescriptor, SchemaDescriptor, TypeCompatibility};
///
/// let source = SchemaDescriptor::new(
///     Dialect::Mssql,
///     "crm.dbo.Customer",
///     vec![FieldDescriptor::new("CustomerID", "int")],
/// );
/// let target = SchemaDescriptor::new(
///     Dialect::Redshift,
///     "dw.public.customer",
///     vec![FieldDescriptor::new("customerid", "integer")],
/// );
///
/// let result = MappingEngine::with_defaults().generate(&source, &target)?;
/// let mapping = &result.mappings[0];
/// assert_eq!(mapping.target_field.as_deref(), Some("customerid"));
/// assert_eq!(mapping.type_compatibility, Some(TypeCompatibility::Exact));
/// assert_eq!(mapping.confidence, 1.0);
/// # Ok::<(), mapsheet_core::MapsheetError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappingEngine {
    config: EngineConfig,
}

impl MappingEngine {
    /// Creates an engine after validating the configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| MapsheetError::configuration(e.to_string()))?;
        Ok(Self { config })
    }

    /// Creates an engine with the default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Returns a reference to the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Maps every source field onto at most one target field.
    ///
    /// # Errors
    /// Returns [`MapsheetError::DataIntegrity`] when either schema is empty
    /// or declares the same field name twice. No partial result is produced.
    pub fn generate(
        &self,
        source: &SchemaDescriptor,
        target: &SchemaDescriptor,
    ) -> Result<MappingResult> {
        source.check_integrity()?;
        target.check_integrity()?;

        tracing::debug!(
            "Mapping {} ({}, {} fields) onto {} ({}, {} fields)",
            source.qualified_name,
            source.dialect.as_str(),
            source.fields.len(),
            target.qualified_name,
            target.dialect.as_str(),
            target.fields.len()
        );

        let warnings = collect_type_warnings(source, target);
        let index = TargetIndex::new(&target.field_names());
        let mut taken: BTreeSet<String> = BTreeSet::new();
        let mut summary = MappingSummary::default();
        let mut mappings = Vec::with_capacity(source.fields.len());

        for field in &source.fields {
            let mapping = self.map_field(field, source, target, &index, &taken);
            match (&mapping.target_field, mapping.type_compatibility) {
                (Some(target_name), Some(compatibility)) => {
                    taken.insert(target_name.clone());
                    summary.record(compatibility);
                }
                _ => summary.unmatched_source += 1,
            }
            mappings.push(mapping);
        }

        let unmatched_targets: Vec<String> = target
            .fields
            .iter()
            .filter(|f| !taken.contains(&f.name))
            .map(|f| f.name.clone())
            .collect();
        summary.unmatched_target = unmatched_targets.len();

        tracing::info!(
            "Mapped {} onto {}: {}/{} source fields matched, {} target fields unclaimed",
            source.qualified_name,
            target.qualified_name,
            summary.matched(),
            source.fields.len(),
            summary.unmatched_target
        );

        Ok(MappingResult {
            mappings,
            unmatched_targets,
            summary,
            warnings,
        })
    }

    fn map_field(
        &self,
        field: &FieldDescriptor,
        source: &SchemaDescriptor,
        target: &SchemaDescriptor,
        index: &TargetIndex,
        taken: &BTreeSet<String>,
    ) -> FieldMapping {
        let candidates = index.best_candidates(&field.name, taken);
        let Some(best) = candidates.first() else {
            tracing::debug!("{}: no target fields left", field.name);
            return FieldMapping::unmatched(
                &field.name,
                0.0,
                "no target fields left to map".to_string(),
            );
        };

        if best.score < self.config.min_name_score {
            tracing::debug!(
                "{}: best candidate '{}' scored {:.2}, below {:.2}",
                field.name,
                best.target_name,
                best.score,
                self.config.min_name_score
            );
            return FieldMapping::unmatched(
                &field.name,
                best.score,
                format!(
                    "no target name scored {:.2} or more (closest: '{}' at {:.2})",
                    self.config.min_name_score, best.target_name, best.score
                ),
            );
        }

        let Some(target_field) = target.fields.get(best.position) else {
            return FieldMapping::unmatched(
                &field.name,
                best.score,
                format!("target field '{}' not found", best.target_name),
            );
        };

        let (compatibility, type_notes) =
            resolve(field, source.dialect, target_field, target.dialect);

        if compatibility == TypeCompatibility::Incompatible
            && best.score < self.config.name_override_score
        {
            tracing::debug!(
                "{}: rejected '{}' (incompatible types, name score {:.2})",
                field.name,
                target_field.name,
                best.score
            );
            let mut mapping = FieldMapping::unmatched(
                &field.name,
                best.score,
                format!(
                    "rejected '{}': incompatible types and name score {:.2} below {:.2}",
                    target_field.name, best.score, self.config.name_override_score
                ),
            );
            mapping.notes.extend(type_notes);
            return mapping;
        }

        let confidence =
            (best.score * self.config.type_weights.weight(compatibility)).clamp(0.0, 1.0);

        let mut notes = Vec::with_capacity(type_notes.len() + 1);
        if best.score < 1.0 {
            notes.push(format!("matched on {} ({:.2})", best.rule, best.score));
        }
        notes.extend(type_notes);

        tracing::debug!(
            "{} -> {}: {} by {}, confidence {:.2}",
            field.name,
            target_field.name,
            compatibility,
            best.rule,
            confidence
        );

        FieldMapping {
            source_field: field.name.clone(),
            target_field: Some(target_field.name.clone()),
            name_score: best.score,
            type_compatibility: Some(compatibility),
            confidence,
            notes,
        }
    }
}

/// Unrecognized native types on either side, de-duplicated in first-seen
/// order (source fields first).
fn collect_type_warnings(source: &SchemaDescriptor, target: &SchemaDescriptor) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();
    let fields = source
        .fields
        .iter()
        .map(|f| (source.dialect, f))
        .chain(target.fields.iter().map(|f| (target.dialect, f)));

    for (dialect, field) in fields {
        if let Some(warning) = unrecognized_type_warning(dialect, field)
            && !warnings.contains(&warning)
        {
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }
    }

    warnings
}

/// Maps `source` onto `target` with the default configuration.
pub fn generate(source: &SchemaDescriptor, target: &SchemaDescriptor) -> Result<MappingResult> {
    MappingEngine::with_defaults().generate(source, target)
}
