//! Library half of the mapsheet command-line tool.
//!
//! Argument definitions and the load/generate/render pipeline live here so
//! that integration tests can drive them without spawning the binary. All
//! file I/O stays in this crate; `mapsheet-core` only sees parsed schemas.

pub mod output;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use mapsheet_core::validation::validate_and_parse_value;
use mapsheet_core::{
    CatalogRow, Dialect, EngineConfig, MappingEngine, MapsheetError, ReportDocument, Result,
    SchemaDescriptor, assemble, taxonomy,
};
use serde_json::Value;

pub use output::{OutputFormat, render_report, write_output};

/// Command-line interface for the mapping sheet generator
#[derive(Parser)]
#[command(name = "mapsheet")]
#[command(about = "Field mapping sheet generator for schemas from different metadata sources")]
#[command(version)]
#[command(long_about = "
Mapsheet - schema-to-schema field mapping

Reads a source and a target schema, pairs their fields by name and type
compatibility, and writes a mapping report for review.

INPUT FORMATS:
- Schema documents (format_version 1.0, dialect declared inside)
- Catalog row arrays as exported by metadata connectors
  (requires --source-dialect / --target-dialect)

SUPPORTED DIALECTS:
- Salesforce (salesforce)
- SQL Server (mssql)
- MySQL (mysql)
- Redshift (redshift)

EXAMPLES:
  mapsheet generate --source account.json --target dbo_account.json
  mapsheet generate -s sf.json -t mssql.json --format csv -o mapping.csv
  mapsheet generate -s sf.json -t mssql.json --format xlsx -o mapping.xlsx
  mapsheet validate account.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand)]
pub enum Command {
    /// Generate a mapping report between two schemas
    Generate(GenerateArgs),
    /// Validate a schema document
    Validate(ValidateArgs),
    /// List supported dialects and their recognized native types
    Dialects,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Source schema document or catalog rows
    #[arg(short, long, value_name = "FILE")]
    pub source: PathBuf,

    /// Target schema document or catalog rows
    #[arg(short, long, value_name = "FILE")]
    pub target: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output file path (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(long, value_name = "FILE", env = "MAPSHEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write a run record for the mapping history to this file
    #[arg(long, value_name = "FILE")]
    pub run_record: Option<PathBuf>,

    /// Name recorded as the author of the run
    #[arg(long, value_name = "NAME", default_value = "mapsheet")]
    pub created_by: String,

    /// Dialect of the source when it is given as catalog rows
    #[arg(long, value_name = "DIALECT")]
    pub source_dialect: Option<Dialect>,

    /// Dialect of the target when it is given as catalog rows
    #[arg(long, value_name = "DIALECT")]
    pub target_dialect: Option<Dialect>,

    /// Compress the report using Zstandard
    #[cfg(feature = "compression")]
    #[arg(long, help = "Compress output using Zstandard (.zst)")]
    pub compress: bool,
}

impl GenerateArgs {
    /// Whether the report should be zstd-compressed.
    pub fn compress(&self) -> bool {
        #[cfg(feature = "compression")]
        {
            self.compress
        }
        #[cfg(not(feature = "compression"))]
        {
            false
        }
    }
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Schema document to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(
        short,
        long,
        global = true,
        help = "Suppress all log output except errors"
    )]
    pub quiet: bool,
}

/// Parses a schema from either a schema document or a catalog row array.
///
/// Catalog rows carry no dialect, so `dialect` must be given for them; the
/// qualified name is taken from the rows' table name, else `fallback_name`.
/// For a schema document an explicit `dialect` must agree with the one
/// declared inside.
///
/// # Errors
/// Returns a validation error for malformed documents and a configuration
/// error when the dialect is missing or contradicts the document.
pub fn parse_schema(
    text: &str,
    dialect: Option<Dialect>,
    fallback_name: &str,
) -> Result<SchemaDescriptor> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| MapsheetError::serialization("Failed to parse schema input as JSON", e))?;

    if value.is_array() {
        let dialect = dialect.ok_or_else(|| {
            MapsheetError::configuration(
                "Catalog rows carry no dialect; pass --source-dialect or --target-dialect",
            )
        })?;
        let rows: Vec<CatalogRow> = serde_json::from_value(value)
            .map_err(|e| MapsheetError::serialization("Failed to read catalog rows", e))?;
        let qualified_name = rows
            .first()
            .map(|row| row.table_name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback_name)
            .to_string();

        tracing::debug!(
            "Read {} catalog rows for {} '{}'",
            rows.len(),
            dialect,
            qualified_name
        );
        return Ok(SchemaDescriptor::from_catalog_rows(
            dialect,
            qualified_name,
            &rows,
        ));
    }

    let schema = validate_and_parse_value(value)?;
    if let Some(expected) = dialect
        && expected != schema.dialect
    {
        return Err(MapsheetError::configuration(format!(
            "Schema '{}' declares dialect '{}' but '{}' was requested",
            schema.qualified_name,
            schema.dialect.as_str(),
            expected.as_str()
        )));
    }
    Ok(schema)
}

/// Parses an engine configuration; missing keys take their defaults.
///
/// # Errors
/// Returns a serialization error for malformed JSON. Range checks happen
/// when the engine is built.
pub fn parse_config(text: &str) -> Result<EngineConfig> {
    serde_json::from_str(text)
        .map_err(|e| MapsheetError::serialization("Failed to parse engine configuration", e))
}

/// Reads and parses a schema file.
///
/// # Errors
/// Returns an I/O error when the file cannot be read, otherwise the errors
/// of [`parse_schema`].
pub async fn load_schema(path: &Path, dialect: Option<Dialect>) -> Result<SchemaDescriptor> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| MapsheetError::io(format!("Failed to read {}", path.display()), e))?;
    let fallback_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_schema(&text, dialect, &fallback_name)
}

/// Reads the engine configuration, or returns defaults when no file is given.
///
/// # Errors
/// Returns an I/O or serialization error for an unreadable config file.
pub async fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| MapsheetError::io(format!("Failed to read {}", path.display()), e))?;
    tracing::info!("Loaded engine configuration from {}", path.display());
    parse_config(&text)
}

/// Runs the mapping engine and assembles the report.
///
/// # Errors
/// Returns a configuration error for an out-of-range config and a data
/// integrity error for empty or duplicate-field schemas.
pub fn build_report(
    source: &SchemaDescriptor,
    target: &SchemaDescriptor,
    config: EngineConfig,
) -> Result<ReportDocument> {
    let engine = MappingEngine::new(config)?;
    tracing::debug!(
        "Engine thresholds: min name score {:.2}, override {:.2}",
        engine.config().min_name_score,
        engine.config().name_override_score
    );
    let result = engine.generate(source, target)?;
    Ok(assemble(&result, source, target))
}

/// Renders the `dialects` command output: one block per dialect listing
/// each recognized native type name and how it classifies.
pub fn describe_dialects() -> String {
    let mut out = String::new();
    for dialect in Dialect::ALL {
        out.push_str(&format!("{} ({})\n", dialect, dialect.as_str()));
        for (name, class) in taxonomy::table(dialect) {
            out.push_str(&format!("  {}: {}\n", name, class.describe()));
        }
    }
    out
}
