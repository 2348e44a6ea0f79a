//! Field mapping sheet generator.
//!
//! Loads a source and a target schema, runs the mapping engine and writes
//! the report as JSON, CSV, Excel or Markdown. All processing is local; the tool
//! never connects to the systems the schemas describe.

use anyhow::{Context, Result};
use clap::Parser;
use mapsheet::{
    Cli, Command, GenerateArgs, ValidateArgs, build_report, describe_dialects, load_config,
    load_schema, render_report, write_output,
};
use mapsheet_core::validation::validate_and_parse_schema;
use mapsheet_core::{MappingRunRecord, init_logging};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    mapsheet_core::initialize_schema_validator()
        .context("Failed to initialize schema validator")?;

    match &cli.command {
        Command::Generate(args) => generate(args).await,
        Command::Validate(args) => validate(args).await,
        Command::Dialects => {
            print!("{}", describe_dialects());
            Ok(())
        }
    }
}

/// Generates the mapping report and, when requested, the run record.
async fn generate(args: &GenerateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())
        .await
        .context("Failed to load engine configuration")?;

    let source = load_schema(&args.source, args.source_dialect)
        .await
        .with_context(|| format!("Failed to load source schema {}", args.source.display()))?;
    let target = load_schema(&args.target, args.target_dialect)
        .await
        .with_context(|| format!("Failed to load target schema {}", args.target.display()))?;

    info!(
        "Mapping {} '{}' ({} fields) onto {} '{}' ({} fields)",
        source.dialect,
        source.qualified_name,
        source.fields.len(),
        target.dialect,
        target.qualified_name,
        target.fields.len()
    );

    let report = build_report(&source, &target, config).context("Mapping generation failed")?;

    for warning in &report.warnings {
        warn!("{}", warning);
    }
    info!(
        "Matched {}/{} source fields ({:.1}%)",
        report.summary.matched,
        report.summary.total,
        report.summary.match_rate * 100.0
    );
    if report.needs_review() {
        info!("Report contains pairings that need manual review");
    }

    let rendered = render_report(&report, args.format)?;
    write_output(&rendered, args.output.as_deref(), args.compress())
        .await
        .context("Failed to write mapping report")?;

    if let Some(path) = &args.run_record {
        let record = MappingRunRecord::from_report(&report, args.created_by.as_str());
        let json = serde_json::to_string_pretty(&record)
            .context("Failed to serialize run record")?;
        write_output(json.as_bytes(), Some(path), false)
            .await
            .with_context(|| format!("Failed to write run record {}", path.display()))?;
        info!("Recorded run {} with status {:?}", record.run_id, record.status);
    }

    Ok(())
}

/// Checks a schema document, including the checks the engine applies.
async fn validate(args: &ValidateArgs) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let schema = validate_and_parse_schema(&text)
        .with_context(|| format!("{} is not a valid schema document", args.file.display()))?;
    schema
        .check_integrity()
        .with_context(|| format!("{} cannot be mapped", args.file.display()))?;

    let unrecognized = schema
        .fields
        .iter()
        .filter_map(|field| {
            mapsheet_core::compatibility::unrecognized_type_warning(schema.dialect, field)
        })
        .inspect(|warning| warn!("{}", warning))
        .count();

    println!(
        "{} schema '{}' is valid: {} fields, {} with unrecognized types",
        schema.dialect,
        schema.qualified_name,
        schema.fields.len(),
        unrecognized
    );

    Ok(())
}
