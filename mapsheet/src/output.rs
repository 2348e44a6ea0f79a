//! Report rendering and output writing.
//!
//! Renders a [`ReportDocument`] as JSON, as a CSV or Excel mapping sheet or
//! as a Markdown summary, and writes it to a file or stdout with optional
//! compression.

use std::borrow::Cow;
use std::path::Path;

use askama::Template;
use clap::ValueEnum;
use mapsheet_core::report::{ReportHeader, ReportSummary};
use mapsheet_core::{MapsheetError, ReportDocument, ReportRow, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tokio::io::AsyncWriteExt;

/// Available report formats
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Structured report with rows, summary and warnings
    #[default]
    Json,
    /// Spreadsheet-ready mapping sheet, one row per field
    Csv,
    /// Excel workbook with the mapping sheet on a worksheet named "Mapping"
    Xlsx,
    /// Human-readable summary and mapping table
    Markdown,
}

/// Worksheet name of the Excel mapping sheet
pub const XLSX_SHEET_NAME: &str = "Mapping";

/// Column headers of the CSV and Excel mapping sheets
pub const CSV_HEADERS: [&str; 11] = [
    "Source Object",
    "Source Field",
    "Source Type",
    "Source Length",
    "Target Table",
    "Target Column",
    "Target Type",
    "Target Length",
    "Match Type",
    "Confidence",
    "Notes",
];

/// Renders the report in the requested format.
///
/// # Errors
/// Returns a serialization error for JSON and an I/O or configuration error
/// when CSV, workbook or template rendering fails.
pub fn render_report(report: &ReportDocument, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => serde_json::to_vec_pretty(report)
            .map_err(|e| MapsheetError::serialization("JSON report serialization", e)),
        OutputFormat::Csv => render_csv(report),
        OutputFormat::Xlsx => render_xlsx(report).map_err(|e| {
            MapsheetError::configuration(format!("Excel workbook rendering failed: {}", e))
        }),
        OutputFormat::Markdown => render_markdown(report).map(String::into_bytes),
    }
}

/// Source object cell; blank on trailing rows for unmatched targets.
fn source_object<'a>(report: &'a ReportDocument, row: &ReportRow) -> &'a str {
    if row.source_field.is_empty() {
        ""
    } else {
        report.source.qualified_name.as_str()
    }
}

fn length_cell(length: Option<u32>) -> String {
    length.map(|l| l.to_string()).unwrap_or_default()
}

/// Renders the mapping sheet. Trailing rows for unmatched targets leave the
/// source columns blank, object name included.
fn render_csv(report: &ReportDocument) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| MapsheetError::io("Failed to write CSV header", e.into()))?;

    for row in &report.rows {
        writer
            .write_record([
                source_object(report, row),
                row.source_field.as_str(),
                row.source_type.as_str(),
                length_cell(row.source_length).as_str(),
                report.target.qualified_name.as_str(),
                row.target_field.as_str(),
                row.target_type.as_str(),
                length_cell(row.target_length).as_str(),
                row.match_type.to_string().as_str(),
                format!("{:.2}", row.confidence).as_str(),
                row.notes.as_str(),
            ])
            .map_err(|e| {
                MapsheetError::io(
                    format!("Failed to write CSV row for '{}'", row.source_field),
                    e.into(),
                )
            })?;
    }

    writer
        .into_inner()
        .map_err(|e| MapsheetError::io("Failed to flush CSV writer", e.into_error()))
}

fn write_length(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    length: Option<u32>,
) -> std::result::Result<(), XlsxError> {
    if let Some(length) = length {
        sheet.write_number(row, col, f64::from(length))?;
    }
    Ok(())
}

/// Renders the mapping sheet as a workbook with the same columns as the CSV
/// sheet. Lengths and confidence are numeric cells; absent lengths stay empty.
fn render_xlsx(report: &ReportDocument) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET_NAME)?;
    for (col, header) in (0u16..).zip(CSV_HEADERS) {
        sheet.write_string_with_format(0, col, header, &header_format)?;
    }

    for (line, row) in (1u32..).zip(&report.rows) {
        sheet.write_string(line, 0, source_object(report, row))?;
        sheet.write_string(line, 1, row.source_field.as_str())?;
        sheet.write_string(line, 2, row.source_type.as_str())?;
        write_length(sheet, line, 3, row.source_length)?;
        sheet.write_string(line, 4, report.target.qualified_name.as_str())?;
        sheet.write_string(line, 5, row.target_field.as_str())?;
        sheet.write_string(line, 6, row.target_type.as_str())?;
        write_length(sheet, line, 7, row.target_length)?;
        sheet.write_string(line, 8, row.match_type.to_string())?;
        sheet.write_number(line, 9, row.confidence)?;
        sheet.write_string(line, 10, row.notes.as_str())?;
    }

    workbook.save_to_buffer()
}

/// Markdown table cells cannot contain pipes or line breaks.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

struct MarkdownRow {
    source_field: String,
    source_type: String,
    target_field: String,
    target_type: String,
    match_type: String,
    confidence: String,
    notes: String,
}

impl From<&ReportRow> for MarkdownRow {
    fn from(row: &ReportRow) -> Self {
        let or_dash = |text: &str| {
            if text.is_empty() {
                "-".to_string()
            } else {
                cell(text)
            }
        };
        Self {
            source_field: or_dash(&row.source_field),
            source_type: or_dash(&row.source_type),
            target_field: or_dash(&row.target_field),
            target_type: or_dash(&row.target_type),
            match_type: row.match_type.to_string(),
            confidence: format!("{:.2}", row.confidence),
            notes: cell(&row.notes),
        }
    }
}

#[derive(Template)]
#[template(path = "report.md", escape = "none")]
struct MarkdownReport<'a> {
    source: &'a ReportHeader,
    target: &'a ReportHeader,
    summary: &'a ReportSummary,
    match_rate: String,
    rows: Vec<MarkdownRow>,
    warnings: &'a [String],
}

fn render_markdown(report: &ReportDocument) -> Result<String> {
    let template = MarkdownReport {
        source: &report.source,
        target: &report.target,
        summary: &report.summary,
        match_rate: format!("{:.1}%", report.summary.match_rate * 100.0),
        rows: report.rows.iter().map(MarkdownRow::from).collect(),
        warnings: &report.warnings,
    };

    template.render().map_err(|e| {
        MapsheetError::configuration(format!("Markdown template rendering failed: {}", e))
    })
}

/// Writes rendered output to `path`, or to stdout when no path is given.
///
/// # Errors
/// Returns an I/O error when writing fails, and a configuration error when
/// compression is requested but not compiled in.
pub async fn write_output(content: &[u8], path: Option<&Path>, compress: bool) -> Result<()> {
    let data: Cow<'_, [u8]> = if compress {
        Cow::Owned(compress_bytes(content)?)
    } else {
        Cow::Borrowed(content)
    };

    match path {
        Some(path) => {
            tokio::fs::write(path, &data)
                .await
                .map_err(|e| MapsheetError::io(format!("Failed to write to {}", path.display()), e))?;
            tracing::info!("Wrote {} bytes to {}", data.len(), path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&data)
                .await
                .map_err(|e| MapsheetError::io("Failed to write to stdout", e))?;
            stdout
                .flush()
                .await
                .map_err(|e| MapsheetError::io("Failed to flush stdout", e))?;
        }
    }

    Ok(())
}

#[cfg(feature = "compression")]
fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    use std::io::Write;

    let mut encoder = zstd::Encoder::new(Vec::new(), 3).map_err(|e| {
        MapsheetError::configuration(format!("Failed to create compressor: {}", e))
    })?;
    encoder
        .write_all(data)
        .map_err(|e| MapsheetError::configuration(format!("Compression failed: {}", e)))?;
    encoder.finish().map_err(|e| {
        MapsheetError::configuration(format!("Compression finalization failed: {}", e))
    })
}

#[cfg(not(feature = "compression"))]
fn compress_bytes(_data: &[u8]) -> Result<Vec<u8>> {
    Err(MapsheetError::configuration(
        "Compression not available. Compile with --features compression",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsheet_core::{Dialect, FieldDescriptor, SchemaDescriptor, assemble, generate};

    fn sample_report() -> ReportDocument {
        let source = SchemaDescriptor::new(
            Dialect::Salesforce,
            "Contact",
            vec![
                FieldDescriptor::new("Email", "email").with_length(80),
                FieldDescriptor::new("Revenue", "currency"),
                FieldDescriptor::new("Fax", "phone"),
            ],
        );
        let target = SchemaDescriptor::new(
            Dialect::Mssql,
            "crm.dbo.Contact",
            vec![
                FieldDescriptor::new("email", "nvarchar(255)"),
                FieldDescriptor::new("revenue", "decimal(18,2)"),
                FieldDescriptor::new("LoadedAt", "datetime2"),
            ],
        );
        let result = generate(&source, &target).unwrap();
        assemble(&result, &source, &target)
    }

    #[test]
    fn test_render_json_report() {
        let report = sample_report();
        let bytes = render_report(&report, OutputFormat::Json).unwrap();
        let parsed: ReportDocument = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.rows, report.rows);
        assert_eq!(parsed.source, report.source);
        assert_eq!(parsed.summary.matched, report.summary.matched);
        assert_eq!(parsed.warnings, report.warnings);
    }

    #[test]
    fn test_render_csv_sheet() {
        let report = sample_report();
        let bytes = render_report(&report, OutputFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_HEADERS);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), report.rows.len());

        let email = &records[0];
        assert_eq!(&email[0], "Contact");
        assert_eq!(&email[1], "Email");
        assert_eq!(&email[3], "80");
        assert_eq!(&email[5], "email");
        assert_eq!(&email[7], "255");
        assert_eq!(&email[9], "1.00");

        // Unmatched target rows leave the source side blank
        let trailing = records.last().unwrap();
        assert_eq!(&trailing[0], "");
        assert_eq!(&trailing[1], "");
        assert_eq!(&trailing[4], "crm.dbo.Contact");
        assert_eq!(&trailing[5], "LoadedAt");
        assert_eq!(&trailing[8], "unmatched");
    }

    #[test]
    fn test_render_xlsx_workbook() {
        let report = sample_report();
        let bytes = render_report(&report, OutputFormat::Xlsx).unwrap();

        // xlsx workbooks are zip archives
        assert!(bytes.starts_with(b"PK\x03\x04"));
        assert!(
            bytes
                .windows(b"xl/worksheets/sheet1.xml".len())
                .any(|w| w == b"xl/worksheets/sheet1.xml")
        );
    }

    #[test]
    fn test_source_object_blank_for_unmatched_targets() {
        let report = sample_report();
        assert_eq!(source_object(&report, &report.rows[0]), "Contact");
        let trailing = report.rows.last().unwrap();
        assert_eq!(source_object(&report, trailing), "");
    }

    #[test]
    fn test_render_markdown_summary() {
        let report = sample_report();
        let text = String::from_utf8(render_report(&report, OutputFormat::Markdown).unwrap()).unwrap();

        assert!(text.starts_with("# Mapping Report: Contact to crm.dbo.Contact"));
        assert!(text.contains("| Dialect | Salesforce | SQL Server |"));
        assert!(text.contains(&format!("- Source fields: {}", report.summary.total)));
        assert!(text.contains("| Email | email | email | nvarchar(255) | exact | 1.00 |"));
        assert!(text.contains("| - | - | LoadedAt | datetime2 | unmatched | 0.00 | no source mapped |"));
        assert!(text.contains("## Warnings"));
        assert!(text.contains("- unrecognized salesforce type 'currency' on field 'Revenue'"));
    }

    #[test]
    fn test_markdown_cells_are_escaped() {
        assert_eq!(cell("a|b"), "a\\|b");
        assert_eq!(cell("line\nbreak"), "line break");
    }

    #[tokio::test]
    async fn test_write_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_output(b"{}", Some(&path), false).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"{}");
    }

    #[cfg(not(feature = "compression"))]
    #[tokio::test]
    async fn test_write_output_compression_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json.zst");

        let result = write_output(b"{}", Some(&path), true).await;
        assert!(matches!(result, Err(MapsheetError::Configuration { .. })));
        assert!(!path.exists());
    }

    #[cfg(feature = "compression")]
    #[tokio::test]
    async fn test_write_output_compressed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json.zst");

        write_output(b"{\"rows\": []}", Some(&path), true).await.unwrap();
        let compressed = tokio::fs::read(&path).await.unwrap();
        let restored = zstd::decode_all(compressed.as_slice()).unwrap();
        assert_eq!(restored, b"{\"rows\": []}");
    }
}
