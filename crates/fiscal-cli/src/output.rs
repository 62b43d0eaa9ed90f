//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use fiscal_domain::ExtractedRecord;
use fiscal_extractor::SkippedFile;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format extracted records.
    pub fn format_records(&self, records: &[ExtractedRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Table => Ok(self.format_records_table(records)),
            OutputFormat::Quiet => Ok(records
                .iter()
                .map(|r| r.archivo_origen.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_records_table(&self, records: &[ExtractedRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No records extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Archivo", "Cliente", "Monto", "Fecha", "Tipo"]);

        for extracted in records {
            let record = &extracted.record;
            let monto = record
                .monto
                .map(|m| format!("{:.2}", m))
                .unwrap_or_else(|| "-".to_string());
            builder.push_record([
                extracted.archivo_origen.as_str(),
                record.nombre_cliente.as_str(),
                monto.as_str(),
                record.fecha.as_str(),
                record.tipo_solicitud.as_str(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the files that produced no record.
    pub fn skipped_files(&self, skipped: &[SkippedFile]) -> String {
        skipped
            .iter()
            .map(|s| self.warning(&format!("{}: {}", s.file_name, s.reason)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_domain::{FiscalRecord, RequestType};
    use fiscal_extractor::{ExhaustionCause, SkipReason};

    fn create_test_record() -> ExtractedRecord {
        FiscalRecord {
            nombre_cliente: "Acme".to_string(),
            monto: Some(150.5),
            fecha: "2024-03-01".to_string(),
            tipo_solicitud: RequestType::Factura,
        }
        .with_source("a.txt")
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_records(&[create_test_record()]).unwrap();
        assert!(output.contains("\"archivo_origen\": \"a.txt\""));
        assert!(output.contains("nombre_cliente"));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_records(&[create_test_record()]).unwrap();
        assert_eq!(output, "a.txt");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records(&[create_test_record()]).unwrap();
        assert!(output.contains("Cliente"));
        assert!(output.contains("Acme"));
        assert!(output.contains("150.50"));
        assert!(output.contains("Factura"));
    }

    #[test]
    fn test_empty_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(
            formatter.format_records(&[]).unwrap(),
            "No records extracted."
        );
    }

    #[test]
    fn test_skipped_files() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let skipped = vec![SkippedFile {
            file_name: "b.txt".to_string(),
            reason: SkipReason::ExtractionFailed {
                cause: ExhaustionCause::MalformedOutput,
                attempts: 3,
            },
        }];
        assert_eq!(
            formatter.skipped_files(&skipped),
            "⚠ b.txt: no record after 3 attempts (malformed output)"
        );
    }

    #[test]
    fn test_no_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("ok"), "✓ ok");
        assert_eq!(formatter.error("bad"), "✗ bad");
    }
}
