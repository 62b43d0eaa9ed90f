//! JSON result file

use crate::error::ExtractorError;
use fiscal_domain::ExtractedRecord;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a write did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    /// The file was (over)written with this many records
    Written(usize),
    /// Nothing to write; any existing file was left untouched
    SkippedEmpty,
}

/// Writes a batch as one indented JSON array
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    /// Create a sink targeting `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the records, overwriting the target
    ///
    /// An empty batch writes nothing, so an earlier result is never
    /// replaced by an empty one.
    pub fn write(&self, records: &[ExtractedRecord]) -> Result<SinkOutcome, ExtractorError> {
        if records.is_empty() {
            warn!("No records to write, leaving {} untouched", self.path.display());
            return Ok(SinkOutcome::SkippedEmpty);
        }

        fs::write(&self.path, to_pretty_json(records)?)?;
        info!("Wrote {} records to {}", records.len(), self.path.display());

        Ok(SinkOutcome::Written(records.len()))
    }
}

/// Serialize with four-space indentation, keeping non-ASCII text as-is
fn to_pretty_json(records: &[ExtractedRecord]) -> Result<Vec<u8>, ExtractorError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_domain::{FiscalRecord, RequestType};
    use tempfile::TempDir;

    fn record(name: &str, file: &str) -> ExtractedRecord {
        FiscalRecord {
            nombre_cliente: name.to_string(),
            monto: None,
            fecha: "2024-01-15".to_string(),
            tipo_solicitud: RequestType::Queja,
        }
        .with_source(file)
    }

    #[test]
    fn test_write_indented_utf8() {
        let dir = TempDir::new().unwrap();
        let sink = JsonSink::new(dir.path().join("out.json"));

        let outcome = sink.write(&[record("Muñoz y Peña", "queja.docx")]).unwrap();
        assert_eq!(outcome, SinkOutcome::Written(1));

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("Muñoz y Peña"));
        assert!(contents.starts_with("[\n    {\n        \"nombre_cliente\""));
        assert!(contents.contains("\"monto\": null"));
        assert!(contents.contains("\"archivo_origen\": \"queja.docx\""));
    }

    #[test]
    fn test_whole_amounts_have_no_fraction() {
        let dir = TempDir::new().unwrap();
        let sink = JsonSink::new(dir.path().join("out.json"));
        let mut whole = record("Acme", "a.txt");
        whole.record.monto = Some(150.0);
        let mut cents = record("Beta", "b.txt");
        cents.record.monto = Some(99.95);

        sink.write(&[whole, cents]).unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains("\"monto\": 150,"));
        assert!(!contents.contains("150.0"));
        assert!(contents.contains("\"monto\": 99.95,"));
    }

    #[test]
    fn test_write_preserves_order() {
        let dir = TempDir::new().unwrap();
        let sink = JsonSink::new(dir.path().join("out.json"));
        let records = vec![record("B", "b.txt"), record("A", "a.txt")];

        sink.write(&records).unwrap();

        let parsed: Vec<ExtractedRecord> =
            serde_json::from_str(&fs::read_to_string(sink.path()).unwrap()).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_empty_batch_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "[\"previous\"]").unwrap();

        let outcome = JsonSink::new(&path).write(&[]).unwrap();
        assert_eq!(outcome, SinkOutcome::SkippedEmpty);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[\"previous\"]");
    }

    #[test]
    fn test_overwrites_previous_result() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "old contents").unwrap();

        JsonSink::new(&path).write(&[record("Nuevo", "n.txt")]).unwrap();
        assert!(!fs::read_to_string(&path).unwrap().contains("old contents"));
    }

    #[test]
    fn test_unwritable_target_is_error() {
        let dir = TempDir::new().unwrap();
        let sink = JsonSink::new(dir.path().join("missing").join("out.json"));
        assert!(matches!(
            sink.write(&[record("A", "a.txt")]),
            Err(ExtractorError::Io(_))
        ));
    }
}
