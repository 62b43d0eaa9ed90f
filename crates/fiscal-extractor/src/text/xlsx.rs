//! Spreadsheets (`.xlsx`)

use crate::error::TextError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Read every sheet, one line per row that has visible content
pub(crate) fn read_rows(path: &Path) -> Result<String, TextError> {
    let invalid = |reason: String| TextError::Spreadsheet {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| invalid(e.to_string()))?;

    let mut text = String::new();
    for sheet in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| invalid(format!("sheet '{}': {}", sheet, e)))?;

        for row in range.rows() {
            let line = join_row(row);
            if line.trim().is_empty() {
                continue;
            }
            text.push_str(&line);
            text.push('\n');
        }
    }

    Ok(text)
}

/// Join the non-empty cells of a row with single spaces
///
/// Date cells are written as `YYYY-MM-DD HH:MM:SS` rather than as their
/// serial number.
///
/// # Examples
///
/// ```
/// use calamine::Data;
/// use fiscal_extractor::text::join_row;
///
/// let row = [Data::String("Ana".into()), Data::Empty, Data::Float(100.0)];
/// assert_eq!(join_row(&row), "Ana 100");
/// ```
pub fn join_row(row: &[Data]) -> String {
    row.iter()
        .filter(|cell| !matches!(cell, Data::Empty))
        .map(cell_text)
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_else(|| dt.to_string()),
        Data::DateTimeIso(iso) => iso.replacen('T', " ", 1),
        // Durations and everything else keep calamine's rendering
        other => other.to_string(),
    }
}
