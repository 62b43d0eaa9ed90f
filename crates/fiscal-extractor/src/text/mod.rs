//! Document text extraction
//!
//! The format is picked once from the file extension. Reading never aborts
//! a batch: `extract` and `extract_text` turn every failure into empty text
//! and log it, while `try_extract` surfaces the error.

pub(crate) mod docx;
pub(crate) mod xlsx;

use crate::error::TextError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

pub use xlsx::join_row;

/// The closed set of document kinds the extractor understands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// `.txt`, read verbatim
    PlainText,
    /// `.docx`, paragraphs joined by newlines
    WordDocument,
    /// `.xlsx`, one line per non-empty row
    Spreadsheet,
    /// Anything else; carries the lowercased extension
    Unsupported(String),
}

impl DocumentFormat {
    /// Pick the format from an extension (without the dot), case-insensitive
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.to_lowercase();
        match extension.as_str() {
            "txt" => DocumentFormat::PlainText,
            "docx" => DocumentFormat::WordDocument,
            "xlsx" => DocumentFormat::Spreadsheet,
            _ => DocumentFormat::Unsupported(extension),
        }
    }

    /// Pick the format from a path's extension
    pub fn from_path(path: &Path) -> Self {
        Self::from_extension(&extension_of(path))
    }

    /// Whether a reader exists for this format
    pub fn is_supported(&self) -> bool {
        !matches!(self, DocumentFormat::Unsupported(_))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::PlainText => f.write_str("plain text"),
            DocumentFormat::WordDocument => f.write_str("word document"),
            DocumentFormat::Spreadsheet => f.write_str("spreadsheet"),
            DocumentFormat::Unsupported(ext) if ext.is_empty() => f.write_str("no extension"),
            DocumentFormat::Unsupported(ext) => write!(f, ".{}", ext),
        }
    }
}

/// A document's text as read from disk
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Where the text came from
    pub path: PathBuf,

    /// Lowercased extension without the dot (empty if none)
    pub extension: String,

    /// Format the text was read as
    pub format: DocumentFormat,

    /// Trimmed text; empty when unreadable or unsupported
    pub text: String,
}

impl RawDocument {
    /// True when there is nothing to send to the model
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Reads documents into plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor
    pub fn new() -> Self {
        Self
    }

    /// Read a document, returning any failure
    ///
    /// # Errors
    ///
    /// `TextError::Unsupported` for unknown extensions, otherwise the
    /// format-specific read error.
    pub fn try_extract(&self, path: &Path) -> Result<RawDocument, TextError> {
        let extension = extension_of(path);
        let format = DocumentFormat::from_extension(&extension);

        let text = match &format {
            DocumentFormat::PlainText => fs::read_to_string(path).map_err(|source| TextError::Io {
                path: path.to_path_buf(),
                source,
            })?,
            DocumentFormat::WordDocument => docx::read_paragraphs(path)?,
            DocumentFormat::Spreadsheet => xlsx::read_rows(path)?,
            DocumentFormat::Unsupported(ext) => return Err(TextError::Unsupported(ext.clone())),
        };

        debug!("Read {} chars of {} from {}", text.len(), format, path.display());

        Ok(RawDocument {
            path: path.to_path_buf(),
            extension,
            format,
            text: text.trim().to_string(),
        })
    }

    /// Read a document, turning every failure into empty text
    pub fn extract(&self, path: &Path) -> RawDocument {
        match self.try_extract(path) {
            Ok(document) => document,
            Err(e) => {
                match &e {
                    TextError::Unsupported(_) => {
                        warn!("Unsupported format for {}: {}", path.display(), e)
                    }
                    _ => error!("Failed to read {}: {}", path.display(), e),
                }
                let extension = extension_of(path);
                RawDocument {
                    path: path.to_path_buf(),
                    format: DocumentFormat::from_extension(&extension),
                    extension,
                    text: String::new(),
                }
            }
        }
    }
}

/// Read a file's text; empty on unsupported formats and read failures
///
/// # Examples
///
/// ```
/// use fiscal_extractor::extract_text;
///
/// assert_eq!(extract_text("does/not/exist.txt"), "");
/// assert_eq!(extract_text("scan.pdf"), "");
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> String {
    TextExtractor::new().extract(path.as_ref()).text
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
