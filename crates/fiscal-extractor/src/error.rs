//! Error types for the Extractor

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model call did not complete within the configured timeout
    #[error("Extraction timeout")]
    Timeout,

    /// Response parsed as JSON but does not match the record shape
    #[error("Invalid record format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while writing results
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

/// Errors raised while reading a document's text
///
/// The lenient entry points swallow these and return empty text.
#[derive(Error, Debug)]
pub enum TextError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The word-processor container or its XML is malformed
    #[error("Invalid word document {path}: {reason}")]
    WordDocument {
        /// File being read
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// The workbook could not be opened or a sheet could not be read
    #[error("Invalid spreadsheet {path}: {reason}")]
    Spreadsheet {
        /// File being read
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// No reader exists for the extension
    #[error("Unsupported format: {0:?}")]
    Unsupported(String),
}
