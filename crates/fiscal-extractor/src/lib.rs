//! Fiscal Extractor
//!
//! Turns a directory of heterogeneous documents into structured fiscal
//! records using a schema-constrained generative model.
//!
//! # Architecture
//!
//! ```text
//! file → TextExtractor → text → RecordExtractor → LLM → FiscalRecord
//!                                                          ↓
//!                         BatchRunner (adds archivo_origen) → JsonSink
//! ```
//!
//! # Key Features
//!
//! - **Format dispatch**: plain text, `.docx` and `.xlsx` chosen by extension
//! - **Lenient reading**: unreadable or unsupported files yield empty text
//! - **Schema-constrained calls**: every call carries the extraction schema
//! - **Bounded retries**: one shared budget for malformed output, provider
//!   errors and timeouts, with the reason of every failed attempt reported
//! - **Provenance**: the orchestrator tags each record with its file name
//!
//! # Example Usage
//!
//! ```no_run
//! use fiscal_extractor::{BatchRunner, ExtractorConfig, JsonSink, RecordExtractor};
//! use fiscal_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(
//!     r#"{"nombre_cliente":"Acme","monto":150.5,"fecha":"2024-03-01","tipo_solicitud":"Factura"}"#,
//! );
//! let extractor = RecordExtractor::new(llm, ExtractorConfig::default())?;
//! let runner = BatchRunner::new(extractor);
//!
//! let report = runner.run("mis_archivos_sucios").await;
//! println!("Extracted: {} records", report.records.len());
//!
//! JsonSink::new("resultado_final.json").write(&report.records)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod sink;
pub mod text;
mod types;


pub use batch::BatchRunner;
pub use config::ExtractorConfig;
pub use error::{ExtractorError, TextError};
pub use extractor::RecordExtractor;
pub use sink::{JsonSink, SinkOutcome};
pub use text::{extract_text, DocumentFormat, RawDocument, TextExtractor};
pub use types::{
    AttemptFailure, BatchReport, ExhaustionCause, ExtractionOutcome, FailureKind, SkipReason,
    SkippedFile,
};
