//! Fiscal Domain Layer
//!
//! Core data model shared by every crate in the workspace. It defines the
//! fixed extraction schema the model is constrained to, the typed record the
//! model output is parsed into, and the trait seam behind which generative
//! model backends live.
//!
//! ## Key Concepts
//!
//! - **FiscalRecord**: the four fields the model must populate
//! - **ExtractedRecord**: a record plus the provenance field `archivo_origen`
//! - **ResultBatch**: the ordered records collected during one run
//! - **ExtractionSchema**: the immutable response schema sent with every call
//!
//! ## Architecture
//!
//! Infrastructure (HTTP providers, SQLite, file parsing) lives in other
//! crates. This crate only depends on `serde` because records cross the
//! JSON boundary in both directions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use record::{ExtractedRecord, FiscalRecord, RequestType, ResultBatch};
pub use schema::ExtractionSchema;
