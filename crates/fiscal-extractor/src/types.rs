//! Outcome and report types for extraction

use fiscal_domain::{FiscalRecord, ResultBatch};
use std::fmt;
use std::path::PathBuf;

/// Why a single model call did not produce a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The response was not valid JSON, or not the record shape
    MalformedOutput,
    /// The provider returned an error (network, HTTP, API)
    Provider,
    /// The call exceeded the per-call timeout
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::MalformedOutput => f.write_str("malformed output"),
            FailureKind::Provider => f.write_str("provider error"),
            FailureKind::Timeout => f.write_str("timeout"),
        }
    }
}

/// One failed attempt within the retry loop
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    /// 1-based attempt number
    pub attempt: u32,

    /// Failure classification
    pub kind: FailureKind,

    /// Human-readable detail (parse error, provider message)
    pub detail: String,
}

/// What exhausted the retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionCause {
    /// Every attempt returned malformed output
    MalformedOutput,
    /// Every attempt failed at the provider
    Provider,
    /// Every attempt timed out
    Timeout,
    /// Attempts failed for different reasons
    Mixed,
}

impl fmt::Display for ExhaustionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustionCause::MalformedOutput => f.write_str("malformed output"),
            ExhaustionCause::Provider => f.write_str("provider errors"),
            ExhaustionCause::Timeout => f.write_str("timeouts"),
            ExhaustionCause::Mixed => f.write_str("mixed failures"),
        }
    }
}

/// Result of extracting a record from one text
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// The model produced a record
    Extracted {
        /// The parsed record (without provenance)
        record: FiscalRecord,
        /// Model calls made, including the successful one
        attempts: u32,
    },

    /// The text was empty; the model was not called
    Skipped,

    /// Every attempt failed
    Exhausted {
        /// One entry per attempt, in order
        failures: Vec<AttemptFailure>,
    },
}

impl ExtractionOutcome {
    /// Take the record, if one was extracted
    pub fn into_record(self) -> Option<FiscalRecord> {
        match self {
            ExtractionOutcome::Extracted { record, .. } => Some(record),
            _ => None,
        }
    }

    /// Number of model calls made
    pub fn attempts(&self) -> u32 {
        match self {
            ExtractionOutcome::Extracted { attempts, .. } => *attempts,
            ExtractionOutcome::Skipped => 0,
            ExtractionOutcome::Exhausted { failures } => failures.len() as u32,
        }
    }

    /// Classify why the budget ran out; `None` unless exhausted
    pub fn exhaustion_cause(&self) -> Option<ExhaustionCause> {
        let ExtractionOutcome::Exhausted { failures } = self else {
            return None;
        };

        let first = failures.first()?.kind;
        if failures.iter().any(|f| f.kind != first) {
            return Some(ExhaustionCause::Mixed);
        }
        Some(match first {
            FailureKind::MalformedOutput => ExhaustionCause::MalformedOutput,
            FailureKind::Provider => ExhaustionCause::Provider,
            FailureKind::Timeout => ExhaustionCause::Timeout,
        })
    }
}

/// Why a file contributed no record
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Unsupported, unreadable or empty document
    EmptyText,

    /// The model never produced a usable record
    ExtractionFailed {
        /// Dominant failure class
        cause: ExhaustionCause,
        /// Attempts spent
        attempts: u32,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyText => f.write_str("empty or unreadable"),
            SkipReason::ExtractionFailed { cause, attempts } => {
                write!(f, "no record after {} attempts ({})", attempts, cause)
            }
        }
    }
}

/// A file that was processed but produced no record
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    /// File name (not the full path)
    pub file_name: String,

    /// Why it was skipped
    pub reason: SkipReason,
}

/// Summary of one batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Directory that was scanned
    pub input_dir: PathBuf,

    /// Extracted records in listing order
    pub records: ResultBatch,

    /// Files that yielded nothing
    pub skipped: Vec<SkippedFile>,

    /// Regular files visited
    pub files_seen: usize,

    /// Set when the directory itself could not be listed
    pub directory_error: Option<String>,
}

impl BatchReport {
    /// Create an empty report for the given directory
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            records: Vec::new(),
            skipped: Vec::new(),
            files_seen: 0,
            directory_error: None,
        }
    }

    /// True when nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
