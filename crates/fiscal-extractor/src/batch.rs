//! Batch orchestration over an input directory

use crate::extractor::RecordExtractor;
use crate::text::TextExtractor;
use crate::types::{BatchReport, ExhaustionCause, ExtractionOutcome, SkipReason, SkippedFile};
use fiscal_domain::traits::LlmProvider;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Drives text extraction and record extraction over every file in a directory
///
/// Files are processed one at a time in directory listing order; one file is
/// finished before the next is read.
pub struct BatchRunner<L>
where
    L: LlmProvider,
{
    extractor: RecordExtractor<L>,
    text_extractor: TextExtractor,
}

impl<L> BatchRunner<L>
where
    L: LlmProvider,
{
    /// Create a new runner around a record extractor
    pub fn new(extractor: RecordExtractor<L>) -> Self {
        Self {
            extractor,
            text_extractor: TextExtractor::new(),
        }
    }

    /// The record extractor used for each file
    pub fn extractor(&self) -> &RecordExtractor<L> {
        &self.extractor
    }

    /// Process every regular file in `input_dir`
    ///
    /// Never fails: a missing directory is reported through
    /// `BatchReport::directory_error` with an empty batch, and per-file
    /// problems become `BatchReport::skipped` entries.
    pub async fn run(&self, input_dir: impl AsRef<Path>) -> BatchReport {
        let input_dir = input_dir.as_ref();
        let mut report = BatchReport::new(input_dir);

        let entries = match fs::read_dir(input_dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Input directory {} not found: {}", input_dir.display(), e);
                report.directory_error = Some(format!("{}: {}", input_dir.display(), e));
                return report;
            }
        };

        info!("Scanning {}", input_dir.display());

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            report.files_seen += 1;
            info!("Processing: {}", file_name);

            let document = self.text_extractor.extract(&path);
            if document.is_empty() {
                warn!("{} was empty or could not be read", file_name);
                report.skipped.push(SkippedFile {
                    file_name,
                    reason: SkipReason::EmptyText,
                });
                continue;
            }

            let outcome = self.extractor.extract_record(&document.text).await;
            let attempts = outcome.attempts();
            let cause = outcome.exhaustion_cause();

            match outcome {
                ExtractionOutcome::Extracted { record, .. } => {
                    info!("Extraction succeeded for {}", file_name);
                    report.records.push(record.with_source(file_name));
                }
                ExtractionOutcome::Skipped => {
                    report.skipped.push(SkippedFile {
                        file_name,
                        reason: SkipReason::EmptyText,
                    });
                }
                ExtractionOutcome::Exhausted { .. } => {
                    warn!("No record extracted from {}", file_name);
                    report.skipped.push(SkippedFile {
                        file_name,
                        reason: SkipReason::ExtractionFailed {
                            cause: cause.unwrap_or(ExhaustionCause::Mixed),
                            attempts,
                        },
                    });
                }
            }
        }

        info!(
            "Batch complete: {} files, {} records, {} skipped",
            report.files_seen,
            report.records.len(),
            report.skipped.len()
        );

        report
    }
}
