//! Core record extractor: prompt, constrained call, parse, retry

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use crate::types::{AttemptFailure, ExtractionOutcome, FailureKind};
use fiscal_domain::traits::LlmProvider;
use fiscal_domain::{ExtractionSchema, FiscalRecord};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Extracts one fiscal record from a document's text
///
/// Holds the provider, the schema and the retry/timeout settings; all of it
/// is fixed at construction and shared by every call.
pub struct RecordExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    schema: ExtractionSchema,
    config: ExtractorConfig,
    call_timeout: Duration,
}

impl<L> RecordExtractor<L>
where
    L: LlmProvider,
{
    /// Create a new RecordExtractor
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Config` if the configuration is invalid.
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        Ok(Self {
            llm_provider,
            schema: ExtractionSchema::get(),
            call_timeout: config.call_timeout(),
            config,
        })
    }

    /// Override the per-call timeout with sub-second precision
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// The provider behind this extractor
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract a record from text
    ///
    /// Empty text returns `Skipped` without calling the model. Otherwise the
    /// model is called up to `max_retries` times; the first response that
    /// parses into a record wins.
    pub async fn extract_record(&self, text: &str) -> ExtractionOutcome {
        if text.trim().is_empty() {
            debug!("Empty text, skipping model call");
            return ExtractionOutcome::Skipped;
        }

        let prompt = PromptBuilder::new(text, self.schema).build();
        debug!("Prompt length: {} chars", prompt.len());

        let mut failures = Vec::new();

        for attempt in 1..=self.config.max_retries {
            match self.attempt(&prompt).await {
                Ok(record) => {
                    info!(
                        "Extracted record for '{}' on attempt {}",
                        record.nombre_cliente, attempt
                    );
                    return ExtractionOutcome::Extracted {
                        record,
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    let kind = failure_kind(&e);
                    warn!(
                        "Attempt {}/{} failed ({}): {}",
                        attempt, self.config.max_retries, kind, e
                    );
                    failures.push(AttemptFailure {
                        attempt,
                        kind,
                        detail: e.to_string(),
                    });
                }
            }
        }

        warn!(
            "Retries exhausted after {} attempts, no record extracted",
            failures.len()
        );
        ExtractionOutcome::Exhausted { failures }
    }

    /// Extract a record, discarding failure details
    pub async fn extract_record_opt(&self, text: &str) -> Option<FiscalRecord> {
        self.extract_record(text).await.into_record()
    }

    /// One model call plus parse
    async fn attempt(&self, prompt: &str) -> Result<FiscalRecord, ExtractorError> {
        let response = self.call_llm(prompt).await?;
        debug!("LLM response length: {} chars", response.len());
        parse_llm_response(&response)
    }

    /// Call the LLM provider under the per-call timeout
    ///
    /// On timeout the call's future is dropped, which abandons the request;
    /// the next attempt never overlaps it.
    async fn call_llm(&self, prompt: &str) -> Result<String, ExtractorError> {
        let call = self.llm_provider.generate_structured(prompt, &self.schema);

        timeout(self.call_timeout, call)
            .await
            .map_err(|_| ExtractorError::Timeout)?
            .map_err(|e| ExtractorError::Llm(e.to_string()))
    }
}

fn failure_kind(error: &ExtractorError) -> FailureKind {
    match error {
        ExtractorError::Timeout => FailureKind::Timeout,
        ExtractorError::JsonParse(_) | ExtractorError::InvalidFormat(_) => {
            FailureKind::MalformedOutput
        }
        _ => FailureKind::Provider,
    }
}
