//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::schema::ExtractionSchema;
use async_trait::async_trait;

/// Trait for generative model operations
///
/// Implemented by the infrastructure layer (fiscal-llm). Dropping a returned
/// future abandons the call, so callers can bound it with a timeout without
/// leaving work running behind them.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::fmt::Display + Send;

    /// Generate free-form text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate JSON output constrained to the given schema
    ///
    /// The returned string is the raw response body text; it is expected,
    /// but not guaranteed, to parse as JSON matching the schema.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &ExtractionSchema,
    ) -> Result<String, Self::Error>;

    /// Name of the model behind this provider, for logs and reports
    fn model_name(&self) -> &str;
}
