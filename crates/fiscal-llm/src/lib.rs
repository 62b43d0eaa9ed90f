//! Fiscal LLM Provider Layer
//!
//! Pluggable generative model backends behind the `LlmProvider` trait from
//! `fiscal-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scripted mock for testing
//! - `GeminiProvider`: Google Gemini `generateContent` with a response schema
//!
//! # Examples
//!
//! ```
//! use fiscal_llm::MockProvider;
//! use fiscal_domain::traits::LlmProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;

use async_trait::async_trait;
use fiscal_domain::traits::LlmProvider as LlmProviderTrait;
use fiscal_domain::ExtractionSchema;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// No API key was provided
    #[error("Missing API key")]
    MissingApiKey,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One scripted reply of a `MockProvider`
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this text
    Text(String),
    /// Fail with `LlmError::Other`
    Error(String),
    /// Wait for the duration, then return the text
    Delayed(Duration, String),
}

/// Mock LLM provider for deterministic testing
///
/// Replies are taken from a script, one per call, in order. When the script
/// is exhausted the default response is returned. No network calls are made.
/// The provider also tracks how many calls are in flight at once, so tests
/// can check that callers never overlap them.
///
/// # Examples
///
/// ```
/// use fiscal_llm::{MockProvider, MockResponse};
/// use fiscal_domain::traits::LlmProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").await.unwrap(), "Fixed response");
///
/// // Scripted replies, then the default
/// let provider = MockProvider::new("{}")
///     .then_text("not json")
///     .then_error("upstream 503");
/// assert_eq!(provider.generate("p").await.unwrap(), "not json");
/// assert!(provider.generate("p").await.is_err());
/// assert_eq!(provider.generate("p").await.unwrap(), "{}");
/// assert_eq!(provider.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    call_count: Arc<Mutex<usize>>,
    last_prompt: Arc<Mutex<Option<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue a scripted reply
    pub fn push(&self, response: MockResponse) {
        self.script.lock().unwrap().push_back(response);
    }

    /// Queue a text reply (builder form)
    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.push(MockResponse::Text(text.into()));
        self
    }

    /// Queue an error reply (builder form)
    pub fn then_error(self, message: impl Into<String>) -> Self {
        self.push(MockResponse::Error(message.into()));
        self
    }

    /// Queue a delayed text reply (builder form)
    pub fn then_delayed(self, delay: Duration, text: impl Into<String>) -> Self {
        self.push(MockResponse::Delayed(delay, text.into()));
        self
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    /// The prompt of the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    /// Calls currently running (started and neither finished nor dropped)
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of calls ever running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn next_reply(&self, prompt: &str) -> Result<String, LlmError> {
        let _guard = InFlightGuard::enter(&self.in_flight, &self.max_in_flight);

        *self.call_count.lock().unwrap() += 1;
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(MockResponse::Text(text)) => Ok(text),
            Some(MockResponse::Error(message)) => Err(LlmError::Other(message)),
            Some(MockResponse::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Ok(self.default_response.clone()),
        }
    }
}

/// Counts a call as running until it completes or its future is dropped
struct InFlightGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> InFlightGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize, max_in_flight: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.next_reply(prompt).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _schema: &ExtractionSchema,
    ) -> Result<String, Self::Error> {
        // The mock does not enforce the schema; that is the point of scripting it
        self.next_reply(prompt).await
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_script_order() {
        let provider = MockProvider::default()
            .then_text("first")
            .then_text("second");

        assert_eq!(provider.generate("a").await.unwrap(), "first");
        assert_eq!(provider.generate("b").await.unwrap(), "second");
        assert_eq!(provider.generate("c").await.unwrap(), "Default mock response");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").await.unwrap();
        assert_eq!(provider.call_count(), 1);

        provider
            .generate_structured("prompt2", &ExtractionSchema::get())
            .await
            .unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let provider = MockProvider::default().then_error("boom");

        let result = provider.generate("bad prompt").await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[tokio::test]
    async fn test_mock_provider_records_prompt() {
        let provider = MockProvider::new("ok");
        assert!(provider.last_prompt().is_none());

        provider.generate("remember me").await.unwrap();
        assert_eq!(provider.last_prompt().as_deref(), Some("remember me"));
    }

    #[tokio::test]
    async fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").await.unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test]
    async fn test_dropped_call_leaves_flight() {
        let provider = MockProvider::default().then_delayed(Duration::from_secs(5), "late");

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            provider.generate("slow"),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(provider.in_flight(), 0);
        assert_eq!(provider.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_counted() {
        let provider = MockProvider::default()
            .then_delayed(Duration::from_millis(30), "a")
            .then_delayed(Duration::from_millis(30), "b");

        let (a, b) = tokio::join!(provider.generate("1"), provider.generate("2"));
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(provider.max_in_flight(), 2);
        assert_eq!(provider.in_flight(), 0);
    }
}
