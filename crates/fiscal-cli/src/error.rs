//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key on the command line or in the environment
    #[error("Missing API key: pass --api-key or set {}", fiscal_llm::gemini::API_KEY_ENV)]
    MissingApiKey,

    /// Model provider could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] fiscal_llm::LlmError),

    /// Extraction pipeline error
    #[error("Extraction error: {0}")]
    Extractor(#[from] fiscal_extractor::ExtractorError),

    /// Database error
    #[error("Store error: {0}")]
    Store(#[from] fiscal_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
