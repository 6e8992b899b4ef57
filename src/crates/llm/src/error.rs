//! Error types for the generation collaborator.

use thiserror::Error;

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when calling the generation service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API key not found in the environment.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// The provider answered with something other than a usable completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A structured response could not be parsed into the requested shape.
    #[error("structured output parse failed: {0}")]
    Parse(String),
}

impl LlmError {
    /// Whether a retry against the same endpoint could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Http(_))
    }
}
