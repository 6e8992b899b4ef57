//! Error types for research collaborators.

use thiserror::Error;

/// Result type for tooling operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors from the search, fetch, embedding, and knowledge-store collaborators.
#[derive(Debug, Error)]
pub enum ToolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Knowledge-store database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedding provider returned an unusable response.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Search provider returned an unusable response.
    #[error("search error: {0}")]
    Search(String),
}
