//! Generation collaborator for the prospect pipeline.
//!
//! Exposes the [`Generator`] trait (one prompt in, one completion out)
//! together with a chat-completions client for Groq (or any other
//! OpenAI-compatible endpoint) and helpers for parsing structured JSON
//! answers into typed values.
//!
//! # Example
//!
//! ```rust,no_run
//! use llm::{Generator, GroqClient, LlmConfig};
//!
//! # async fn example() -> llm::Result<()> {
//! let config = LlmConfig::from_env("GROQ_API_KEY", llm::GROQ_BASE_URL, "llama-3.3-70b-versatile")?;
//! let client = GroqClient::new(config)?;
//!
//! let answer = client.generate("Name one ferrous metal.", 0.7).await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod structured;

pub use client::{Generator, GroqClient};
pub use config::{LlmConfig, GROQ_BASE_URL};
pub use error::{LlmError, Result};
pub use structured::{generate_structured, parse_structured};
