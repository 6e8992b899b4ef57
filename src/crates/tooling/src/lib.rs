//! Research collaborators for the prospect pipeline.
//!
//! Everything here is thin I/O glue behind a trait seam, so the pipeline
//! steps can be tested against mocks and wired to the real services in the
//! binary:
//!
//! - [`SearchProvider`] / [`TavilyClient`]: web search snippets.
//! - [`PageFetcher`] / [`HttpPageFetcher`]: bounded plain-text page fetch
//!   (infallible by contract; failures come back as explanatory text).
//! - [`Embedder`] / [`HttpEmbedder`]: OpenAI-compatible embeddings.
//! - [`KnowledgeSearch`] / [`SqliteKnowledgeBase`]: the on-disk vector
//!   store of proof points, ranked by cosine similarity.

pub mod embeddings;
pub mod error;
pub mod fetch;
pub mod knowledge;
pub mod search;

pub use embeddings::{cosine_similarity, Embedder, HttpEmbedder};
pub use error::{Result, ToolError};
pub use fetch::{HttpPageFetcher, PageFetcher};
pub use knowledge::{KnowledgeDoc, KnowledgeSearch, SqliteKnowledgeBase};
pub use search::{SearchHit, SearchProvider, TavilyClient};
