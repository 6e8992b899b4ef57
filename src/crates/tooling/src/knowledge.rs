//! Vector knowledge store: proof points persisted to SQLite, ranked by
//! cosine similarity over injected embeddings.
//!
//! The store is created once (seeded with case studies) and read on every
//! run. Similarity search embeds the query, scans the stored vectors, and
//! returns the top-k matches. The corpus is a handful of case studies, so a
//! linear scan is the whole index.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::embeddings::{cosine_similarity, Embedder};
use crate::error::{Result, ToolError};

/// A document returned from the knowledge store.
#[derive(Debug, Clone)]
pub struct KnowledgeDoc {
    /// Document text.
    pub content: String,
    /// Cosine similarity against the query, in `[-1, 1]`.
    pub score: f32,
}

/// Knowledge-store collaborator: a query in, the top-k matching documents
/// out. May return fewer than `k` documents, including none.
#[async_trait]
pub trait KnowledgeSearch: Send + Sync {
    /// Return up to `k` documents most similar to `query`.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<KnowledgeDoc>>;
}

/// SQLite-backed vector store.
pub struct SqliteKnowledgeBase {
    pool: SqlitePool,
    embedder: Arc<dyn Embedder>,
}

impl SqliteKnowledgeBase {
    /// Open (or create) the store at `path`.
    pub async fn open(path: &Path, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::init(pool, embedder).await
    }

    /// Open an in-memory store (for tests).
    pub async fn in_memory(embedder: Arc<dyn Embedder>) -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::init(pool, embedder).await
    }

    async fn init(pool: SqlitePool, embedder: Arc<dyn Embedder>) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool, embedder })
    }

    /// Embed `content` and persist it.
    pub async fn insert(&self, content: &str) -> Result<()> {
        let vector = self.embed_one(content).await?;
        sqlx::query("INSERT INTO documents (content, embedding) VALUES (?1, ?2)")
            .bind(content)
            .bind(encode(&vector))
            .execute(&self.pool)
            .await?;
        tracing::debug!(chars = content.len(), "document stored");
        Ok(())
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let vectors = self.embedder.embed(&[text.to_string()]).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::Embedding("provider returned no vector".to_string()))
    }

    /// Number of stored documents.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl KnowledgeSearch for SqliteKnowledgeBase {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<KnowledgeDoc>> {
        let query_vec = self.embed_one(query).await?;

        let rows: Vec<(String, Vec<u8>)> =
            sqlx::query_as("SELECT content, embedding FROM documents")
                .fetch_all(&self.pool)
                .await?;

        let mut scored: Vec<KnowledgeDoc> = rows
            .into_iter()
            .map(|(content, blob)| {
                let score = cosine_similarity(&query_vec, &decode(&blob));
                KnowledgeDoc { content, score }
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        tracing::debug!(%query, hits = scored.len(), "knowledge search");
        Ok(scored)
    }
}

fn encode(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn decode(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic embedder keyed on which marker words appear in the text.
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    vec![
                        if t.contains("fintech") { 1.0 } else { 0.0 },
                        if t.contains("saas") { 1.0 } else { 0.0 },
                        if t.contains("health") { 1.0 } else { 0.0 },
                    ]
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    #[tokio::test]
    async fn search_ranks_by_similarity() {
        let kb = SqliteKnowledgeBase::in_memory(Arc::new(KeywordEmbedder))
            .await
            .unwrap();
        kb.insert("fintech automation story").await.unwrap();
        kb.insert("saas outreach story").await.unwrap();
        kb.insert("health records story").await.unwrap();
        assert_eq!(kb.count().await.unwrap(), 3);

        let hits = kb.search("a saas company", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].content.contains("saas"));
        assert!(hits[0].score > 0.9);
    }

    #[tokio::test]
    async fn search_on_empty_store_returns_nothing() {
        let kb = SqliteKnowledgeBase::in_memory(Arc::new(KeywordEmbedder))
            .await
            .unwrap();
        let hits = kb.search("anything fintech", 1).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge.db");

        let kb = SqliteKnowledgeBase::open(&path, Arc::new(KeywordEmbedder))
            .await
            .unwrap();
        kb.insert("fintech automation story").await.unwrap();
        drop(kb);

        let kb = SqliteKnowledgeBase::open(&path, Arc::new(KeywordEmbedder))
            .await
            .unwrap();
        assert_eq!(kb.count().await.unwrap(), 1);
    }
}
