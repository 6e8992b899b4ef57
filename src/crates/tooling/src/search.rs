//! Web search collaborator (Tavily).

use async_trait::async_trait;
use serde_json::json;

use crate::error::{Result, ToolError};

/// One search result snippet.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Result title, possibly empty.
    pub title: String,
    /// Source URL, possibly empty.
    pub url: String,
    /// Text snippet extracted from the source.
    pub content: String,
}

/// Web search collaborator: a query in, ranked text snippets out.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run `query` and return up to `max_results` snippets.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// Tavily search API client.
pub struct TavilyClient {
    api_key: String,
    http: reqwest::Client,
}

impl TavilyClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        tracing::debug!(%query, max_results, "searching the web");

        let response = self
            .http
            .post("https://api.tavily.com/search")
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": max_results,
            }))
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        let results = body["results"]
            .as_array()
            .ok_or_else(|| ToolError::Search("response had no results array".to_string()))?;

        Ok(results
            .iter()
            .map(|r| SearchHit {
                title: r["title"].as_str().unwrap_or("").to_string(),
                url: r["url"].as_str().unwrap_or("").to_string(),
                content: r["content"].as_str().unwrap_or("").to_string(),
            })
            .collect())
    }
}
