//! OpenAI-compatible chat-completions client.
//!
//! One prompt in, one completion out: the narrow interface the pipeline
//! steps need. The client speaks the `/chat/completions` wire format used by
//! Groq, OpenAI, and most self-hosted gateways, so the provider is just a
//! matter of [`LlmConfig`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{LlmError, Result};

/// Text-generation collaborator: renders one prompt into one completion.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt` at the given sampling temperature.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;
}

/// Chat-completions client for Groq (or any OpenAI-compatible endpoint).
#[derive(Clone)]
pub struct GroqClient {
    config: LlmConfig,
    client: Client,
}

impl GroqClient {
    /// Create a client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    async fn request(&self, prompt: &str, temperature: f32) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("completion had no content".to_string()))
    }
}

#[async_trait]
impl Generator for GroqClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            match self.request(prompt, temperature).await {
                Ok(content) => return Ok(content),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, "generation request failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
