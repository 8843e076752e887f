//! Chat-completion endpoint client.
//!
//! Defines the [`ChatModel`] seam the orchestrator calls through, plus the
//! concrete [`OpenAiCompatModel`] that speaks the OpenAI `chat/completions`
//! wire format. Any endpoint accepting `{model, messages, temperature,
//! top_p, max_tokens}` and answering `{choices: [{message: {content}}]}`
//! works — OpenAI, Azure OpenAI, Ollama, llama.cpp, and friends.
//!
//! There is no retry policy: a failure surfaces once, immediately, and the
//! orchestrator converts it into a safe user-facing fallback.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::config::ModelConfig;
use crate::memory::ChatRole;

/// One message in the outbound wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A synchronous-in-spirit chat completion backend: one request in, one
/// reply out. Implemented by the real HTTP client and by scripted mocks
/// in tests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// HTTP client for OpenAI-compatible chat-completion endpoints.
pub struct OpenAiCompatModel {
    config: ModelConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatModel {
    /// Builds the client from configuration. The API key is resolved from
    /// the environment variable named in `config.api_key_env`; an absent
    /// variable means unauthenticated requests (fine for local endpoints).
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config: config.clone(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "top_p": self.config.top_p,
            "max_tokens": self.config.max_tokens,
        });

        let mut req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if !self.api_key.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("model endpoint unreachable: {}", url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("model endpoint returned {}: {}", status, text));
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .context("model endpoint returned malformed JSON")?;

        payload["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("model response contained no choices"))
    }
}
