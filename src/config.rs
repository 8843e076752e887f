use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub document: DocumentConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentConfig {
    /// Path to the reference document (PDF, Markdown, or plain text).
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    800
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Minimum query-term length (shorter tokens are dropped during
    /// normalization; this is what filters out "is", "the", and friends).
    #[serde(default = "default_min_term_len")]
    pub min_term_len: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_term_len: default_min_term_len(),
        }
    }
}

fn default_top_k() -> usize {
    3
}
fn default_min_term_len() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model or deployment name sent in the request body.
    pub model: String,
    /// Environment variable holding the API key. Leave the variable unset
    /// for endpoints that do not require authentication.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_temperature() -> f64 {
    1.0
}
fn default_top_p() -> f64 {
    1.0
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Maximum transcript turns kept per session. `0` means unbounded,
    /// which matches the reference behavior; when set, oldest turns are
    /// dropped in whole user/assistant pairs.
    #[serde(default)]
    pub max_turns: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_turns: 0,
        }
    }
}

fn default_system_prompt() -> String {
    "You are a friendly and helpful assistant. You should remember and \
     reference information from the conversation history, especially \
     people's names and preferences. Be engaging and personable."
        .to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3001".to_string()
}

impl Config {
    /// Minimal in-memory config for tests and tooling that never touches
    /// the model endpoint.
    pub fn minimal(document_path: impl Into<PathBuf>) -> Self {
        Self {
            document: DocumentConfig {
                path: document_path.into(),
            },
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            model: ModelConfig {
                base_url: "http://127.0.0.1:0/v1".to_string(),
                model: "test-model".to_string(),
                api_key_env: default_api_key_env(),
                temperature: default_temperature(),
                top_p: default_top_p(),
                max_tokens: default_max_tokens(),
                timeout_secs: default_timeout_secs(),
            },
            chat: ChatConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.chunking.max_chars == 0 {
        anyhow::bail!("chunking.max_chars must be > 0");
    }

    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    if config.retrieval.min_term_len < 1 {
        anyhow::bail!("retrieval.min_term_len must be >= 1");
    }

    if config.model.base_url.trim().is_empty() {
        anyhow::bail!("model.base_url must not be empty");
    }

    if config.model.model.trim().is_empty() {
        anyhow::bail!("model.model must not be empty");
    }

    if !(0.0..=2.0).contains(&config.model.temperature) {
        anyhow::bail!("model.temperature must be in [0.0, 2.0]");
    }

    if !(0.0..=1.0).contains(&config.model.top_p) {
        anyhow::bail!("model.top_p must be in [0.0, 1.0]");
    }

    Ok(config)
}
