//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

/// LLM configuration interface for the Gemini API.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.gemini_api_key
    }
    fn base_url(&self) -> &str {
        &self.gemini_base_url
    }
    fn model(&self) -> &str {
        &self.gemini_model
    }
}

impl EnvLlmConfig {
    /// Load from GEMINI_API_KEY (required), GEMINI_BASE_URL and GEMINI_MODEL.
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY not set")?;
        let gemini_base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| gemini_client::DEFAULT_BASE_URL.to_string());
        let gemini_model = env::var("GEMINI_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| gemini_client::DEFAULT_MODEL.to_string());
        Ok(Self {
            gemini_api_key,
            gemini_base_url,
            gemini_model,
        })
    }

    /// Rejects an empty key and a base URL that does not parse.
    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.trim().is_empty() {
            anyhow::bail!("GEMINI_API_KEY is set but empty");
        }
        if reqwest::Url::parse(&self.gemini_base_url).is_err() {
            anyhow::bail!(
                "GEMINI_BASE_URL is not a valid URL: {}",
                self.gemini_base_url
            );
        }
        Ok(())
    }
}
