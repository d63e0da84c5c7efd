//! BotConfig: BaseConfig + Gemini settings. Use load() for env-based loading.

use anyhow::Result;
use llm_client::{EnvLlmConfig, LlmConfig};

use super::BaseConfig;

/// Bot config built once at startup and passed into the component factory.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub llm: EnvLlmConfig,
}

impl BotConfig {
    /// Load full config from environment variables; `token` and `port` override the env values.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>, port: Option<u16>) -> Result<Self> {
        let base = BaseConfig::load(token, port)?;
        let llm = EnvLlmConfig::from_env()?;
        Ok(Self { base, llm })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.llm.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn llm(&self) -> &dyn LlmConfig {
        &self.llm
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
    pub fn webhook_url(&self) -> Option<&str> {
        self.base.webhook_url.as_deref()
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn port(&self) -> u16 {
        self.base.port
    }
    pub fn model(&self) -> &str {
        self.llm.model()
    }
}
