//! Minimal Telegram connection config: bot token, optional Bot API URL, optional webhook URL.

use anyhow::Result;

/// Telegram connection settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Custom Bot API base (local Bot API server, mock server in tests).
    pub telegram_api_url: Option<String>,
    /// Public URL Telegram posts updates to. `None` means long polling.
    pub webhook_url: Option<String>,
}

impl TelegramConfig {
    /// Config for the public Bot API.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            webhook_url: None,
        }
    }

    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        self.telegram_api_url = url;
        self
    }

    pub fn with_webhook_url(mut self, url: Option<String>) -> Self {
        self.webhook_url = url;
        self
    }

    /// Parsed webhook URL, if webhook delivery is configured.
    pub fn webhook_url(&self) -> Result<Option<reqwest::Url>> {
        self.webhook_url
            .as_deref()
            .map(|url_str| {
                reqwest::Url::parse(url_str).map_err(|e| {
                    anyhow::anyhow!("WEBHOOK_URL is not a valid URL: {}: {}", url_str, e)
                })
            })
            .transpose()
    }

    /// Rejects an empty token and an API or webhook URL that does not parse.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is set but empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        self.webhook_url()?;
        Ok(())
    }

    /// Builds the teloxide Bot, pointing it at the custom API URL when set.
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match self.telegram_api_url {
            Some(ref url_str) => {
                let url = reqwest::Url::parse(url_str)
                    .map_err(|e| anyhow::anyhow!("Invalid TELEGRAM_API_URL {}: {}", url_str, e))?;
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}
