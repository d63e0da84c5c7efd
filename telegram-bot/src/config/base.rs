//! Base config: Telegram Bot connection and delivery mode, logging, health port. Loaded from env.

use anyhow::{Context, Result};
use dbot_telegram::TelegramConfig;
use std::env;

/// Default health port; hosting platforms usually inject PORT.
pub const DEFAULT_PORT: u16 = 8080;

/// Base config: Telegram-related, logging and health endpoint only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN or TELEGRAM_BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// Health endpoint port (PORT)
    pub port: u16,
    /// WEBHOOK_URL, or `https://{RENDER_EXTERNAL_HOSTNAME}/webhook`; unset means long polling
    pub webhook_url: Option<String>,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN and `port` overrides PORT.
    pub fn load(token: Option<String>, port: Option<u16>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN")
                .or_else(|_| env::var("TELEGRAM_BOT_TOKEN"))
                .context("BOT_TOKEN (or TELEGRAM_BOT_TOKEN) not set")?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/gemini-bot.log".to_string());
        let port = match port {
            Some(p) => p,
            None => match env::var("PORT") {
                Ok(s) => s
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT is not a valid port number: {}", s))?,
                Err(_) => DEFAULT_PORT,
            },
        };

        let webhook_url = non_empty_var("WEBHOOK_URL").or_else(|| {
            non_empty_var("RENDER_EXTERNAL_HOSTNAME")
                .map(|host| format!("https://{}/webhook", host.trim()))
        });

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            port,
            webhook_url,
        })
    }

    /// Telegram connection settings for dbot-telegram.
    pub fn telegram(&self) -> TelegramConfig {
        TelegramConfig::with_token(self.bot_token.clone())
            .with_api_url(self.telegram_api_url.clone())
            .with_webhook_url(self.webhook_url.clone())
    }

    /// Validate config (non-empty token; API and webhook URLs must be valid if set).
    pub fn validate(&self) -> Result<()> {
        self.telegram().validate()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
