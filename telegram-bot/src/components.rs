//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use anyhow::Result;
use dbot_core::Bot as CoreBot;
use dbot_telegram::TelegramBotAdapter;
use handler_chain::HandlerChain;
use llm_client::{GeminiLlmClient, LlmClient};
use llm_handlers::{MessageRelay, RelayHandler, TextOnlyHandler};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::BotConfig;

/// Everything the runner needs; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    /// Used by the dispatcher to receive updates.
    pub teloxide_bot: teloxide::Bot,
    pub handler_chain: HandlerChain,
    /// `Some` selects webhook delivery; `None` selects long polling.
    pub webhook_url: Option<reqwest::Url>,
}

/// Builds the Telegram bot, the Gemini client, the relay and the handler chain.
/// `reply_bot_override` replaces the Telegram reply transport (integration tests).
#[instrument(skip(config, reply_bot_override))]
pub fn build_bot_components(
    config: &BotConfig,
    reply_bot_override: Option<Arc<dyn CoreBot>>,
) -> Result<BotComponents> {
    let telegram = config.base().telegram();
    let teloxide_bot = telegram.build_bot()?;
    if let Some(url) = config.telegram_api_url() {
        info!(url = %url, "Using custom Telegram API URL");
    }
    let webhook_url = telegram.webhook_url()?;
    match webhook_url {
        Some(ref url) => info!(url = %url, "Delivery mode: webhook"),
        None => info!("Delivery mode: long polling"),
    }

    let reply_bot: Arc<dyn CoreBot> = match reply_bot_override {
        Some(bot) => bot,
        None => Arc::new(TelegramBotAdapter::new(teloxide_bot.clone())),
    };

    let llm: Arc<dyn LlmClient> = Arc::new(GeminiLlmClient::from_config(config.llm()));
    info!(model = %config.model(), "Gemini client ready");

    let handler_chain = build_handler_chain(MessageRelay::new(llm), reply_bot);

    Ok(BotComponents {
        teloxide_bot,
        handler_chain,
        webhook_url,
    })
}

/// Chain order: TextOnlyHandler (drops commands and non-text) → RelayHandler.
pub fn build_handler_chain(relay: MessageRelay, reply_bot: Arc<dyn CoreBot>) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(TextOnlyHandler::new()))
        .add_handler(Arc::new(RelayHandler::new(relay, reply_bot)))
}
