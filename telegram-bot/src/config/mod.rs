//! Bot configuration: BaseConfig (Telegram + log + health port) + LLM config from llm-client.

mod base;
mod bot_config;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
