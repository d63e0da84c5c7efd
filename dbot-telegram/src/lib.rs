//! # dbot-telegram
//!
//! Telegram side of the bot: adapters to core types, [`dbot_core::Bot`] implementation, minimal
//! config, and the update dispatcher (long polling or webhook). No LLM logic lives here.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::{dispatch_message, run_polling, setup_webhook};
