//! # Gemini Telegram bot application
//!
//! Wires dbot-telegram, handler-chain, llm-client and llm-handlers. Loads config from env, serves
//! the health endpoint and receives Telegram updates (long polling or webhook) until a termination
//! signal arrives.

pub mod cli;
pub mod components;
pub mod config;
pub mod health;
pub mod runner;

pub use cli::{handle_ask, load_config, Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::{BaseConfig, BotConfig};
pub use health::{health_router, serve_http, HEALTH_BODY};
pub use runner::{run_bot, run_until, shutdown_signal, TelegramBot, SHUTDOWN_GRACE};

pub use dbot_core::{
    Bot, Chat, DbotError, Handler, HandlerResponse, Message, ReplyFormat, User,
};
pub use handler_chain::HandlerChain;
pub use llm_handlers::{MessageRelay, FALLBACK_REPLY};
