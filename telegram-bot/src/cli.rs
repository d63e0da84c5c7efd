//! CLI: run the bot, or send one prompt through the relay. Config from env and optional CLI args.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use llm_client::{EnvLlmConfig, GeminiLlmClient, LlmClient};
use llm_handlers::{IncomingMessage, MessageRelay};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "gemini-bot")]
#[command(about = "Telegram bot that relays messages to Gemini", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; flags override BOT_TOKEN and PORT).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Send one prompt to Gemini through the relay and print the reply.
    Ask {
        /// Prompt text, passed through unmodified.
        text: String,
    },
}

/// Loads bot config from env, with optional token and port overrides.
pub fn load_config(token: Option<String>, port: Option<u16>) -> Result<BotConfig> {
    BotConfig::load(token, port)
}

/// Handle the ask command. Prints exactly what a Telegram user would receive, fallback included.
pub async fn handle_ask(text: String) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .with_target(false)
        .init();

    let config = EnvLlmConfig::from_env().context("Load Gemini config from .env (GEMINI_API_KEY)")?;
    config.validate()?;

    let llm: Arc<dyn LlmClient> = Arc::new(GeminiLlmClient::from_config(&config));
    let relay = MessageRelay::new(llm);
    let reply = relay
        .relay(&IncomingMessage {
            conversation_id: 0,
            text,
        })
        .await;

    println!("{}", reply.text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from(["gemini-bot", "run", "--token", "123:abc", "--port", "9000"])
            .unwrap();
        match cli.command {
            Commands::Run { token, port } => {
                assert_eq!(token.as_deref(), Some("123:abc"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_run_without_flags() {
        let cli = Cli::try_parse_from(["gemini-bot", "run"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run {
                token: None,
                port: None
            }
        ));
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from(["gemini-bot", "ask", "Hello"]).unwrap();
        match cli.command {
            Commands::Ask { text } => assert_eq!(text, "Hello"),
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_port() {
        assert!(Cli::try_parse_from(["gemini-bot", "run", "--port", "70000"]).is_err());
    }
}
