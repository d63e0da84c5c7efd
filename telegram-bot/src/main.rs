//! Binary for the Gemini relay bot.

use anyhow::Result;
use clap::Parser;
use gemini_telegram_bot::{handle_ask, load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, port } => {
            let config = load_config(token, port)?;
            run_bot(config).await
        }
        Commands::Ask { text } => handle_ask(text).await,
    }
}
