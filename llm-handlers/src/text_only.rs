//! Gate that lets only plain text through; bot commands and non-text messages are dropped.

use async_trait::async_trait;
use dbot_core::{Handler, Message, Result};
use tracing::debug;

/// `before` returns false for non-text messages, empty text, and commands (`/start`, `/help@bot`, ...).
/// Commands are recognised by the transport (`message_type == "command"`), not by a leading `/`.
#[derive(Debug, Clone, Default)]
pub struct TextOnlyHandler;

impl TextOnlyHandler {
    pub fn new() -> Self {
        Self
    }

    /// True when the message should reach the relay.
    pub fn accepts(message: &Message) -> bool {
        message.is_text() && !message.content.is_empty()
    }
}

#[async_trait]
impl Handler for TextOnlyHandler {
    async fn before(&self, message: &Message) -> Result<bool> {
        let accepted = Self::accepts(message);
        if !accepted {
            debug!(
                chat_id = message.chat.id,
                message_type = %message.message_type,
                "Skipping non-text or command message"
            );
        }
        Ok(accepted)
    }
}
