//! Bot abstraction for sending replies.
//!
//! [`Bot`] is transport-agnostic; dbot-telegram implements it via teloxide, tests substitute a mock.

use crate::error::Result;
use crate::types::{Chat, Message, ReplyFormat};
use async_trait::async_trait;

/// Abstraction for sending messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat, rendered with `format`.
    async fn send_message(&self, chat: &Chat, text: &str, format: ReplyFormat) -> Result<()>;

    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str, format: ReplyFormat) -> Result<()> {
        self.send_message(&message.chat, text, format).await
    }
}
