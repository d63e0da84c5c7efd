//! Chain handler that runs the relay and sends its reply through the [`Bot`].

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerError, HandlerResponse, Message, ReplyFormat, Result};
use tracing::{debug, instrument, warn};

use crate::relay::{IncomingMessage, MessageRelay, OutgoingMessage, FALLBACK_REPLY};

/// Longest text Telegram accepts in one message.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Relays each message and always answers in the message's chat: with the reply, or with the
/// fallback when the reply cannot be delivered.
pub struct RelayHandler {
    relay: MessageRelay,
    bot: Arc<dyn Bot>,
}

impl RelayHandler {
    pub fn new(relay: MessageRelay, bot: Arc<dyn Bot>) -> Self {
        Self { relay, bot }
    }

    /// Sends the reply, split into chunks of at most [`MAX_MESSAGE_CHARS`]. If any chunk cannot be
    /// delivered, the plain fallback is sent instead. Returns the text the user ends up with.
    async fn deliver(&self, message: &Message, outgoing: &OutgoingMessage) -> Result<String> {
        for chunk in split_reply(&outgoing.text, MAX_MESSAGE_CHARS) {
            if let Err(e) = self.send_chunk(message, chunk, outgoing.format).await {
                if outgoing.is_fallback() {
                    return Err(HandlerError::Delivery(e.to_string()).into());
                }
                warn!(
                    chat_id = message.chat.id,
                    error = %e,
                    "Reply not delivered, sending fallback"
                );
                self.bot
                    .reply_to(message, FALLBACK_REPLY, ReplyFormat::Plain)
                    .await
                    .map_err(|e| HandlerError::Delivery(e.to_string()))?;
                return Ok(FALLBACK_REPLY.to_string());
            }
        }
        Ok(outgoing.text.clone())
    }

    /// A Markdown send the transport rejects (usually unbalanced markup in the model output) is
    /// sent once more as plain text.
    async fn send_chunk(&self, message: &Message, text: &str, format: ReplyFormat) -> Result<()> {
        match self.bot.reply_to(message, text, format).await {
            Err(e) if format == ReplyFormat::Markdown => {
                warn!(
                    chat_id = message.chat.id,
                    error = %e,
                    "Markdown reply rejected, resending as plain text"
                );
                self.bot.reply_to(message, text, ReplyFormat::Plain).await
            }
            other => other,
        }
    }
}

/// Splits `text` into pieces of at most `limit` chars, cutting after the last newline inside the
/// window when there is one.
pub fn split_reply(text: &str, limit: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while rest.chars().count() > limit {
        let hard = rest
            .char_indices()
            .nth(limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let cut = match rest[..hard].rfind('\n') {
            Some(i) if i > 0 => i + 1,
            _ => hard,
        };
        chunks.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest);
    }
    chunks
}

#[async_trait]
impl Handler for RelayHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let incoming = IncomingMessage::from(message);
        let outgoing = self.relay.relay(&incoming).await;

        let delivered = self.deliver(message, &outgoing).await?;
        debug!(
            chat_id = message.chat.id,
            reply_len = delivered.len(),
            fallback = delivered == FALLBACK_REPLY,
            "Reply sent"
        );

        Ok(HandlerResponse::Reply(delivered))
    }
}
