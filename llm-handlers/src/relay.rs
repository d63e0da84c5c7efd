//! Message relay: one inbound text → one LLM call → one outgoing text.

use std::sync::Arc;

use dbot_core::{Message, ReplyFormat};
use llm_client::{LlmClient, UpstreamFailure};
use tracing::{debug, error, instrument};

/// Text sent to the user whenever the upstream call fails.
pub const FALLBACK_REPLY: &str = "Error contacting Gemini API.";

/// What the relay needs from an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Where the reply goes; never inspected by the relay.
    pub conversation_id: i64,
    pub text: String,
}

impl From<&Message> for IncomingMessage {
    fn from(message: &Message) -> Self {
        Self {
            conversation_id: message.chat.id,
            text: message.content.clone(),
        }
    }
}

/// The relay's single output. Answers are sent with markup, the fallback as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub format: ReplyFormat,
}

impl OutgoingMessage {
    pub fn answer(text: String) -> Self {
        Self {
            text,
            format: ReplyFormat::Markdown,
        }
    }

    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_REPLY.to_string(),
            format: ReplyFormat::Plain,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.format == ReplyFormat::Plain && self.text == FALLBACK_REPLY
    }
}

/// Stateless relay; clones share the LLM client.
#[derive(Clone)]
pub struct MessageRelay {
    llm: Arc<dyn LlmClient>,
}

impl MessageRelay {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Sends the text verbatim to the LLM and returns its answer unmodified, or the fallback.
    /// Never fails: every [`UpstreamFailure`] is logged once and absorbed here.
    #[instrument(skip(self, incoming), fields(conversation_id = incoming.conversation_id))]
    pub async fn relay(&self, incoming: &IncomingMessage) -> OutgoingMessage {
        debug!(
            conversation_id = incoming.conversation_id,
            text = %incoming.text,
            "User said"
        );

        match self.llm.generate(&incoming.text).await {
            Ok(reply) => OutgoingMessage::answer(reply),
            Err(failure) => {
                log_failure(incoming, &failure);
                OutgoingMessage::fallback()
            }
        }
    }
}

fn log_failure(incoming: &IncomingMessage, failure: &UpstreamFailure) {
    error!(
        conversation_id = incoming.conversation_id,
        text = %incoming.text,
        kind = failure.kind(),
        error = %failure,
        "Error contacting Gemini API"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and answers from a canned result.
    struct CannedLlm {
        prompts: Mutex<Vec<String>>,
        answer: fn() -> Result<String, UpstreamFailure>,
    }

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn generate(&self, text: &str) -> Result<String, UpstreamFailure> {
            self.prompts.lock().unwrap().push(text.to_string());
            (self.answer)()
        }
    }

    fn incoming(text: &str) -> IncomingMessage {
        IncomingMessage {
            conversation_id: 77,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_relay_passes_text_verbatim_and_returns_answer() {
        let llm = Arc::new(CannedLlm {
            prompts: Mutex::new(Vec::new()),
            answer: || Ok("*Hi* there!".to_string()),
        });
        let relay = MessageRelay::new(llm.clone());

        let out = relay.relay(&incoming("  Hello\n")).await;

        assert_eq!(out, OutgoingMessage::answer("*Hi* there!".to_string()));
        assert_eq!(*llm.prompts.lock().unwrap(), vec!["  Hello\n".to_string()]);
    }

    #[tokio::test]
    async fn test_relay_maps_missing_text_to_fallback() {
        let llm = Arc::new(CannedLlm {
            prompts: Mutex::new(Vec::new()),
            answer: || Err(UpstreamFailure::MissingText),
        });
        let relay = MessageRelay::new(llm);

        let out = relay.relay(&incoming("Hello")).await;

        assert!(out.is_fallback());
        assert_eq!(out.text, "Error contacting Gemini API.");
        assert_eq!(out.format, ReplyFormat::Plain);
    }

    #[test]
    fn test_incoming_from_core_message_uses_chat_id() {
        let message = Message {
            id: "5".to_string(),
            user: dbot_core::User {
                id: 1,
                username: None,
                first_name: None,
                last_name: None,
            },
            chat: dbot_core::Chat {
                id: -100123,
                chat_type: "group".to_string(),
            },
            content: "hey".to_string(),
            message_type: "text".to_string(),
            created_at: chrono::Utc::now(),
        };

        assert_eq!(
            IncomingMessage::from(&message),
            IncomingMessage {
                conversation_id: -100123,
                text: "hey".to_string()
            }
        );
    }
}
