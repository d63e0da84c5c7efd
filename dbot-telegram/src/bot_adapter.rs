//! Wraps teloxide::Bot and implements [`dbot_core::Bot`].

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, Chat, DbotError, ReplyFormat, Result};
use teloxide::{prelude::*, types::ChatId, types::ParseMode};

/// Thin wrapper around teloxide::Bot that implements dbot-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str, format: ReplyFormat) -> Result<()> {
        let request = self.bot.send_message(ChatId(chat.id), text.to_string());
        let request = match format {
            // Legacy Markdown matches what Gemini emits (`*bold*`, `` `code` ``) better than V2.
            #[allow(deprecated)]
            ReplyFormat::Markdown => request.parse_mode(ParseMode::Markdown),
            ReplyFormat::Plain => request,
        };
        request.await.map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const TOKEN: &str = "123456:test_token";

    fn sent_message_body() -> String {
        json!({
            "ok": true,
            "result": {
                "message_id": 2,
                "date": 1706529600,
                "chat": {"id": 456, "type": "private", "first_name": "User"},
                "from": {"id": 1, "is_bot": true, "first_name": "GeminiBot", "username": "gemini_bot"},
                "text": "Hi there!"
            }
        })
        .to_string()
    }

    fn adapter_for(server: &mockito::ServerGuard) -> TelegramBotAdapter {
        let url = reqwest::Url::parse(&server.url()).unwrap();
        TelegramBotAdapter::new(teloxide::Bot::new(TOKEN).set_api_url(url))
    }

    fn chat() -> Chat {
        Chat {
            id: 456,
            chat_type: "private".to_string(),
        }
    }

    /// **Test: Markdown replies carry parse_mode=Markdown.**
    #[tokio::test]
    async fn test_send_markdown_sets_parse_mode() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
            .match_body(Matcher::PartialJson(json!({
                "chat_id": 456,
                "text": "Hi there!",
                "parse_mode": "Markdown"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(sent_message_body())
            .create_async()
            .await;

        adapter_for(&server)
            .send_message(&chat(), "Hi there!", ReplyFormat::Markdown)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    /// **Test: Plain replies carry no parse_mode.**
    #[tokio::test]
    async fn test_send_plain_has_no_parse_mode() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
            .match_request(|request| {
                let body: serde_json::Value =
                    serde_json::from_slice(request.body().unwrap()).unwrap();
                body.get("parse_mode").is_none() && body["text"] == "Error contacting Gemini API."
            })
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(sent_message_body())
            .create_async()
            .await;

        adapter_for(&server)
            .send_message(&chat(), "Error contacting Gemini API.", ReplyFormat::Plain)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    /// **Test: A Bot API error becomes DbotError::Bot.**
    #[tokio::test]
    async fn test_send_api_error_maps_to_bot_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ok":false,"error_code":400,"description":"Bad Request: can't parse entities: Can't find end of the entity starting at byte offset 11"}"#,
            )
            .create_async()
            .await;

        let err = adapter_for(&server)
            .send_message(&chat(), "unbalanced *markup", ReplyFormat::Markdown)
            .await
            .unwrap_err();

        assert!(matches!(err, DbotError::Bot(_)));
    }
}
