//! # Gemini API client
//!
//! Thin reqwest wrapper around `models/{model}:generateContent`: one text in, one text out.
//! Every failure of the call is reported as [`UpstreamFailure`]; the API key travels as the `key`
//! query parameter and is only ever logged through [`mask_token`].

use reqwest::StatusCode;
use thiserror::Error;

mod types;

pub use types::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part};

/// Public Gemini REST base.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The single failure kind of an outbound call. Variants only carry detail for the logs.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    /// Connect, timeout or body-read failure. The URL (and with it the key) is stripped.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response has no text at candidates[0].content.parts[0].text")]
    MissingText,
}

impl UpstreamFailure {
    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamFailure::Transport(_) => "transport",
            UpstreamFailure::Status { .. } => "status",
            UpstreamFailure::Decode(_) => "decode",
            UpstreamFailure::MissingText => "missing_text",
        }
    }
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(e: reqwest::Error) -> Self {
        UpstreamFailure::Transport(e.without_url())
    }
}

/// Masks an API key for safe logging: first 4 chars + `***` + last 4 chars.
/// Keys of 11 chars or fewer become `***`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Gemini `generateContent` client. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Client for the public endpoint and [`DEFAULT_MODEL`], using reqwest's default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Client with a custom base URL (proxies, mock servers).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::new(api_key)
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replaces the underlying HTTP client (e.g. one with a timeout in tests).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `{base_url}/models/{model}:generateContent`, without the key.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Sends `text` verbatim as a single-turn prompt and returns the first candidate's first text part.
    pub async fn generate_content(&self, text: &str) -> Result<String, UpstreamFailure> {
        tracing::debug!(
            model = %self.model,
            api_key = %mask_token(&self.api_key),
            text_len = text.len(),
            "Gemini generateContent request"
        );

        let request = GenerateContentRequest::from_text(text);
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = %status, body_len = body.len(), "Gemini generateContent response");

        if !status.is_success() {
            return Err(UpstreamFailure::Status { status, body });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        match parsed.reply_text() {
            Some(reply) if !reply.is_empty() => Ok(reply.to_string()),
            // Telegram refuses empty messages, so an empty part counts as no answer.
            _ => Err(UpstreamFailure::MissingText),
        }
    }
}
