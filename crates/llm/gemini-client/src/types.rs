//! Wire types for `models/{model}:generateContent`.
//!
//! Only the fields the relay uses are modelled. Unknown response fields are ignored and every
//! response field is optional, so a shape mismatch surfaces as a missing reply text rather than a
//! decode error whenever the body is still a JSON object.

use serde::{Deserialize, Serialize};

/// Request body: `{ "contents": [ { "parts": [ { "text": ... } ] } ] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single-turn request carrying `text` verbatim.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(text.into()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response body; the reply lives at `candidates[0].content.parts[0].text`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if present.
    pub fn reply_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}
