//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and the Gemini implementation. Object-safe via `async_trait`,
//! so the relay holds an `Arc<dyn LlmClient>` and tests substitute their own implementation.

use async_trait::async_trait;

mod config;
mod gemini_llm;

pub use config::{EnvLlmConfig, LlmConfig};
pub use gemini_client::UpstreamFailure;
pub use gemini_llm::GeminiLlmClient;

/// Single-turn text generation: one prompt in, one reply text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model's reply for `text`. The prompt is passed through unmodified.
    async fn generate(&self, text: &str) -> Result<String, UpstreamFailure>;
}
