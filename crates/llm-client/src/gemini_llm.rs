//! [`LlmClient`] backed by [`gemini_client::GeminiClient`].

use async_trait::async_trait;
use gemini_client::{GeminiClient, UpstreamFailure};
use tracing::instrument;

use super::{LlmClient, LlmConfig};

/// Gemini implementation of [`LlmClient`].
#[derive(Clone)]
pub struct GeminiLlmClient {
    client: GeminiClient,
}

impl GeminiLlmClient {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Builds the underlying client from key, base URL and model in `config`.
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        let client = GeminiClient::with_base_url(config.api_key(), config.base_url())
            .with_model(config.model());
        Self { client }
    }
}

#[async_trait]
impl LlmClient for GeminiLlmClient {
    #[instrument(skip(self, text), fields(model = %self.client.model()))]
    async fn generate(&self, text: &str) -> Result<String, UpstreamFailure> {
        self.client.generate_content(text).await
    }
}
