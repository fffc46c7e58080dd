//! Generation adapter over an LLM provider client.

use crate::collaborators::GenerationClient;
use async_trait::async_trait;
use grounded_core::AppResult;
use grounded_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 1000;

/// [`GenerationClient`] backed by any [`LlmClient`].
#[derive(Clone)]
pub struct LlmGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmGenerator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationClient for LlmGenerator {
    fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = LlmRequest::new(prompt, self.model.as_str())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let response = self.client.complete(&request).await?;
        tracing::debug!(
            "Generated {} chars with {} ({} tokens)",
            response.content.len(),
            response.model,
            response.usage.total_tokens
        );

        Ok(response.content)
    }
}
