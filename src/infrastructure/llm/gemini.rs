use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::gemini;
use std::time::Duration;
use tracing::instrument;

use crate::domain::{
    ports::{Completion, LlmService},
    DomainError,
};
use crate::infrastructure::config::LlmConfig;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Hosted Gemini chat completion through rig.
pub struct GeminiLlm {
    client: gemini::Client,
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl GeminiLlm {
    /// Reads the API key from `GEMINI_API_KEY`.
    pub fn from_config(config: &LlmConfig) -> Result<Self, DomainError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            DomainError::configuration(format!("{API_KEY_ENV} must be set to answer questions"))
        })?;
        Self::with_api_key(config, &api_key)
    }

    pub fn with_api_key(config: &LlmConfig, api_key: &str) -> Result<Self, DomainError> {
        let mut builder = gemini::Client::builder().api_key(api_key);
        if let Some(base_url) = &config.base_url {
            builder = builder.base_url(base_url);
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::configuration(format!("Gemini client: {e}")))?;

        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    async fn run(&self, system: Option<&str>, prompt: &str) -> Result<Completion, DomainError> {
        let mut builder = self
            .client
            .agent(&self.model)
            .temperature(self.temperature);
        if let Some(system) = system {
            builder = builder.preamble(system);
        }
        let agent = builder.build();

        let text = tokio::time::timeout(self.timeout, agent.prompt(prompt))
            .await
            .map_err(|_| DomainError::timeout("Gemini completion"))?
            .map_err(|e| DomainError::generation(format!("Gemini request failed: {e}")))?;

        Completion::from_response(&self.model, text)
    }
}

#[async_trait]
impl LlmService for GeminiLlm {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<Completion, DomainError> {
        self.run(None, prompt).await
    }

    #[instrument(skip(self, system, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<Completion, DomainError> {
        self.run(Some(system), prompt).await
    }
}
