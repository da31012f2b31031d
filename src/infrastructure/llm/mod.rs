mod gemini;

pub use gemini::{GeminiLlm, API_KEY_ENV};

use std::sync::Arc;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::{LlmConfig, LlmProvider};

/// Builds the chat model named in the config.
pub fn from_config(config: &LlmConfig) -> Result<Arc<dyn LlmService>, DomainError> {
    Ok(match config.provider {
        LlmProvider::Gemini => Arc::new(GeminiLlm::from_config(config)?),
    })
}
