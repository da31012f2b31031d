use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// A validated model answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub model: String,
}

impl Completion {
    /// Rejects blank responses as malformed.
    pub fn from_response(
        model: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let text = text.into();
        let model = model.into();
        if text.trim().is_empty() {
            return Err(DomainError::generation(format!(
                "model {model} returned an empty response"
            )));
        }
        Ok(Self {
            text: text.trim().to_string(),
            model,
        })
    }
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, DomainError>;
    async fn complete_with_system(&self, system: &str, prompt: &str)
        -> Result<Completion, DomainError>;
}
