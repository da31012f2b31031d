use thiserror::Error;

pub const PROCESS_FIRST_MESSAGE: &str =
    "Please upload and process PDF files first before asking questions.";

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Extraction failed for {document}: {reason}")]
    Extraction { document: String, reason: String },

    #[error("{0}")]
    Precondition(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn extraction(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            document: document.into(),
            reason: reason.into(),
        }
    }

    pub fn process_first() -> Self {
        Self::Precondition(PROCESS_FIRST_MESSAGE.to_string())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Generation(format!("timed out: {}", msg.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
