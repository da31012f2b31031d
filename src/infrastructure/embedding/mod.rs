mod hashed;
mod local;

pub use hashed::HashedEmbedding;
pub use local::LocalEmbedding;

use std::sync::Arc;

use crate::domain::{ports::EmbeddingService, DomainError};
use crate::infrastructure::config::{EmbeddingConfig, EmbeddingProvider};

/// Builds the embedding backend named in the config.
pub fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingService>, DomainError> {
    Ok(match config.provider {
        EmbeddingProvider::Local => Arc::new(LocalEmbedding::from_config(config)?),
        EmbeddingProvider::Hashed => Arc::new(HashedEmbedding::new(config.dimension)),
    })
}
