use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// Sentence-transformer embeddings computed in-process.
///
/// The model is downloaded into the fastembed cache on first use. Inference is
/// CPU-bound, so calls run on the blocking pool. `TextEmbedding::embed` takes
/// `&mut self`, hence the mutex.
pub struct LocalEmbedding {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl LocalEmbedding {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, DomainError> {
        let model = resolve_model(&config.model)?;

        let mut options =
            InitOptions::new(model).with_show_download_progress(config.show_download_progress);
        if let Some(dir) = &config.cache_dir {
            options = options.with_cache_dir(dir.clone());
        }

        let embedding = TextEmbedding::try_new(options).map_err(|e| {
            DomainError::configuration(format!("failed to load {}: {e}", config.model))
        })?;
        info!(model = %config.model, dimension = config.dimension, "embedding model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: config.model.clone(),
            dimension: config.dimension,
        })
    }

    async fn run(&self, texts: Vec<String>) -> Result<Vec<Embedding>, DomainError> {
        let model = Arc::clone(&self.model);

        let vectors = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| DomainError::internal(e.to_string()))?;
            model
                .embed(texts, None)
                .map_err(|e| DomainError::generation(format!("embedding failed: {e}")))
        })
        .await
        .map_err(|e| DomainError::internal(e.to_string()))??;

        Ok(vectors.into_iter().map(Embedding::new).collect())
    }
}

fn resolve_model(name: &str) -> Result<EmbeddingModel, DomainError> {
    let short = name.strip_prefix("sentence-transformers/").unwrap_or(name);
    match short {
        "all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        other => Err(DomainError::configuration(format!(
            "unsupported embedding model: {other}"
        ))),
    }
}

#[async_trait]
impl EmbeddingService for LocalEmbedding {
    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.run(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::generation("No embedding returned"))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self
            .run(texts.iter().map(|t| t.to_string()).collect())
            .await?;
        if embeddings.len() != texts.len() {
            return Err(DomainError::generation(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
