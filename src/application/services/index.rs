use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    DocumentChunk, DomainError, SearchResult,
};

/// Semantic index over one processed batch of documents.
///
/// Built once from the full chunk set and never mutated afterwards; processing
/// new documents builds a new index.
pub struct EmbeddingIndex {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    chunk_count: usize,
}

impl EmbeddingIndex {
    /// Embeds every chunk into `vector_store`, which must be empty.
    ///
    /// An empty chunk set produces an empty index whose queries return nothing.
    #[instrument(skip_all, fields(chunks = chunks.len(), model = embedding.model_name()))]
    pub async fn build(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        chunks: &[DocumentChunk],
    ) -> Result<Self, DomainError> {
        if !chunks.is_empty() {
            let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
            let embeddings = embedding.embed_batch(&texts).await?;

            if embeddings.len() != chunks.len() {
                return Err(DomainError::generation(format!(
                    "embedding service returned {} vectors for {} chunks",
                    embeddings.len(),
                    chunks.len()
                )));
            }

            for (chunk, vector) in chunks.iter().zip(embeddings.iter()) {
                vector_store.upsert(chunk, vector).await?;
            }
        }

        info!(
            chunks = chunks.len(),
            dimension = embedding.dimension(),
            "index built"
        );
        Ok(Self {
            embedding,
            vector_store,
            chunk_count: chunks.len(),
        })
    }

    /// The `top_k` chunks nearest to `query`, nearest first.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn query(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.embedding.embed(query).await?;
        self.vector_store.search(&embedding, top_k).await
    }

    pub fn len(&self) -> usize {
        self.chunk_count
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_count == 0
    }
}
