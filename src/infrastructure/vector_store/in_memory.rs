use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::{
    ports::{VectorStore, VectorStoreFactory},
    DocumentChunk, DomainError, Embedding, SearchResult,
};

#[derive(Default)]
struct Entries {
    items: Vec<(DocumentChunk, Embedding)>,
    positions: HashMap<Uuid, usize>,
}

/// Brute-force cosine-similarity store. Results are ordered by score, with
/// insertion order breaking ties.
#[derive(Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Entries>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(
        &self,
        chunk: &DocumentChunk,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        if let Some((_, existing)) = entries.items.first() {
            if existing.dimension() != embedding.dimension() {
                return Err(DomainError::internal(format!(
                    "embedding dimension {} does not match store dimension {}",
                    embedding.dimension(),
                    existing.dimension()
                )));
            }
        }

        let entry = (chunk.clone(), embedding.clone());
        match entries.positions.get(&chunk.id).copied() {
            Some(position) => entries.items[position] = entry,
            None => {
                let position = entries.items.len();
                entries.items.push(entry);
                entries.positions.insert(chunk.id, position);
            }
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut results: Vec<SearchResult> = entries
            .items
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryStoreFactory;

impl VectorStoreFactory for InMemoryStoreFactory {
    fn create(&self) -> Arc<dyn VectorStore> {
        Arc::new(InMemoryVectorStore::new())
    }
}
