use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A file received from an upload. Lives only for the duration of processing.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub content: String,
    pub chunk_index: usize,
}

impl DocumentChunk {
    pub fn new(content: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            chunk_index,
        }
    }

    /// Wraps splitter output into indexed chunks, preserving order.
    pub fn from_texts(texts: Vec<String>) -> Vec<Self> {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, content)| Self::new(content, index))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}
