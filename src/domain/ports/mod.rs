mod embedding;
mod extractor;
mod llm;
mod vector_store;

pub use embedding::EmbeddingService;
pub use extractor::TextExtractor;
pub use llm::{Completion, LlmService};
pub use vector_store::{VectorStore, VectorStoreFactory};
