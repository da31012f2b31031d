pub mod config;
pub mod embedding;
pub mod extraction;
pub mod llm;
pub mod vector_store;

pub use config::{AppConfig, Config, LlmConfig, PromptsConfig};
pub use embedding::{HashedEmbedding, LocalEmbedding};
pub use extraction::PdfTextExtractor;
pub use llm::GeminiLlm;
pub use vector_store::{InMemoryStoreFactory, InMemoryVectorStore};
