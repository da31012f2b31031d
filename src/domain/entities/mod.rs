mod conversation;
mod document;
mod embedding;

pub use conversation::{Conversation, Message, MessageRole};
pub use document::{DocumentChunk, SearchResult, UploadedDocument};
pub use embedding::Embedding;
