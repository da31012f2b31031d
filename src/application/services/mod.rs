pub mod connection;
mod conversation;
mod index;
mod session;
mod summary;
mod template;
pub mod transcript;

pub use connection::{check_connection, ConnectionStatus};
pub use conversation::{Answer, ConversationEngine, ConversationSettings};
pub use index::EmbeddingIndex;
pub use session::{AskReport, ProcessReport, Session, SessionServices};
pub use summary::{Summarizer, Summary, SummaryScope, SummarySettings};
pub use transcript::ChatFragment;
