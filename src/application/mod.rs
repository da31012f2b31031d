//! Application layer - Use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than concrete
//! implementations. `Session` is the entry point: it turns uploaded documents
//! into an index, answers questions against it and summarises what it holds.

pub mod services;

pub use services::{
    check_connection, transcript, Answer, AskReport, ChatFragment, ConnectionStatus,
    ConversationEngine, ConversationSettings, EmbeddingIndex, ProcessReport, Session,
    SessionServices, Summarizer, Summary, SummaryScope, SummarySettings,
};
