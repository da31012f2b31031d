//! Question answering over uploaded PDF documents.
//!
//! Documents are extracted, split into overlapping chunks, embedded with a
//! local sentence-transformer and searched by cosine similarity; the retrieved
//! passages are handed to a hosted LLM together with the conversation so far.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
