//! Character-based text splitting for embedding.
//!
//! Text is split on a separator, then pieces are merged back into chunks of at
//! most `chunk_size` characters. Neighbouring chunks share up to
//! `chunk_overlap` characters so context survives the boundary. A piece that is
//! longer than `chunk_size` on its own is cut into overlapping character
//! windows instead of being merged.

use std::collections::VecDeque;

use crate::domain::errors::{DomainError, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_SEPARATOR: &str = "\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separator: String,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be greater than zero"));
        }
        if chunk_overlap >= chunk_size {
            return Err(DomainError::validation(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separator: DEFAULT_SEPARATOR.to_string(),
        })
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in text.split(self.separator.as_str()).filter(|p| !p.is_empty()) {
            if char_len(piece) > self.chunk_size {
                self.merge_into(&pending, &mut chunks);
                pending.clear();
                self.window_into(piece, &mut chunks);
            } else {
                pending.push(piece);
            }
        }
        self.merge_into(&pending, &mut chunks);

        chunks
    }

    fn merge_into(&self, pieces: &[&str], chunks: &mut Vec<String>) {
        let separator_len = char_len(&self.separator);
        let joiner = |current: &VecDeque<&str>| {
            if current.is_empty() {
                0
            } else {
                separator_len
            }
        };

        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for &piece in pieces {
            let len = char_len(piece);

            if !current.is_empty() && total + len + joiner(&current) > self.chunk_size {
                self.push_joined(&current, chunks);

                while !current.is_empty()
                    && (total > self.chunk_overlap
                        || (total + len + joiner(&current) > self.chunk_size && total > 0))
                {
                    let trailing = if current.len() > 1 { separator_len } else { 0 };
                    if let Some(first) = current.pop_front() {
                        total -= char_len(first) + trailing;
                    }
                }
            }

            total += len + joiner(&current);
            current.push_back(piece);
        }

        self.push_joined(&current, chunks);
    }

    fn window_into(&self, piece: &str, chunks: &mut Vec<String>) {
        let chars: Vec<char> = piece.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            push_trimmed(&window, chunks);

            if end == chars.len() {
                break;
            }
            start += step;
        }
    }

    fn push_joined(&self, pieces: &VecDeque<&str>, chunks: &mut Vec<String>) {
        if pieces.is_empty() {
            return;
        }
        let joined = pieces
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(&self.separator);
        push_trimmed(&joined, chunks);
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

fn push_trimmed(text: &str, chunks: &mut Vec<String>) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
