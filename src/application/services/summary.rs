//! Short model-written summaries of a text selection or of the processed documents.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::application::services::template::fill_template;
use crate::domain::{ports::LlmService, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryScope {
    /// A passage the user picked out.
    Selection,
    /// Everything extracted by the last processing action.
    Document,
}

impl SummaryScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Document => "document",
        }
    }

    fn length(&self) -> &'static str {
        match self {
            Self::Selection => "2-3 sentences",
            Self::Document => "3-5 sentences",
        }
    }
}

/// Templates use `{scope}`, `{length}`, `{word_count}` and `{text}` placeholders.
#[derive(Debug, Clone)]
pub struct SummarySettings {
    pub template: String,
    /// Input beyond this many characters is cut before prompting; 0 disables the cut.
    pub max_input_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    /// Words in the full input, before any truncation.
    pub word_count: usize,
    pub scope: SummaryScope,
    pub truncated: bool,
}

pub struct Summarizer {
    llm: Arc<dyn LlmService>,
    settings: SummarySettings,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LlmService>, settings: SummarySettings) -> Self {
        Self { llm, settings }
    }

    #[instrument(skip(self, text), fields(scope = scope.as_str(), chars = text.len()))]
    pub async fn summarize(&self, text: &str, scope: SummaryScope) -> Result<Summary, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::validation(format!(
                "the {} to summarize is empty",
                scope.as_str()
            )));
        }

        let word_count = text.split_whitespace().count();
        let (input, truncated) = truncate_chars(text, self.settings.max_input_chars);
        let prompt = fill_template(
            &self.settings.template,
            &[
                ("scope", scope.as_str()),
                ("length", scope.length()),
                ("word_count", &word_count.to_string()),
                ("text", input),
            ],
        );

        let completion = self.llm.complete(&prompt).await?;
        info!(word_count, truncated, "summary generated");

        Ok(Summary {
            text: completion.text,
            word_count,
            scope,
            truncated,
        })
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    if max_chars == 0 {
        return (text, false);
    }
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => (&text[..end], true),
        None => (text, false),
    }
}
