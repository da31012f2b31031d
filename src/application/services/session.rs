use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::application::services::{
    transcript::{self, ChatFragment},
    Answer, ConversationEngine, ConversationSettings, EmbeddingIndex, Summarizer, Summary,
    SummaryScope, SummarySettings,
};
use crate::domain::{
    ports::{EmbeddingService, LlmService, TextExtractor, VectorStoreFactory},
    DocumentChunk, DomainError, Message, TextSplitter, UploadedDocument,
};

/// Collaborators a session wires together.
#[derive(Clone)]
pub struct SessionServices {
    pub extractor: Arc<dyn TextExtractor>,
    pub splitter: TextSplitter,
    pub embedding: Arc<dyn EmbeddingService>,
    pub vector_stores: Arc<dyn VectorStoreFactory>,
    pub llm: Arc<dyn LlmService>,
    pub settings: ConversationSettings,
    pub summary: SummarySettings,
}

/// Summary of one processing action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub documents: usize,
    pub characters: usize,
    pub chunks: usize,
}

/// Result of one ask action: the new answer plus the re-rendered transcript.
#[derive(Debug, Clone)]
pub struct AskReport {
    pub answer: Answer,
    pub transcript: Vec<ChatFragment>,
}

/// All state of one user session. Nothing is persisted.
///
/// The session starts without an index; questions are refused until a
/// processing action succeeds. Each processing action replaces the index and
/// starts a fresh conversation.
pub struct Session {
    services: SessionServices,
    text: Option<String>,
    index: Option<Arc<EmbeddingIndex>>,
    engine: Option<ConversationEngine>,
}

impl Session {
    pub fn new(services: SessionServices) -> Self {
        Self {
            services,
            text: None,
            index: None,
            engine: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    pub fn index(&self) -> Option<&EmbeddingIndex> {
        self.index.as_deref()
    }

    pub fn llm(&self) -> Arc<dyn LlmService> {
        Arc::clone(&self.services.llm)
    }

    /// Extract, chunk, index, and start a new conversation.
    ///
    /// Any failure aborts the whole action and keeps the previous index and
    /// conversation.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub async fn process(
        &mut self,
        documents: Vec<UploadedDocument>,
    ) -> Result<ProcessReport, DomainError> {
        let count = documents.len();
        if count == 0 {
            warn!("processing with no documents; the index will be empty");
        }

        let extractor = Arc::clone(&self.services.extractor);
        let text = tokio::task::spawn_blocking(move || extractor.extract(&documents))
            .await
            .map_err(|e| DomainError::internal(e.to_string()))??;

        let chunks = DocumentChunk::from_texts(self.services.splitter.split(&text));

        let index = Arc::new(
            EmbeddingIndex::build(
                Arc::clone(&self.services.embedding),
                self.services.vector_stores.create(),
                &chunks,
            )
            .await?,
        );

        self.engine = Some(ConversationEngine::new(
            Arc::clone(&index),
            Arc::clone(&self.services.llm),
            self.services.settings.clone(),
        ));
        self.index = Some(index);

        let report = ProcessReport {
            documents: count,
            characters: text.chars().count(),
            chunks: chunks.len(),
        };
        self.text = Some(text);
        info!(
            characters = report.characters,
            chunks = report.chunks,
            "documents processed"
        );
        Ok(report)
    }

    #[instrument(skip_all)]
    pub async fn ask(&mut self, question: &str) -> Result<AskReport, DomainError> {
        let engine = self.engine.as_mut().ok_or_else(DomainError::process_first)?;
        let answer = engine.ask(question).await?;

        Ok(AskReport {
            answer,
            transcript: transcript::render(engine.history()),
        })
    }

    /// Summarises `selection` when given, otherwise all processed text.
    #[instrument(skip_all, fields(selection = selection.is_some()))]
    pub async fn summarize(&self, selection: Option<&str>) -> Result<Summary, DomainError> {
        let (text, scope) = match selection {
            Some(text) => (text, SummaryScope::Selection),
            None => (
                self.text.as_deref().ok_or_else(DomainError::process_first)?,
                SummaryScope::Document,
            ),
        };

        Summarizer::new(Arc::clone(&self.services.llm), self.services.summary.clone())
            .summarize(text, scope)
            .await
    }

    pub fn history(&self) -> &[Message] {
        self.engine.as_ref().map(|e| e.history()).unwrap_or(&[])
    }

    pub fn transcript(&self) -> Vec<ChatFragment> {
        transcript::render(self.history())
    }

    /// Drops the processed text, index and conversation.
    pub fn reset(&mut self) {
        self.engine = None;
        self.index = None;
        self.text = None;
        info!("session reset");
    }
}
