#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pdf_reader_ai::application::{ConversationSettings, Session, SessionServices};
use pdf_reader_ai::domain::ports::{Completion, LlmService, TextExtractor};
use pdf_reader_ai::domain::{DomainError, TextSplitter, UploadedDocument};
use pdf_reader_ai::infrastructure::{AppConfig, HashedEmbedding, InMemoryStoreFactory};

/// Treats uploads as UTF-8 text so tests can control the extracted text exactly.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_document(&self, document: &UploadedDocument) -> Result<String, DomainError> {
        String::from_utf8(document.bytes.clone())
            .map_err(|e| DomainError::extraction(&document.name, e.to_string()))
    }
}

/// Answers from a queue (falling back to a fixed reply) and records prompts.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn always(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_next(&self, error: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(error.to_string()));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<Completion, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Completion::from_response("scripted", text),
            Some(Err(e)) => Err(DomainError::generation(e)),
            None => Completion::from_response("scripted", self.fallback.clone()),
        }
    }

    async fn complete_with_system(
        &self,
        _system: &str,
        prompt: &str,
    ) -> Result<Completion, DomainError> {
        self.complete(prompt).await
    }
}

pub fn services(
    extractor: Arc<dyn TextExtractor>,
    llm: Arc<dyn LlmService>,
) -> SessionServices {
    let config = AppConfig::default();
    SessionServices {
        extractor,
        splitter: TextSplitter::default(),
        embedding: Arc::new(HashedEmbedding::new(384)),
        vector_stores: Arc::new(InMemoryStoreFactory),
        llm,
        settings: ConversationSettings {
            condense_question: false,
            ..config.conversation_settings()
        },
        summary: config.summary_settings(),
    }
}

pub fn text_session(llm: Arc<ScriptedLlm>) -> Session {
    Session::new(services(Arc::new(PlainTextExtractor), llm))
}
