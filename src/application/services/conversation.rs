use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::application::services::{template::fill_template, EmbeddingIndex};
use crate::domain::{ports::LlmService, Conversation, DomainError, Message, SearchResult};

/// Prompt templates and retrieval knobs for a conversation.
///
/// Templates use `{context}`, `{chat_history}` and `{question}` placeholders.
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    pub top_k: usize,
    pub condense_question: bool,
    pub system_prompt: String,
    pub condense_template: String,
    pub answer_template: String,
}

/// The outcome of one successful question.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// The query used for retrieval; differs from the question when a follow-up was condensed.
    pub retrieval_query: String,
    pub sources: Vec<SearchResult>,
}

/// Retrieval-augmented dialogue over one index.
///
/// History only changes when a question completes, so a failed call leaves the
/// conversation exactly as it was.
pub struct ConversationEngine {
    index: Arc<EmbeddingIndex>,
    llm: Arc<dyn LlmService>,
    settings: ConversationSettings,
    history: Conversation,
}

impl ConversationEngine {
    pub fn new(
        index: Arc<EmbeddingIndex>,
        llm: Arc<dyn LlmService>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            index,
            llm,
            settings,
            history: Conversation::new(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history.messages
    }

    #[instrument(
        skip(self, question),
        fields(conversation_id = %self.history.id, turns = self.history.len())
    )]
    pub async fn ask(&mut self, question: &str) -> Result<Answer, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::validation("question must not be empty"));
        }

        let chat_history = self.format_history();
        let retrieval_query = self.retrieval_query(question, &chat_history).await?;

        let sources = self
            .index
            .query(&retrieval_query, self.settings.top_k)
            .await?;
        debug!(sources = sources.len(), "context retrieved");

        let context = sources
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = fill_template(
            &self.settings.answer_template,
            &[
                ("context", &context),
                ("chat_history", &chat_history),
                ("question", question),
            ],
        );
        let completion = self
            .llm
            .complete_with_system(&self.settings.system_prompt, &prompt)
            .await?;

        self.history.record_exchange(question, completion.text.as_str());
        info!(turns = self.history.len(), "question answered");

        Ok(Answer {
            text: completion.text,
            retrieval_query,
            sources,
        })
    }

    async fn retrieval_query(
        &self,
        question: &str,
        chat_history: &str,
    ) -> Result<String, DomainError> {
        if !self.settings.condense_question || self.history.is_empty() {
            return Ok(question.to_string());
        }

        let prompt = fill_template(
            &self.settings.condense_template,
            &[("chat_history", chat_history), ("question", question)],
        );
        let standalone = self.llm.complete(&prompt).await?;
        debug!(standalone = %standalone.text, "follow-up condensed");
        Ok(standalone.text)
    }

    fn format_history(&self) -> String {
        self.history
            .messages
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ports::Completion, DocumentChunk, MessageRole};
    use crate::infrastructure::{HashedEmbedding, InMemoryVectorStore};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replies from a queue and records every prompt it receives.
    #[derive(Default)]
    struct ScriptedLlm {
        replies: Mutex<VecDeque<Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn replying(replies: &[Result<&str, &str>]) -> Arc<Self> {
            let queue = replies
                .iter()
                .map(|r| r.map(str::to_string).map_err(str::to_string))
                .collect();
            Arc::new(Self {
                replies: Mutex::new(queue),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
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
                None => Err(DomainError::generation("no scripted reply left")),
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

    fn settings(condense_question: bool) -> ConversationSettings {
        ConversationSettings {
            top_k: 2,
            condense_question,
            system_prompt: "system".to_string(),
            condense_template: "CONDENSE {chat_history} | {question}".to_string(),
            answer_template: "CONTEXT {context} | HISTORY {chat_history} | Q {question}"
                .to_string(),
        }
    }

    async fn engine(llm: Arc<ScriptedLlm>, condense_question: bool) -> ConversationEngine {
        let chunks = DocumentChunk::from_texts(vec![
            "The reactor runs at 300 kelvin.".to_string(),
            "The cafeteria opens at noon.".to_string(),
        ]);
        let index = EmbeddingIndex::build(
            Arc::new(HashedEmbedding::new(1024)),
            Arc::new(InMemoryVectorStore::new()),
            &chunks,
        )
        .await
        .unwrap();
        ConversationEngine::new(Arc::new(index), llm, settings(condense_question))
    }

    #[tokio::test]
    async fn test_ask_appends_exactly_one_round() {
        let llm = ScriptedLlm::replying(&[Ok("300 kelvin.")]);
        let mut engine = engine(llm.clone(), true).await;

        let answer = engine.ask("What temperature does the reactor run at?").await.unwrap();

        assert_eq!(answer.text, "300 kelvin.");
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.history()[0].role, MessageRole::User);
        assert_eq!(
            engine.history()[0].content,
            "What temperature does the reactor run at?"
        );
        assert_eq!(engine.history()[1], Message::assistant("300 kelvin."));
    }

    #[tokio::test]
    async fn test_prompt_contains_context_and_question() {
        let llm = ScriptedLlm::replying(&[Ok("noon")]);
        let mut engine = engine(llm.clone(), true).await;

        let answer = engine.ask("when does the cafeteria open").await.unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("The cafeteria opens at noon."));
        assert!(prompts[0].ends_with("Q when does the cafeteria open"));
        assert_eq!(
            answer.sources[0].chunk.content,
            "The cafeteria opens at noon."
        );
    }

    #[tokio::test]
    async fn test_follow_up_is_condensed_and_history_sent() {
        let llm = ScriptedLlm::replying(&[
            Ok("At noon."),
            Ok("When does the cafeteria close?"),
            Ok("It does not say."),
        ]);
        let mut engine = engine(llm.clone(), true).await;

        engine.ask("When does the cafeteria open?").await.unwrap();
        let answer = engine.ask("And close?").await.unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[1].starts_with("CONDENSE Human: When does the cafeteria open?"));
        assert!(prompts[2].contains("Assistant: At noon."));
        assert_eq!(answer.retrieval_query, "When does the cafeteria close?");
        assert_eq!(engine.history().len(), 4);
        assert_eq!(engine.history()[2].content, "And close?");
    }

    #[tokio::test]
    async fn test_condensing_can_be_disabled() {
        let llm = ScriptedLlm::replying(&[Ok("At noon."), Ok("Unknown.")]);
        let mut engine = engine(llm.clone(), false).await;

        engine.ask("When does the cafeteria open?").await.unwrap();
        let answer = engine.ask("And close?").await.unwrap();

        assert_eq!(llm.prompts().len(), 2);
        assert_eq!(answer.retrieval_query, "And close?");
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_history_untouched() {
        let llm = ScriptedLlm::replying(&[Ok("At noon."), Err("quota exceeded")]);
        let mut engine = engine(llm, false).await;
        engine.ask("When does the cafeteria open?").await.unwrap();

        let err = engine.ask("And the reactor?").await.unwrap_err();

        assert!(matches!(err, DomainError::Generation(_)));
        assert_eq!(engine.history().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_condensing_leaves_history_untouched() {
        let llm = ScriptedLlm::replying(&[Ok("At noon."), Err("network down")]);
        let mut engine = engine(llm, true).await;
        engine.ask("When does the cafeteria open?").await.unwrap();

        assert!(engine.ask("And close?").await.is_err());
        assert_eq!(engine.history().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_question_rejected_without_calls() {
        let llm = ScriptedLlm::replying(&[]);
        let mut engine = engine(llm.clone(), true).await;

        let err = engine.ask("   ").await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(llm.prompts().is_empty());
        assert!(engine.history().is_empty());
    }
}
