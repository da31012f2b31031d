use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::application::{ConversationSettings, SummarySettings};
use crate::domain::{splitter, DomainError, TextSplitter};

pub const CONFIG_DIR_ENV: &str = "APP_CONFIG_DIR";
const APP_FILE: &str = "app.yaml";
const PROMPTS_FILE: &str = "prompts.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Loads `app.yaml` and `prompts.yaml` from `$APP_CONFIG_DIR` (default `config/`),
    /// then applies `SERVER_HOST`/`SERVER_PORT` overrides.
    pub fn load() -> Result<Self, DomainError> {
        let dir = std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| "config".into());
        let mut config = Self::load_from(Path::new(&dir))?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Missing files fall back to defaults; malformed files are errors.
    pub fn load_from(dir: &Path) -> Result<Self, DomainError> {
        Ok(Self {
            config: read_yaml(&dir.join(APP_FILE))?.unwrap_or_default(),
            prompts: read_yaml(&dir.join(PROMPTS_FILE))?.unwrap_or_default(),
        })
    }

    pub fn splitter(&self) -> Result<TextSplitter, DomainError> {
        let chunking = &self.config.chunking;
        Ok(TextSplitter::new(chunking.chunk_size, chunking.chunk_overlap)?
            .with_separator(chunking.separator.clone()))
    }

    pub fn conversation_settings(&self) -> ConversationSettings {
        let prompts = &self.prompts.conversation;
        ConversationSettings {
            top_k: self.config.rag.top_k,
            condense_question: self.config.rag.condense_question,
            system_prompt: prompts.system.clone(),
            condense_template: prompts.condense.clone(),
            answer_template: prompts.answer.clone(),
        }
    }

    pub fn summary_settings(&self) -> SummarySettings {
        SummarySettings {
            template: self.prompts.summary.template.clone(),
            max_input_chars: self.config.summary.max_input_chars,
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), DomainError> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.config.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.config.server.port = port
                .parse()
                .map_err(|e| DomainError::configuration(format!("SERVER_PORT: {e}")))?;
        }
        Ok(())
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, DomainError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(None);
        }
        Err(e) => {
            return Err(DomainError::configuration(format!(
                "{}: {e}",
                path.display()
            )))
        }
    };

    serde_yaml::from_str(&raw)
        .map(Some)
        .map_err(|e| DomainError::configuration(format!("{}: {e}", path.display())))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub rag: RagConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Gemini,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub temperature: f64,
    pub timeout_seconds: u64,
    /// Overrides the provider's API endpoint, e.g. for a proxy.
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.3,
            timeout_seconds: 60,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Sentence-transformer model run in-process.
    Local,
    /// Deterministic hashed vectors, for offline use.
    Hashed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub cache_dir: Option<PathBuf>,
    pub show_download_progress: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Local,
            model: "all-MiniLM-L6-v2".to_string(),
            dimension: 384,
            cache_dir: None,
            show_download_progress: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separator: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: splitter::DEFAULT_CHUNK_SIZE,
            chunk_overlap: splitter::DEFAULT_CHUNK_OVERLAP,
            separator: splitter::DEFAULT_SEPARATOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub top_k: usize,
    pub condense_question: bool,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            condense_question: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub max_input_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 30_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub conversation: ConversationPrompts,
    pub summary: SummaryPrompts,
}

/// Templates use `{context}`, `{chat_history}` and `{question}` placeholders.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversationPrompts {
    pub system: String,
    pub condense: String,
    pub answer: String,
}

impl Default for ConversationPrompts {
    fn default() -> Self {
        Self {
            system: "You answer questions about documents the user has uploaded.".to_string(),
            condense: "Given the following conversation and a follow up question, rephrase the \
                       follow up question to be a standalone question, in its original language.\n\n\
                       Chat History:\n{chat_history}\nFollow Up Input: {question}\nStandalone question:"
                .to_string(),
            answer: "Use the following pieces of context to answer the question at the end. If \
                     you don't know the answer, just say that you don't know, don't try to make \
                     up an answer.\n\n{context}\n\nChat History:\n{chat_history}\n\nQuestion: \
                     {question}\nHelpful Answer:"
                .to_string(),
        }
    }
}

/// The template uses `{scope}`, `{length}`, `{word_count}` and `{text}` placeholders.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub template: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            template: "Please provide a clear and concise summary of the following {scope} in \
                       {length}. Focus on the key points and main ideas.\n\n\
                       Text to summarize ({word_count} words):\n{text}\n\nSummary:"
                .to_string(),
        }
    }
}
