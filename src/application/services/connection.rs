use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::domain::ports::LlmService;

pub const PING_PROMPT: &str = "Test connection. Please respond with \"OK\".";

/// Result of a round trip to the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub model: Option<String>,
    pub latency_ms: u64,
    pub error: Option<String>,
}

/// Sends a fixed prompt and expects a reply containing "ok".
///
/// Never fails: transport and model errors are reported as a disconnected status.
#[instrument(skip_all)]
pub async fn check_connection(llm: &dyn LlmService) -> ConnectionStatus {
    let started = Instant::now();
    let result = llm.complete(PING_PROMPT).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(reply) if reply.text.to_lowercase().contains("ok") => {
            info!(model = %reply.model, latency_ms, "language model reachable");
            ConnectionStatus {
                connected: true,
                model: Some(reply.model),
                latency_ms,
                error: None,
            }
        }
        Ok(reply) => {
            warn!(model = %reply.model, reply = %reply.text, "unexpected connection check reply");
            ConnectionStatus {
                connected: false,
                error: Some(format!("unexpected reply: {}", reply.text)),
                model: Some(reply.model),
                latency_ms,
            }
        }
        Err(e) => {
            warn!(error = %e, "language model unreachable");
            ConnectionStatus {
                connected: false,
                model: None,
                latency_ms,
                error: Some(e.to_string()),
            }
        }
    }
}
