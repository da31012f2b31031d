use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::state::AppState;
use crate::application::{check_connection, ConnectionStatus};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub documents_processed: bool,
    pub indexed_chunks: usize,
    pub turns: usize,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Always ready to accept uploads; reports whether questions can be answered yet.
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let session = state.session.lock().await;

    Json(ReadinessResponse {
        status: "ready".into(),
        documents_processed: session.is_ready(),
        indexed_chunks: session.index().map(|i| i.len()).unwrap_or(0),
        turns: session.history().len(),
    })
}

/// Round trip to the language model; 503 when it cannot be reached.
pub async fn llm_status(State(state): State<AppState>) -> (StatusCode, Json<ConnectionStatus>) {
    let llm = state.session.lock().await.llm();
    let status = check_connection(llm.as_ref()).await;

    let code = if status.connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}
