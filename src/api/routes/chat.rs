use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{error::status_for, state::AppState};
use crate::application::{transcript, ChatFragment};

pub const PAGE_TITLE: &str = "PDF Reader AI";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

/// Outcome of one question. On failure `error` is set and `history` is the
/// unchanged transcript.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub answer: Option<String>,
    pub error: Option<String>,
    pub history: Vec<ChatFragment>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub documents_processed: bool,
    pub history: Vec<ChatFragment>,
}

/// Every outcome, including a malformed body, is a `ChatResponse`.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let mut session = state.session.lock().await;

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "malformed chat request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ChatResponse {
                    success: false,
                    answer: None,
                    error: Some(rejection.body_text()),
                    history: session.transcript(),
                }),
            );
        }
    };

    match session.ask(&request.question).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ChatResponse {
                success: true,
                answer: Some(report.answer.text),
                error: None,
                history: report.transcript,
            }),
        ),
        Err(e) => {
            let (status, _) = status_for(&e);
            tracing::warn!(error = %e, status = %status, "question not answered");
            (
                status,
                Json(ChatResponse {
                    success: false,
                    answer: None,
                    error: Some(e.to_string()),
                    history: session.transcript(),
                }),
            )
        }
    }
}

pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let session = state.session.lock().await;

    Json(HistoryResponse {
        documents_processed: session.is_ready(),
        history: session.transcript(),
    })
}

pub async fn reset_session(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.reset();
    StatusCode::NO_CONTENT
}

pub async fn transcript_page(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    Html(transcript::render_page(PAGE_TITLE, session.history()))
}
