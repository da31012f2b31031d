use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{error::ApiError, state::AppState};
use crate::application::SummaryScope;
use crate::domain::UploadedDocument;

const FILE_FIELDS: [&str; 2] = ["file", "files"];

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub documents: Vec<String>,
    pub characters: usize,
    pub chunks: usize,
}

/// Replaces the session's index with one built from the uploaded files.
///
/// Accepts any number of `file`/`files` parts; zero parts builds an empty index.
pub async fn process_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut documents = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if !field.name().is_some_and(|name| FILE_FIELDS.contains(&name)) {
            continue;
        }

        let name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("document-{}.pdf", documents.len() + 1));
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read {name}: {e}")))?;

        documents.push(UploadedDocument::new(name, bytes.to_vec()));
    }

    let names: Vec<String> = documents.iter().map(|d| d.name.clone()).collect();
    info!(documents = ?names, "processing upload");

    let report = state.session.lock().await.process(documents).await?;

    Ok(Json(ProcessResponse {
        documents: names,
        characters: report.characters,
        chunks: report.chunks,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    /// A passage to summarise instead of the processed documents.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub word_count: usize,
    pub scope: SummaryScope,
    pub truncated: bool,
}

/// Summarises the processed documents, or the `text` passage when one is sent.
///
/// A request without a JSON body summarises the documents.
pub async fn summarize_documents(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => SummarizeRequest::default(),
        Err(rejection) => return Err(ApiError::bad_request(rejection.body_text())),
    };

    let summary = state
        .session
        .lock()
        .await
        .summarize(request.text.as_deref())
        .await?;

    Ok(Json(SummarizeResponse {
        summary: summary.text,
        word_count: summary.word_count,
        scope: summary.scope,
        truncated: summary.truncated,
    }))
}
