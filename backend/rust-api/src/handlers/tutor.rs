use axum::{extract::State, http::StatusCode, response::Html};
use std::sync::Arc;
use validator::Validate;

use crate::{
    extractors::AppForm,
    models::{History, SubmitForm},
    services::{
        transcript_service::{TranscriptError, TranscriptService},
        AppState,
    },
    views,
};

/// GET / - a fresh lesson
pub async fn index() -> Result<Html<String>, (StatusCode, String)> {
    page(&History::new())
}

/// POST / - send one message and redraw the page with the extended transcript
pub async fn submit(
    State(state): State<Arc<AppState>>,
    AppForm(form): AppForm<SubmitForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    form.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Validation error: {}", e)))?;

    let service = TranscriptService::new(state.completion.clone());

    match service.submit(&form.history, &form.input).await {
        Ok(history) => {
            tracing::info!("Submission handled: history_len={}", history.len());
            page(&history)
        }
        Err(e) => {
            tracing::error!("Failed to handle submission: {}", e);
            let response = match e {
                TranscriptError::MalformedHistory(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                // Provider bodies can echo request details; keep them in the log only.
                TranscriptError::Completion(_) => (
                    StatusCode::BAD_GATEWAY,
                    "Completion service request failed".to_string(),
                ),
                TranscriptError::MalformedReply(_) => (StatusCode::BAD_GATEWAY, e.to_string()),
            };
            Err(response)
        }
    }
}

fn page(history: &History) -> Result<Html<String>, (StatusCode, String)> {
    views::render_page(history).map(Html).map_err(|e| {
        tracing::error!("Failed to encode history into page: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to render page".to_string(),
        )
    })
}
