use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::metrics;
use crate::models::{History, Reply};
use crate::services::completion::{
    CompletionClient, CompletionError, CompletionRequest, Sampling,
};
use crate::services::prompt::build_messages;

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Malformed history: {0}")]
    MalformedHistory(#[source] serde_json::Error),

    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("Model reply is not valid JSON: {0}")]
    MalformedReply(#[source] serde_json::Error),
}

impl TranscriptError {
    /// Outcome label recorded in `tutor_submissions_total`.
    pub fn outcome(&self) -> &'static str {
        match self {
            TranscriptError::MalformedHistory(_) => "bad_history",
            TranscriptError::Completion(_) => "completion_error",
            TranscriptError::MalformedReply(_) => "bad_reply",
        }
    }
}

/// Advances a tutoring transcript by one learner message and one model reply.
pub struct TranscriptService {
    completion: Arc<dyn CompletionClient>,
}

impl TranscriptService {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    /// Decodes the posted history and runs one exchange with the model.
    pub async fn submit(&self, raw_history: &str, input: &str) -> Result<History, TranscriptError> {
        let history = History::from_json(raw_history).map_err(|e| {
            metrics::record_submission("bad_history");
            TranscriptError::MalformedHistory(e)
        })?;

        self.advance(history, input).await
    }

    /// Sends the whole transcript plus `input` to the model and returns the
    /// transcript extended by exactly two entries.
    pub async fn advance(&self, history: History, input: &str) -> Result<History, TranscriptError> {
        let result = self.exchange(&history, input).await;

        match result {
            Ok(reply) => {
                metrics::record_submission("success");
                metrics::record_reply_stage(reply.stage_label());
                Ok(history.extended(input.to_string(), reply))
            }
            Err(e) => {
                metrics::record_submission(e.outcome());
                Err(e)
            }
        }
    }

    async fn exchange(&self, history: &History, input: &str) -> Result<Reply, TranscriptError> {
        let request = CompletionRequest {
            messages: build_messages(history, input),
            sampling: Sampling::default(),
        };

        tracing::info!(
            "Requesting completion: model={}, history_len={}, messages={}",
            self.completion.model(),
            history.len(),
            request.messages.len()
        );

        let start = Instant::now();
        let content = self.completion.complete(&request).await?;
        let elapsed_ms = start.elapsed().as_millis();

        let text = content.unwrap_or_default();
        let reply = Reply::from_completion_text(&text).map_err(|e| {
            tracing::warn!("Model reply is not JSON ({} bytes): {}", text.len(), e);
            TranscriptError::MalformedReply(e)
        })?;

        tracing::info!(
            "Completion parsed: stage={}, elapsed_ms={}",
            reply.stage_label(),
            elapsed_ms
        );

        Ok(reply)
    }
}
