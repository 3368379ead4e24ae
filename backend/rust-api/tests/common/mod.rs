#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use wordtutor_api::{
    config::{CompletionConfig, Config},
    create_router,
    services::{
        completion::{CompletionClient, CompletionError, CompletionRequest},
        AppState,
    },
};

pub const METRICS_AUTH: &str = "metrics:secret";

/// Completion backend that replays canned replies and records every request.
pub struct ScriptedCompletion {
    replies: Mutex<Vec<Result<Option<String>, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<Option<String>, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(replies: &[&str]) -> Arc<Self> {
        Self::new(
            replies
                .iter()
                .map(|reply| Ok(Some(reply.to_string())))
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<Option<String>, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        replies.remove(0)
    }
}

pub fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        completion: CompletionConfig {
            api_key: "sk-test".to_string(),
            base_url: "http://127.0.0.1:9/v1".to_string(),
            model: "scripted-model".to_string(),
            timeout_secs: 5,
        },
        metrics_auth: METRICS_AUTH.to_string(),
    }
}

pub fn create_test_app(completion: Arc<ScriptedCompletion>) -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let state = AppState::with_completion(test_config(), completion);
    create_router(Arc::new(state))
}

/// Encodes `history` and `input` the way the browser posts the chat form.
pub fn form_body(history: &str, input: &str) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("history", history);
    serializer.append_pair("input", input);
    serializer.finish()
}

pub async fn post_form(app: &Router, body: String) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

/// Pulls the embedded history back out of a rendered page.
pub fn embedded_history(page: &str) -> String {
    let marker = r#"name="history" value=""#;
    let start = page.find(marker).expect("history field missing") + marker.len();
    let end = start + page[start..].find('"').expect("unterminated history field");
    page[start..end]
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
