//! Drives `OpenAiClient` against a local stand-in for the chat completions API.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wordtutor_api::{
    config::CompletionConfig,
    services::completion::{
        ChatMessage, CompletionClient, CompletionError, CompletionRequest, OpenAiClient, Sampling,
    },
};

#[derive(Default)]
struct Captured {
    authorization: Option<String>,
    body: Option<Value>,
}

struct FakeProvider {
    status: StatusCode,
    response: Value,
    captured: Mutex<Captured>,
}

async fn chat_completions(
    State(provider): State<Arc<FakeProvider>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    {
        let mut captured = provider.captured.lock().unwrap();
        captured.authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        captured.body = Some(body);
    }
    (provider.status, Json(provider.response.clone()))
}

async fn spawn_provider(status: StatusCode, response: Value) -> (String, Arc<FakeProvider>) {
    let provider = Arc::new(FakeProvider {
        status,
        response,
        captured: Mutex::new(Captured::default()),
    });
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(provider.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1", addr), provider)
}

fn client_for(base_url: String) -> OpenAiClient {
    OpenAiClient::new(&CompletionConfig {
        api_key: "sk-local".to_string(),
        base_url,
        model: "gpt-4".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn request() -> CompletionRequest {
    CompletionRequest {
        messages: vec![ChatMessage::system("rules"), ChatMessage::user("serendipity")],
        sampling: Sampling::default(),
    }
}

#[tokio::test]
async fn test_sends_model_messages_and_sampling() {
    let (base_url, provider) = spawn_provider(
        StatusCode::OK,
        json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "{\"stage\":\"end\"}" },
                "finish_reason": "stop"
            }]
        }),
    )
    .await;
    let client = client_for(base_url);

    let content = client.complete(&request()).await.unwrap();

    assert_eq!(content.as_deref(), Some("{\"stage\":\"end\"}"));

    let captured = provider.captured.lock().unwrap();
    assert_eq!(captured.authorization.as_deref(), Some("Bearer sk-local"));
    let body = captured.body.as_ref().unwrap();
    assert_eq!(body["model"], "gpt-4");
    assert_eq!(body["messages"][0], json!({"role": "system", "content": "rules"}));
    assert_eq!(body["messages"][1], json!({"role": "user", "content": "serendipity"}));
    assert_eq!(body["temperature"], 1.0);
    assert_eq!(body["max_tokens"], 256);
    assert_eq!(body["top_p"], 1.0);
    assert_eq!(body["frequency_penalty"], 0.0);
    assert_eq!(body["presence_penalty"], 0.0);
}

#[tokio::test]
async fn test_null_content_is_none() {
    let (base_url, _provider) = spawn_provider(
        StatusCode::OK,
        json!({ "choices": [{ "message": { "role": "assistant", "content": null } }] }),
    )
    .await;

    let content = client_for(base_url).complete(&request()).await.unwrap();

    assert!(content.is_none());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (base_url, _provider) = spawn_provider(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "You exceeded your current quota" } }),
    )
    .await;

    let err = client_for(base_url).complete(&request()).await.unwrap_err();

    match err {
        CompletionError::Provider { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("exceeded your current quota"));
        }
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let (base_url, _provider) = spawn_provider(StatusCode::OK, json!({ "choices": [] })).await;

    let err = client_for(base_url).complete(&request()).await.unwrap_err();

    assert!(matches!(err, CompletionError::EmptyResponse));
}

#[tokio::test]
async fn test_unreachable_service_is_http_error() {
    // Port 9 (discard) is closed on test hosts.
    let err = client_for("http://127.0.0.1:9/v1".to_string())
        .complete(&request())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Http(_)));
}
