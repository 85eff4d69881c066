//! HTTP surface tests, driven through the router with `oneshot`

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use mockito::{Matcher, Server};
use relay_config::{Config, ProviderSettings};
use relay_core::ProviderKind;
use relay_server::{create_router, Gateway};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(config: &Config) -> Router {
    create_router(Arc::new(Gateway::from_config(config).unwrap()))
}

fn openai_config(base_url: &str) -> Config {
    let mut config = Config::default();
    *config.providers.get_mut(ProviderKind::OpenAi) =
        ProviderSettings::new(base_url).with_api_key("sk-test");
    config
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn hi(model: &str, stream: bool) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": "Hi"}],
        "stream": stream
    })
}

fn as_json(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let (status, _, body) = send(app(&Config::default()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let body = as_json(&body);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn version_and_delete() {
    let router = app(&Config::default());

    let (status, _, body) = send(router.clone(), get("/api/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"version": "0.1.0"}));

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/delete/gpt-4o")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"status": "ok"}));
}

#[tokio::test]
async fn tags_lists_models_in_order_and_is_idempotent() {
    let router = app(&Config::default());

    let (status, _, first) = send(router.clone(), get("/api/tags")).await;
    let (_, _, second) = send(router, get("/api/tags")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);

    let body = as_json(&first);
    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 12);
    assert_eq!(models[0]["name"], "qwen3-0.6b");
    assert_eq!(models[0]["model"], "qwen3:0.6b");
    assert_eq!(models[0]["size"], 0);
    assert_eq!(models[0]["digest"], "");
    assert_eq!(models[0]["details"]["format"], "api");
    assert_eq!(models[0]["details"]["family"], "openai");
    assert_eq!(models[0]["details"]["families"], json!(["openai"]));
    assert_eq!(models[11]["name"], "claude-3-haiku");
    assert_eq!(models[11]["details"]["family"], "anthropic");
}

#[tokio::test]
async fn unknown_model_is_404() {
    let (status, _, body) = send(
        app(&Config::default()),
        post_json("/api/chat", hi("llama-9000", false)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(as_json(&body), json!({"error": "model llama-9000 not found"}));
}

#[tokio::test]
async fn empty_messages_is_400() {
    let request = post_json("/api/chat", json!({"model": "gpt-4o", "messages": []}));
    let (status, _, body) = send(app(&Config::default()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(as_json(&body)["error"].is_string());
}

#[tokio::test]
async fn malformed_body_is_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"model\": "))
        .unwrap();
    let (status, _, body) = send(app(&Config::default()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(as_json(&body)["error"].is_string());
}

#[tokio::test]
async fn missing_api_key_is_500() {
    let (status, _, body) = send(
        app(&Config::default()),
        post_json("/api/chat", hi("gemini-pro", true)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(as_json(&body), json!({"error": "Gemini API key not configured"}));
}

#[tokio::test]
async fn buffered_chat_through_openai() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "gpt-4o", "temperature": 0.5})))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hi"}}]}"#)
        .create_async()
        .await;

    let mut body = hi("gpt-4o", false);
    body["options"] = json!({"temperature": 0.5});

    let (status, _, body) = send(app(&openai_config(&server.url())), post_json("/api/chat", body)).await;
    assert_eq!(status, StatusCode::OK);

    let body = as_json(&body);
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["message"], json!({"role": "assistant", "content": "Hi"}));
    assert_eq!(body["done"], true);
    assert!(body["created"].is_i64());
    assert_eq!(body["eval_count"], 0);

    mock.assert_async().await;
}

#[tokio::test]
async fn streaming_chat_writes_ndjson() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        ))
        .create_async()
        .await;

    let (status, headers, body) = send(
        app(&openai_config(&server.url())),
        post_json("/v1/chat/completions", hi("gpt-4o", true)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["message"]["content"], "Hel");
    assert_eq!(lines[0]["done"], false);
    assert_eq!(lines[1]["message"]["content"], "lo");
    assert_eq!(lines[2]["message"]["content"], "");
    assert_eq!(lines[2]["done"], true);
    assert!(lines.iter().all(|l| l["model"] == "gpt-4o" && l["created_at"].is_string()));
}

#[tokio::test]
async fn upstream_error_passes_through() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body(r#"{"error":{"message":"overloaded"}}"#)
        .create_async()
        .await;

    let (status, _, body) = send(
        app(&openai_config(&server.url())),
        post_json("/api/chat", hi("gpt-4", false)),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body[..], br#"{"error":{"message":"overloaded"}}"#);
}

#[tokio::test]
async fn stream_deltas_join_to_buffered_content() {
    let mut buffered_upstream = Server::new_async().await;
    buffered_upstream
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hello there"}}]}"#)
        .create_async()
        .await;

    let mut streaming_upstream = Server::new_async().await;
    streaming_upstream
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" there\"}}]}\n\n",
            "data: [DONE]\n\n",
        ))
        .create_async()
        .await;

    let (status, _, buffered) = send(
        app(&openai_config(&buffered_upstream.url())),
        post_json("/api/chat", hi("gpt-4o", false)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let buffered = as_json(&buffered);

    let (status, _, streamed) = send(
        app(&openai_config(&streaming_upstream.url())),
        post_json("/api/chat", hi("gpt-4o", true)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(streamed.to_vec()).unwrap();
    let lines: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let joined: String = lines
        .iter()
        .map(|l| l["message"]["content"].as_str().unwrap())
        .collect();

    assert_eq!(joined, buffered["message"]["content"].as_str().unwrap());
    assert_eq!(lines.iter().filter(|l| l["done"] == true).count(), 1);
    assert_eq!(lines.last().unwrap()["done"], true);
}

#[tokio::test]
async fn upstream_cut_mid_stream_truncates_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body("data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n\n")
        .create_async()
        .await;

    let response = app(&openai_config(&server.url()))
        .oneshot(post_json("/api/chat", hi("gpt-4o", true)))
        .await
        .unwrap();
    // Headers are already out when the upstream fails
    assert_eq!(response.status(), StatusCode::OK);

    let frames: Vec<_> = response.into_body().into_data_stream().collect().await;
    let received: Vec<u8> = frames
        .iter()
        .filter_map(|f| f.as_ref().ok())
        .flat_map(|b| b.to_vec())
        .collect();
    let lines: Vec<Value> = String::from_utf8(received)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(matches!(frames.last(), Some(Err(_))));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["message"]["content"], "partial");
    assert!(lines.iter().all(|l| l["done"] == false));
}
