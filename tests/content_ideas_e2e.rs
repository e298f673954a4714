mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, routing::post, Json, Router};
use common::{body_json, json_request, test_app, CountingModel};
use http::{Method, StatusCode};
use serde_json::{json, Value};
use studio_content_service::bridge::{ModelConfig, OpenAiCompatibleModel};
use studio_content_service::notify::Severity;
use tower::ServiceExt;

type Captured = Arc<Mutex<Vec<Value>>>;

async fn mock_completions(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    captured.lock().unwrap().push(body);
    Json(json!({
        "choices": [
            { "message": { "role": "assistant", "content": "{\"ideas\":[\"Bridal glow\",\"Soft glam\",\"Editorial\"]}" } }
        ]
    }))
}

async fn spawn_mock_model_server() -> (String, Captured) {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(mock_completions))
        .with_state(captured.clone());
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1", addr), captured)
}

async fn spawn_model_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/v1", addr)
}

async fn stalled_completions() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "choices": [] }))
}

async fn overloaded_completions() -> (StatusCode, &'static str) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"error":{"message":"shard eu-7 overloaded for org-42"}}"#,
    )
}

async fn post_ideas(base_url: String, timeout_ms: u64) -> (StatusCode, Value) {
    let model = OpenAiCompatibleModel::new(ModelConfig::new(base_url, "key", "m", timeout_ms));
    let app = test_app(Arc::new(model));
    let response = app
        .router
        .oneshot(json_request(Method::POST, "/api/content-ideas", r#"{"section":"hero"}"#))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn e2e_ideas_through_openai_compatible_model() {
    let (base_url, captured) = spawn_mock_model_server().await;
    let model = OpenAiCompatibleModel::new(ModelConfig::new(base_url, "test-key", "gpt-4o-mini", 5_000));
    let app = test_app(Arc::new(model));

    let response = app
        .router
        .oneshot(json_request(
            Method::POST,
            "/api/content-ideas",
            r#"{"section":"services","topic":"quinceañera"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "data": ["Bridal glow", "Soft glam", "Editorial"] })
    );

    let sent = captured.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["model"], "gpt-4o-mini");
    assert_eq!(sent[0]["response_format"]["type"], "json_schema");
    assert_eq!(
        sent[0]["response_format"]["json_schema"]["schema"]["required"],
        json!(["ideas"])
    );
    let prompt = sent[0]["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("quinceañera"));
}

#[tokio::test]
async fn e2e_invalid_section_is_rejected_without_model_call() {
    let model = CountingModel::answering(r#"{"ideas":["A","B","C"]}"#);
    let app = test_app(model.clone());

    let response = app
        .router
        .oneshot(json_request(Method::POST, "/api/content-ideas", r#"{"section":"pricing"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("section"));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn e2e_malformed_json_keeps_result_shape() {
    let model = CountingModel::answering(r#"{"ideas":["A"]}"#);
    let app = test_app(model.clone());

    let response = app
        .router
        .oneshot(json_request(Method::POST, "/api/content-ideas", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert_eq!(model.calls(), 0);
    assert_eq!(app.notifier.current().unwrap().severity, Severity::Error);
}

#[tokio::test]
async fn e2e_upstream_failure_is_bad_gateway() {
    let app = test_app(CountingModel::failing());

    let response = app
        .router
        .oneshot(json_request(Method::POST, "/api/content-ideas", r#"{"section":"hero"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn e2e_missing_ideas_is_failure() {
    let app = test_app(CountingModel::answering(r#"{"answer":"three ideas"}"#));

    let response = app
        .router
        .oneshot(json_request(Method::POST, "/api/content-ideas", r#"{"section":"gallery"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("ideas"));
}

#[tokio::test]
async fn e2e_unreachable_model_is_failure() {
    let model = OpenAiCompatibleModel::new(ModelConfig::new("http://127.0.0.1:1/v1", "key", "m", 2_000));
    let app = test_app(Arc::new(model));

    let response = app
        .router
        .oneshot(json_request(Method::POST, "/api/content-ideas", r#"{"section":"testimonials"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn e2e_stalled_model_times_out() {
    let base_url = spawn_model_server(
        Router::new().route("/v1/chat/completions", post(stalled_completions)),
    )
    .await;

    let (status, body) = post_ideas(base_url, 100).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("timed out after 100 ms"));
}

#[tokio::test]
async fn e2e_model_error_status_hides_upstream_body() {
    let base_url = spawn_model_server(
        Router::new().route("/v1/chat/completions", post(overloaded_completions)),
    )
    .await;

    let (status, body) = post_ideas(base_url, 5_000).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("500"));
    assert!(!error.contains("org-42"));
}
