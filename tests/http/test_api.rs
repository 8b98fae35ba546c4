// REST API integration tests

use crate::common::{
    create_test_services, ingest, scenario_documents, EchoSynthesizer, FailingSynthesizer,
    KeywordEmbedder,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use docmind::core::providers::AnswerSynthesizer;
use docmind::core::services::Services;
use docmind::http;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt as TowerServiceExt;

/// Router over fresh services; the index is loaded when `ingested`
async fn create_test_app(
    ingested: bool,
    synthesizer: Arc<dyn AnswerSynthesizer>,
) -> (Router, Arc<Services>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let services = create_test_services(
        temp_dir.path(),
        Arc::new(KeywordEmbedder::new()),
        synthesizer,
    );
    if ingested {
        ingest(&services, &scenario_documents()).await;
        assert!(services.load_index());
    }
    let services = Arc::new(services);
    (http::router(services.clone()), services, temp_dir)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn ask_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/ask")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_reports_online() {
    let (app, _services, _temp) = create_test_app(false, Arc::new(EchoSynthesizer::new())).await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "online");
    assert_eq!(body["model"], "echo-test");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _services, _temp) = create_test_app(false, Arc::new(EchoSynthesizer::new())).await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_ask_before_ingestion_is_unavailable() {
    let (app, _services, _temp) = create_test_app(false, Arc::new(EchoSynthesizer::new())).await;

    let response = app
        .oneshot(ask_request(json!({"query": "what is gamma?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], 503);
    assert_eq!(body["retryable"], true);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_ask_returns_answer_and_sources() {
    let (app, _services, _temp) = create_test_app(true, Arc::new(EchoSynthesizer::new())).await;

    let response = app
        .oneshot(ask_request(json!({"query": "gamma"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["answer"], "answer to: gamma");

    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 3);
    assert_eq!(sources[0]["page"], 2);
    assert!(sources[0]["content"].as_str().unwrap().ends_with("..."));
}

#[tokio::test]
async fn test_ask_empty_query_is_bad_request() {
    let (app, _services, _temp) = create_test_app(true, Arc::new(EchoSynthesizer::new())).await;

    let response = app.oneshot(ask_request(json!({"query": ""}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], 400);
}

#[tokio::test]
async fn test_ask_malformed_body_is_rejected() {
    let (app, _services, _temp) = create_test_app(true, Arc::new(EchoSynthesizer::new())).await;

    let response = app.oneshot(ask_request(json!({"question": "gamma"}))).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_ask_upstream_failure_is_bad_gateway() {
    let (app, _services, _temp) = create_test_app(true, Arc::new(FailingSynthesizer)).await;

    let response = app
        .oneshot(ask_request(json!({"query": "beta"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["status"], 502);
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn test_index_status() {
    let (app, _services, _temp) = create_test_app(false, Arc::new(EchoSynthesizer::new())).await;
    let response = app
        .oneshot(Request::builder().uri("/api/v1/index").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["loaded"], false);
    assert_eq!(body["entries"], 0);

    let (app, _services, _temp) = create_test_app(true, Arc::new(EchoSynthesizer::new())).await;
    let response = app
        .oneshot(Request::builder().uri("/api/v1/index").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["loaded"], true);
    assert_eq!(body["entries"], 3);
    assert_eq!(body["dimension"], 5);
}
