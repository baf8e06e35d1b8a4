//! Integration tests for the HTTP API

use std::sync::Arc;
use attune::core::{create_router, CascadeOrchestrator, SentimentAnalyzer, CRISIS_RESPONSE};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

fn create_test_router() -> Router {
    create_router(
        Arc::new(CascadeOrchestrator::template_only()),
        SentimentAnalyzer::default(),
    )
}

fn analyze_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], attune::VERSION);
    assert_eq!(json["generator"], "uninitialized");
}

#[tokio::test]
async fn test_analyze_returns_reply_and_scores() {
    let app = create_test_router();

    let response = app
        .oneshot(analyze_request(r#"{"text": "I am so happy about my new job!"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["text"], "I am so happy about my new job!");
    assert!(json["response"].as_str().unwrap().starts_with("Work stress"));

    let lexicon = json["lexicon_score"].as_f64().unwrap();
    let label = json["categorical_label"].as_i64().unwrap();
    assert!(lexicon > 0.0);
    assert_eq!(label, 1);
    let overall = json["overall_sentiment"].as_f64().unwrap();
    assert!((overall - (lexicon + label as f64) / 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_analyze_crisis() {
    let app = create_test_router();

    let response = app
        .oneshot(analyze_request(r#"{"text": "I want to kill myself"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["response"], CRISIS_RESPONSE);
}

#[tokio::test]
async fn test_analyze_missing_text() {
    for body in [r#"{}"#, r#"{"text": "   "}"#, r#"{"text": null}"#, "not json"] {
        let app = create_test_router();
        let response = app.oneshot(analyze_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Missing 'text' in request body");
    }
}

#[tokio::test]
async fn test_generator_status_after_fallback() {
    let app = create_test_router();

    // No contextual rule fires, so the generator is consulted
    let response = app
        .clone()
        .oneshot(analyze_request(r#"{"text": "The sky was grey."}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["generator"], "unavailable");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_router();

    let response = app
        .oneshot(Request::builder().uri("/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/analyze")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"), "allowed methods: {}", methods);
}

#[tokio::test]
async fn test_cross_origin_analyze_carries_cors_header() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header("origin", "http://localhost:3000")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"text": "The sky was grey."}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
