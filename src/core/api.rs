//! HTTP API for Attune
//!
//! Endpoints:
//! - POST /analyze - Score text and produce a supportive reply
//! - GET /health - Health check

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::core::{CascadeOrchestrator, GeneratorStatus, SentimentAnalyzer};

/// App state
pub struct AppState {
    pub cascade: Arc<CascadeOrchestrator>,
    pub analyzer: SentimentAnalyzer,
}

/// Analyze request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Analyze response
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub text: String,
    pub lexicon_score: f64,
    pub categorical_label: i8,
    pub response: String,
    pub overall_sentiment: f64,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub generator: GeneratorStatus,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

/// Create the API router
pub fn create_router(cascade: Arc<CascadeOrchestrator>, analyzer: SentimentAnalyzer) -> Router {
    let state = Arc::new(AppState { cascade, analyzer });

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .layer(build_cors_layer())
        .with_state(state)
}

/// Browser clients are served from any origin.
///
/// - Origins: any
/// - Methods: GET, POST, OPTIONS
/// - Headers: Content-Type
pub fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        generator: state.cascade.generator_status(),
    })
}

/// Score the text and run the cascade.
///
/// Generation blocks, so the cascade runs on the blocking pool.
async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let text = match body.ok().and_then(|Json(req)| req.text) {
        Some(text) if !text.trim().is_empty() => text,
        _ => return error_response(StatusCode::BAD_REQUEST, "Missing 'text' in request body"),
    };

    let signal = state.analyzer.analyze(&text);
    let cascade = Arc::clone(&state.cascade);
    let input = text.clone();
    let joined = tokio::task::spawn_blocking(move || {
        cascade.produce_response(signal.lexicon_score, signal.categorical_label, &input)
    })
    .await;

    match joined {
        Ok(response) => Json(AnalyzeResponse {
            text,
            lexicon_score: signal.lexicon_score,
            categorical_label: signal.categorical_label,
            response,
            overall_sentiment: signal.average(),
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "cascade task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to produce a response")
        }
    }
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    cascade: Arc<CascadeOrchestrator>,
    analyzer: SentimentAnalyzer,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(cascade, analyzer);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Attune API listening");
    info!("  POST /analyze - Produce a reply");
    info!("  GET  /health  - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
