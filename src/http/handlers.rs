//! HTTP request handlers for the DocMind API
//!
//! Health, question answering and index status.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::core::error::DocMindError;
use crate::core::services::Services;
use crate::core::types::*;

/// Liveness check kept at the root path
pub async fn root_handler(State(services): State<Arc<Services>>) -> impl IntoResponse {
    Json(json!({
        "status": "online",
        "model": services.answer.model_name(),
    }))
}

/// Health check handler
///
/// Returns server status, version and the answer model in use.
pub async fn health_handler(State(services): State<Arc<Services>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: services.answer.model_name().to_string(),
    })
}

/// Ask handler
///
/// Answers a question from the loaded document index.
///
/// # Errors
///
/// - `InvalidQuery` (400): empty or over-long query
/// - `ServiceUnavailable` (503): no index loaded
/// - `AnswerGenerationFailed` (502): embedding or answer model failed
pub async fn ask_handler(
    State(services): State<Arc<Services>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<Answer>, DocMindError> {
    let answer = services.answer.answer(&req.query).await?;
    Ok(Json(answer))
}

/// Index status handler
pub async fn index_status_handler(
    State(services): State<Arc<Services>>,
) -> Json<IndexStatusResponse> {
    let status = match services.index.get() {
        Some(index) => IndexStatusResponse {
            loaded: true,
            entries: index.len(),
            dimension: index.dimension(),
        },
        None => IndexStatusResponse {
            loaded: false,
            entries: 0,
            dimension: None,
        },
    };
    Json(status)
}
