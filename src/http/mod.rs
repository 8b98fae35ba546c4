//! HTTP REST adapter
//!
//! Depends only on core/. Exposes question answering and index
//! status over JSON via the Axum web framework.

pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

use crate::core::services::Services;

pub use handlers::*;

/// Build the API router
pub fn router(services: Arc<Services>) -> Router {
    let timeout = Duration::from_secs(services.config.server.request_timeout_sec);

    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/api/v1/ask", post(handlers::ask_handler))
        .route("/api/v1/index", get(handlers::index_status_handler))
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .with_state(services)
}
