//! Greeting and health check endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Greeting response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /
async fn index(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Hello from the {}!", state.config.settings().app_name),
    })
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}
