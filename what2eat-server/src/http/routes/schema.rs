//! Schema initialization endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use super::health::HealthResponse;
use crate::db::create_tables;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// POST /init-db - create missing tables
async fn init_db(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    create_tables(&state.db).await?;
    Ok(Json(HealthResponse { status: "ok" }))
}

/// Schema routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/init-db", post(init_db))
}
