//! Health check endpoint handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::api::{models::HealthResponse, response, routes::AppState};

/// Handler for GET /health
///
/// Returns basic health status without a database check.
pub async fn health() -> impl axum::response::IntoResponse {
    response::ok(HealthResponse::new("ok", "unknown"))
}

/// Handler for GET /health/detailed
///
/// Returns detailed health status including database connectivity.
pub async fn health_detailed(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    match app_state.db.health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::new("ok", "connected"))),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::new("error", "error")),
        ),
    }
}
