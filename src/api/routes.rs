//! API route definitions
//!
//! Defines all API routes and their associated handler functions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{handlers, middleware};
use crate::db::DatabaseConnection;
use crate::engine::CheckpointGate;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub gate: CheckpointGate,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        let gate = CheckpointGate::new(db.pool().clone());
        Self { db, gate }
    }
}

/// Build the complete API router
pub fn create_router(db: DatabaseConnection) -> Router {
    let app_state = AppState::new(db);

    Router::new()
        // Health check endpoints
        .route("/health", get(handlers::health))
        .route("/health/detailed", get(handlers::health_detailed))
        // Definition admin endpoints
        .route(
            "/checkpoints/definitions",
            post(handlers::create_definition).get(handlers::list_definitions),
        )
        .route("/checkpoints/field-types", get(handlers::list_field_types))
        .route(
            "/checkpoints/definitions/:id",
            get(handlers::get_definition)
                .put(handlers::update_definition)
                .delete(handlers::delete_definition),
        )
        .route(
            "/checkpoints/definitions/:id/toggle",
            post(handlers::toggle_definition),
        )
        // Task seam endpoints
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/:task_id", get(handlers::get_task))
        // Per-task checkpoint endpoints
        .route(
            "/tasks/:task_id/checkpoints",
            get(handlers::resolve_task_checkpoints),
        )
        .route(
            "/tasks/:task_id/checkpoints/:instance_id",
            get(handlers::get_task_checkpoint),
        )
        .route(
            "/tasks/:task_id/checkpoints/:instance_id/submit",
            post(handlers::submit_task_checkpoint),
        )
        .route(
            "/tasks/:task_id/checkpoints/:instance_id/skip",
            post(handlers::skip_task_checkpoint),
        )
        .route(
            "/tasks/:task_id/checkpoints/:instance_id/retry",
            post(handlers::retry_task_checkpoint),
        )
        .route(
            "/tasks/:task_id/checkpoints/:instance_id/timeout",
            post(handlers::timeout_task_checkpoint),
        )
        .layer(middleware::logging_layer())
        .layer(middleware::cors_layer())
        .with_state(app_state)
}
