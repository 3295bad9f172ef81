//! Study task endpoint handlers
//!
//! Minimal seam for the session layer: create a task with its mode and look
//! it up. Everything else about tasks belongs to external collaborators.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::{
    error::{ApiError, ApiResult},
    models::{CreateTaskRequest, TaskResponse},
    response,
};
use crate::db::repositories::TaskRepository;

/// Create a new study task
///
/// POST /tasks
pub async fn create_task(
    State(app_state): State<crate::api::routes::AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let created = TaskRepository::create(pool, req.mode, &req.ticker, &req.query_text).await?;

    tracing::info!(task_id = %created.id, mode = %created.mode, "Created study task");
    Ok(response::created(TaskResponse::from_db(created)))
}

/// Get a single study task by ID
///
/// GET /tasks/:task_id
pub async fn get_task(
    State(app_state): State<crate::api::routes::AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let task = TaskRepository::get_by_id(pool, &task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {}", task_id)))?;

    Ok(response::ok(TaskResponse::from_db(task)))
}
