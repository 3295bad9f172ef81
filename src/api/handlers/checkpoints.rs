//! Per-task checkpoint endpoint handlers
//!
//! Resolution and lifecycle transitions for a task's checkpoint instances.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::api::{
    error::ApiResult,
    models::{InstanceResponse, ResolveQuery, ResolvedCheckpointsResponse, SubmitRequest},
    response,
};
use crate::engine::lifecycle;

/// Resolve the checkpoints that surface at a pipeline position
///
/// GET /tasks/:task_id/checkpoints?pipeline_position=P
pub async fn resolve_task_checkpoints(
    State(app_state): State<crate::api::routes::AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<ResolveQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let resolved = app_state
        .gate
        .resolve(&task_id, query.pipeline_position)
        .await?;

    let checkpoints = resolved
        .into_iter()
        .map(InstanceResponse::from_resolved)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(response::ok(ResolvedCheckpointsResponse {
        task_id,
        pipeline_position: query.pipeline_position,
        checkpoints,
    }))
}

/// Get a single checkpoint instance
///
/// GET /tasks/:task_id/checkpoints/:instance_id
pub async fn get_task_checkpoint(
    State(app_state): State<crate::api::routes::AppState>,
    Path((task_id, instance_id)): Path<(String, String)>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let resolved = app_state.gate.get(&task_id, &instance_id).await?;
    Ok(response::ok(InstanceResponse::from_resolved(resolved)?))
}

/// Submit participant data for a checkpoint
///
/// POST /tasks/:task_id/checkpoints/:instance_id/submit
pub async fn submit_task_checkpoint(
    State(app_state): State<crate::api::routes::AppState>,
    Path((task_id, instance_id)): Path<(String, String)>,
    Json(req): Json<SubmitRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let resolved = lifecycle::submit(pool, &task_id, &instance_id, &req.data).await?;
    Ok(response::ok(InstanceResponse::from_resolved(resolved)?))
}

/// Skip an optional checkpoint
///
/// POST /tasks/:task_id/checkpoints/:instance_id/skip
pub async fn skip_task_checkpoint(
    State(app_state): State<crate::api::routes::AppState>,
    Path((task_id, instance_id)): Path<(String, String)>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let resolved = lifecycle::skip(pool, &task_id, &instance_id).await?;
    Ok(response::ok(InstanceResponse::from_resolved(resolved)?))
}

/// Return a failed or timed-out checkpoint to the offered state
///
/// POST /tasks/:task_id/checkpoints/:instance_id/retry
pub async fn retry_task_checkpoint(
    State(app_state): State<crate::api::routes::AppState>,
    Path((task_id, instance_id)): Path<(String, String)>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let resolved = lifecycle::retry(pool, &task_id, &instance_id).await?;
    Ok(response::ok(InstanceResponse::from_resolved(resolved)?))
}

/// Record a UI-side timer expiry
///
/// POST /tasks/:task_id/checkpoints/:instance_id/timeout
pub async fn timeout_task_checkpoint(
    State(app_state): State<crate::api::routes::AppState>,
    Path((task_id, instance_id)): Path<(String, String)>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let resolved = lifecycle::timeout(pool, &task_id, &instance_id).await?;
    Ok(response::ok(InstanceResponse::from_resolved(resolved)?))
}
