//! Checkpoint definition admin endpoint handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::api::{
    error::{ApiError, ApiResult},
    models::{
        CreateDefinitionRequest, DefinitionListQuery, DefinitionResponse, FieldTypeInfo,
        ToggleDefinitionRequest, UpdateDefinitionRequest,
    },
    response,
};
use crate::db::repositories::CheckpointDefinitionRepository;
use crate::engine::EngineError;

/// List checkpoint definitions in (position, sort_order, created_at) order
///
/// GET /checkpoints/definitions?include_disabled=bool
pub async fn list_definitions(
    State(app_state): State<crate::api::routes::AppState>,
    Query(query): Query<DefinitionListQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let include_disabled = query.include_disabled.unwrap_or(false);

    let pool = app_state.db.pool();
    let definitions = CheckpointDefinitionRepository::list(pool, include_disabled).await?;

    let responses = definitions
        .into_iter()
        .map(DefinitionResponse::from_db)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(response::ok(responses))
}

/// Create a new checkpoint definition
///
/// POST /checkpoints/definitions
pub async fn create_definition(
    State(app_state): State<crate::api::routes::AppState>,
    Json(req): Json<CreateDefinitionRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let new = req.into_new()?;

    let pool = app_state.db.pool();
    if CheckpointDefinitionRepository::get_by_control_type(pool, &new.control_type)
        .await?
        .is_some()
    {
        return Err(EngineError::DuplicateControlType(new.control_type).into());
    }

    let slug = new.control_type.clone();
    let created = CheckpointDefinitionRepository::create(pool, new)
        .await
        .map_err(|e| -> ApiError {
            // A concurrent create can slip past the pre-check; surface the
            // race as the same conflict.
            if e.is_constraint_violation() {
                EngineError::DuplicateControlType(slug.clone()).into()
            } else {
                e.into()
            }
        })?;

    tracing::info!(control_type = %created.control_type, "Created checkpoint definition");
    Ok(response::created(DefinitionResponse::from_db(created)?))
}

/// Get a single checkpoint definition by ID
///
/// GET /checkpoints/definitions/:id
pub async fn get_definition(
    State(app_state): State<crate::api::routes::AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let definition = CheckpointDefinitionRepository::get_by_id(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Checkpoint definition not found: {}", id)))?;

    Ok(response::ok(DefinitionResponse::from_db(definition)?))
}

/// Partially update a checkpoint definition (control_type is immutable)
///
/// PUT /checkpoints/definitions/:id
pub async fn update_definition(
    State(app_state): State<crate::api::routes::AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDefinitionRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    let patch = req.into_patch()?;

    let pool = app_state.db.pool();
    let updated = CheckpointDefinitionRepository::update(pool, &id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Checkpoint definition not found: {}", id)))?;

    tracing::info!(control_type = %updated.control_type, "Updated checkpoint definition");
    Ok(response::ok(DefinitionResponse::from_db(updated)?))
}

/// Enable or disable a checkpoint definition
///
/// POST /checkpoints/definitions/:id/toggle
pub async fn toggle_definition(
    State(app_state): State<crate::api::routes::AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleDefinitionRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let updated = CheckpointDefinitionRepository::set_enabled(pool, &id, req.enabled)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Checkpoint definition not found: {}", id)))?;

    tracing::info!(
        control_type = %updated.control_type,
        enabled = updated.enabled,
        "Toggled checkpoint definition"
    );
    Ok(response::ok(DefinitionResponse::from_db(updated)?))
}

/// Soft-delete a checkpoint definition (alias for toggle off)
///
/// DELETE /checkpoints/definitions/:id
pub async fn delete_definition(
    State(app_state): State<crate::api::routes::AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let updated = CheckpointDefinitionRepository::set_enabled(pool, &id, false)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Checkpoint definition not found: {}", id)))?;

    tracing::info!(control_type = %updated.control_type, "Soft-deleted checkpoint definition");
    Ok(response::ok(DefinitionResponse::from_db(updated)?))
}

/// Static catalog of supported field kinds
///
/// GET /checkpoints/field-types
pub async fn list_field_types() -> impl axum::response::IntoResponse {
    response::ok(FieldTypeInfo::catalog())
}
