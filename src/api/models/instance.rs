//! Checkpoint instance API models and DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::error::{ApiError, ApiResult};
use crate::db::models::{CheckpointState, PipelinePosition};
use crate::engine::resolver::ResolvedCheckpoint;
use crate::engine::schema::{self, FieldDefinition};

/// Checkpoint instance response for API
///
/// Combines the instance row with the display and policy fields of its
/// definition. The field schema shown is the instance's frozen copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceResponse {
    pub id: String,
    pub task_id: String,
    pub definition_id: String,
    pub control_type: String,
    pub label: String,
    pub state: CheckpointState,
    pub field_schema: Vec<FieldDefinition>,
    pub payload: Option<Value>,
    pub submit_result: Option<Value>,
    pub required: bool,
    pub timeout_seconds: Option<i64>,
    pub attempt_count: i64,
    pub max_retries: i64,
    pub last_error: Option<String>,
    pub offered_at: Option<String>,
    pub submitted_at: Option<String>,
    pub created_at: String,
}

impl InstanceResponse {
    /// Create an InstanceResponse from a resolved checkpoint
    pub fn from_resolved(resolved: ResolvedCheckpoint) -> ApiResult<Self> {
        let ResolvedCheckpoint {
            definition,
            instance,
        } = resolved;

        let state = instance
            .lifecycle_state()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let field_schema = schema::parse_fields(&instance.field_schema)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let payload = parse_json_column(instance.payload.as_deref())?;
        let submit_result = parse_json_column(instance.submit_result.as_deref())?;

        Ok(Self {
            id: instance.id,
            task_id: instance.task_id,
            definition_id: instance.definition_id,
            control_type: instance.control_type,
            label: definition.label,
            state,
            field_schema,
            payload,
            submit_result,
            required: definition.required,
            timeout_seconds: definition.timeout_seconds,
            attempt_count: instance.attempt_count,
            max_retries: definition.max_retries,
            last_error: instance.last_error,
            offered_at: instance.offered_at,
            submitted_at: instance.submitted_at,
            created_at: instance.created_at,
        })
    }
}

fn parse_json_column(raw: Option<&str>) -> ApiResult<Option<Value>> {
    match raw {
        None => Ok(None),
        Some(raw) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| ApiError::InternalError(format!("Corrupt JSON column: {}", e))),
    }
}

/// Resolution result for one pipeline position of a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedCheckpointsResponse {
    pub task_id: String,
    pub pipeline_position: PipelinePosition,
    pub checkpoints: Vec<InstanceResponse>,
}

/// Query parameters for resolving a task's checkpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveQuery {
    pub pipeline_position: PipelinePosition,
}

/// Submission body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub data: Map<String, Value>,
}
