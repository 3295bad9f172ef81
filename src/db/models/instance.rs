//! Checkpoint instance model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::enums::CheckpointState;

/// Per-task materialization of a checkpoint definition
///
/// `(task_id, definition_id)` is unique; `field_schema` is the schema copy
/// frozen at creation time, so later admin edits to the definition never
/// rewrite a live instance.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckpointInstance {
    /// Unique instance identifier (UUID string)
    pub id: String,

    /// Owning task
    pub task_id: String,

    /// Source definition
    pub definition_id: String,

    /// Denormalized control slug
    pub control_type: String,

    /// Field schema frozen at creation time (JSON array)
    pub field_schema: String,

    /// Lifecycle state
    pub state: String,

    /// Context supplied by the orchestrator (JSON)
    pub payload: Option<String>,

    /// Validated submission data; non-null iff submitted/collapsed (JSON)
    pub submit_result: Option<String>,

    /// Failed/timed-out attempts; submits never increment this
    pub attempt_count: i64,

    /// Most recent failure summary
    pub last_error: Option<String>,

    /// Timestamp of the most recent failure transition (RFC3339 string)
    pub failed_at: Option<String>,

    /// Timestamp of the offer transition (RFC3339 string)
    pub offered_at: Option<String>,

    /// Timestamp of the submit transition (RFC3339 string)
    pub submitted_at: Option<String>,

    /// Creation timestamp (RFC3339 string)
    pub created_at: String,
}

impl CheckpointInstance {
    /// Parsed lifecycle state
    pub fn lifecycle_state(&self) -> DbResult<CheckpointState> {
        CheckpointState::parse(&self.state).ok_or_else(|| {
            DatabaseError::type_error(format!(
                "Unknown checkpoint state '{}' on instance {}",
                self.state, self.id
            ))
        })
    }
}
