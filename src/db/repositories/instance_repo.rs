//! Checkpoint instance repository for database operations

use chrono::Utc;
use uuid::Uuid;

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::{CheckpointDefinition, CheckpointInstance, CheckpointState, PipelinePosition};

/// Mutation applied alongside a state transition
///
/// The transition itself stamps the timestamp matching the target state;
/// the patch carries the data that changes with it.
#[derive(Debug, Clone, Default)]
pub struct TransitionPatch {
    pub attempt_count: Option<i64>,
    pub last_error: Option<String>,
    pub clear_last_error: bool,
    pub submit_result: Option<String>,
    pub clear_failed_at: bool,
}

/// Checkpoint instance repository for managing instance database operations
pub struct CheckpointInstanceRepository;

impl CheckpointInstanceRepository {
    /// Find the instance for a `(task, definition)` pair
    pub async fn find(
        pool: &DatabasePool,
        task_id: &str,
        definition_id: &str,
    ) -> DbResult<Option<CheckpointInstance>> {
        let instance = sqlx::query_as::<_, CheckpointInstance>(
            "SELECT * FROM checkpoint_instances WHERE task_id = ? AND definition_id = ?",
        )
        .bind(task_id)
        .bind(definition_id)
        .fetch_optional(pool)
        .await?;
        Ok(instance)
    }

    /// Get an instance by id, scoped to its owning task
    pub async fn get_for_task(
        pool: &DatabasePool,
        task_id: &str,
        instance_id: &str,
    ) -> DbResult<Option<CheckpointInstance>> {
        let instance = sqlx::query_as::<_, CheckpointInstance>(
            "SELECT * FROM checkpoint_instances WHERE id = ? AND task_id = ?",
        )
        .bind(instance_id)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;
        Ok(instance)
    }

    /// Create the instance for a `(task, definition)` pair in state `pending`,
    /// freezing the definition's current field schema
    ///
    /// Idempotent under the uniqueness constraint: a concurrent create loses
    /// the insert race and observes the winner's row.
    pub async fn create(
        pool: &DatabasePool,
        task_id: &str,
        definition: &CheckpointDefinition,
        payload: Option<String>,
    ) -> DbResult<CheckpointInstance> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO checkpoint_instances (
                 id, task_id, definition_id, control_type, field_schema,
                 state, payload, attempt_count, created_at
             )
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?)
             ON CONFLICT (task_id, definition_id) DO NOTHING",
        )
        .bind(&id)
        .bind(task_id)
        .bind(&definition.id)
        .bind(&definition.control_type)
        .bind(&definition.field_schema)
        .bind(CheckpointState::Pending.as_str())
        .bind(payload)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find(pool, task_id, &definition.id)
            .await?
            .ok_or_else(|| {
                DatabaseError::not_found(format!(
                    "Instance for task {} definition {} missing after insert",
                    task_id, definition.id
                ))
            })
    }

    /// Apply a state transition with its patch, stamping the timestamp that
    /// belongs to the target state
    ///
    /// This is the only mutator for instance rows.
    pub async fn transition(
        pool: &DatabasePool,
        instance_id: &str,
        new_state: CheckpointState,
        patch: TransitionPatch,
    ) -> DbResult<CheckpointInstance> {
        let mut instance = sqlx::query_as::<_, CheckpointInstance>(
            "SELECT * FROM checkpoint_instances WHERE id = ?",
        )
        .bind(instance_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found(format!("Checkpoint instance {}", instance_id)))?;

        let now = Utc::now().to_rfc3339();
        instance.state = new_state.as_str().to_string();
        match new_state {
            CheckpointState::Offered => instance.offered_at = Some(now),
            CheckpointState::Submitted => instance.submitted_at = Some(now),
            CheckpointState::Failed | CheckpointState::TimedOut => instance.failed_at = Some(now),
            _ => {}
        }

        if let Some(attempt_count) = patch.attempt_count {
            instance.attempt_count = attempt_count;
        }
        if patch.clear_last_error {
            instance.last_error = None;
        } else if let Some(last_error) = patch.last_error {
            instance.last_error = Some(last_error);
        }
        if let Some(submit_result) = patch.submit_result {
            instance.submit_result = Some(submit_result);
        }
        if patch.clear_failed_at {
            instance.failed_at = None;
        }

        let updated = sqlx::query_as::<_, CheckpointInstance>(
            "UPDATE checkpoint_instances SET
                 state = ?, attempt_count = ?, last_error = ?, submit_result = ?,
                 failed_at = ?, offered_at = ?, submitted_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&instance.state)
        .bind(instance.attempt_count)
        .bind(&instance.last_error)
        .bind(&instance.submit_result)
        .bind(&instance.failed_at)
        .bind(&instance.offered_at)
        .bind(&instance.submitted_at)
        .bind(instance_id)
        .fetch_one(pool)
        .await?;

        Ok(updated)
    }

    /// List a task's instances, optionally filtered to one pipeline position,
    /// in resolver order
    pub async fn list_for_task(
        pool: &DatabasePool,
        task_id: &str,
        position: Option<PipelinePosition>,
    ) -> DbResult<Vec<CheckpointInstance>> {
        let instances = match position {
            Some(position) => {
                sqlx::query_as::<_, CheckpointInstance>(
                    "SELECT ci.* FROM checkpoint_instances ci
                     JOIN checkpoint_definitions d ON d.id = ci.definition_id
                     WHERE ci.task_id = ? AND d.pipeline_position = ?
                     ORDER BY d.sort_order ASC, d.created_at ASC",
                )
                .bind(task_id)
                .bind(position.as_str())
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CheckpointInstance>(
                    "SELECT ci.* FROM checkpoint_instances ci
                     JOIN checkpoint_definitions d ON d.id = ci.definition_id
                     WHERE ci.task_id = ?
                     ORDER BY d.pipeline_position ASC, d.sort_order ASC, d.created_at ASC",
                )
                .bind(task_id)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(instances)
    }

    /// Count terminal failures for a definition since `cutoff` (RFC3339)
    ///
    /// A terminal failure is a failed/timed-out instance whose retry budget
    /// is exhausted by a real attempt; validation failures leave
    /// `attempt_count` at zero and are excluded.
    pub async fn count_terminal_failures_since(
        pool: &DatabasePool,
        definition_id: &str,
        cutoff: &str,
        max_retries: i64,
    ) -> DbResult<i64> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM checkpoint_instances
             WHERE definition_id = ?
               AND state IN ('failed', 'timed_out')
               AND attempt_count > 0
               AND attempt_count >= ?
               AND failed_at IS NOT NULL
               AND failed_at >= ?",
        )
        .bind(definition_id)
        .bind(max_retries)
        .bind(cutoff)
        .fetch_one(pool)
        .await?;
        Ok(result.0)
    }
}
