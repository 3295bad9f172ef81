//! Checkpoint lifecycle controller
//!
//! Executes the submit / skip / retry / timeout / fail transitions. Guards
//! are narrow and read the explicit state, never timestamps. Failure
//! semantics are asymmetric: validation problems are participant errors and
//! never consume a retry, while infrastructure failures and timeouts
//! increment `attempt_count` and feed the circuit breaker.

use serde_json::{Map, Value};
use tracing::info;

use crate::db::connection::DatabasePool;
use crate::db::models::{CheckpointDefinition, CheckpointInstance, CheckpointState};
use crate::db::repositories::{
    CheckpointDefinitionRepository, CheckpointInstanceRepository, TransitionPatch,
};
use crate::engine::breaker::FailureTracker;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::resolver::ResolvedCheckpoint;
use crate::engine::schema;
use crate::engine::validator;

/// Load an instance scoped to its task, together with its definition
pub async fn get_instance(
    pool: &DatabasePool,
    task_id: &str,
    instance_id: &str,
) -> EngineResult<ResolvedCheckpoint> {
    let instance = CheckpointInstanceRepository::get_for_task(pool, task_id, instance_id)
        .await?
        .ok_or_else(|| EngineError::InstanceNotFound(instance_id.to_string()))?;

    let definition = CheckpointDefinitionRepository::get_by_id(pool, &instance.definition_id)
        .await?
        .ok_or_else(|| EngineError::DefinitionNotFound(instance.definition_id.clone()))?;

    Ok(ResolvedCheckpoint {
        definition,
        instance,
    })
}

/// Submit participant data for a checkpoint
///
/// On validation issues the instance moves to `failed` with the issue
/// summary as `last_error`, `attempt_count` untouched, and the issues are
/// returned in the error so the UI can render them inline.
pub async fn submit(
    pool: &DatabasePool,
    task_id: &str,
    instance_id: &str,
    data: &Map<String, Value>,
) -> EngineResult<ResolvedCheckpoint> {
    let ResolvedCheckpoint {
        definition,
        instance,
    } = get_instance(pool, task_id, instance_id).await?;

    let state = instance.lifecycle_state()?;
    if state.is_terminal() {
        return Err(EngineError::AlreadyFinalized { state });
    }
    if state.is_retry_eligible() && exhausted(&instance, &definition) {
        return Err(EngineError::RetryExhausted {
            attempt_count: instance.attempt_count,
            max_retries: definition.max_retries,
        });
    }

    let fields = schema::parse_fields(&instance.field_schema)?;
    match validator::validate_submission(&fields, data, false) {
        Err(issues) => {
            let updated = CheckpointInstanceRepository::transition(
                pool,
                instance_id,
                CheckpointState::Failed,
                TransitionPatch {
                    last_error: Some(validator::summarize_issues(&issues)),
                    ..Default::default()
                },
            )
            .await?;
            info!(
                instance_id = %instance_id,
                control_type = %updated.control_type,
                issues = issues.len(),
                "Checkpoint submission rejected by validator"
            );
            Err(EngineError::ValidationFailure {
                retry_available: updated.attempt_count < definition.max_retries,
                attempt_count: updated.attempt_count,
                max_retries: definition.max_retries,
                issues,
            })
        }
        Ok(normalized) => {
            let submit_result = serde_json::to_string(&normalized)
                .map_err(|e| EngineError::CorruptData(format!("Unserializable submission: {}", e)))?;
            let updated = CheckpointInstanceRepository::transition(
                pool,
                instance_id,
                CheckpointState::Submitted,
                TransitionPatch {
                    submit_result: Some(submit_result),
                    clear_last_error: true,
                    ..Default::default()
                },
            )
            .await?;
            info!(
                instance_id = %instance_id,
                control_type = %updated.control_type,
                "Checkpoint submitted"
            );
            Ok(ResolvedCheckpoint {
                definition,
                instance: updated,
            })
        }
    }
}

/// Skip an optional checkpoint; terminal
pub async fn skip(
    pool: &DatabasePool,
    task_id: &str,
    instance_id: &str,
) -> EngineResult<ResolvedCheckpoint> {
    let ResolvedCheckpoint {
        definition,
        instance,
    } = get_instance(pool, task_id, instance_id).await?;

    let state = instance.lifecycle_state()?;
    if state.is_terminal() {
        return Err(EngineError::AlreadyFinalized { state });
    }
    if definition.required {
        return Err(EngineError::SkipNotAllowed);
    }

    let updated = CheckpointInstanceRepository::transition(
        pool,
        instance_id,
        CheckpointState::Skipped,
        TransitionPatch {
            clear_last_error: true,
            ..Default::default()
        },
    )
    .await?;
    info!(
        instance_id = %instance_id,
        control_type = %updated.control_type,
        "Checkpoint skipped"
    );
    Ok(ResolvedCheckpoint {
        definition,
        instance: updated,
    })
}

/// Return a failed or timed-out checkpoint to `offered` for another attempt
///
/// Does not change `attempt_count`; the failure that preceded it already
/// counted.
pub async fn retry(
    pool: &DatabasePool,
    task_id: &str,
    instance_id: &str,
) -> EngineResult<ResolvedCheckpoint> {
    let ResolvedCheckpoint {
        definition,
        instance,
    } = get_instance(pool, task_id, instance_id).await?;

    let state = instance.lifecycle_state()?;
    if !state.is_retry_eligible() {
        return Err(EngineError::InvalidTransition { state });
    }
    if instance.attempt_count >= definition.max_retries {
        return Err(EngineError::RetryExhausted {
            attempt_count: instance.attempt_count,
            max_retries: definition.max_retries,
        });
    }

    let updated = CheckpointInstanceRepository::transition(
        pool,
        instance_id,
        CheckpointState::Offered,
        TransitionPatch {
            clear_last_error: true,
            clear_failed_at: true,
            ..Default::default()
        },
    )
    .await?;
    info!(
        instance_id = %instance_id,
        control_type = %updated.control_type,
        attempt_count = updated.attempt_count,
        "Checkpoint retried"
    );
    Ok(ResolvedCheckpoint {
        definition,
        instance: updated,
    })
}

/// Record a UI-side timer expiry
///
/// Idempotent: timing out an already timed-out instance is a no-op; timing
/// out a finalized one is rejected.
pub async fn timeout(
    pool: &DatabasePool,
    task_id: &str,
    instance_id: &str,
) -> EngineResult<ResolvedCheckpoint> {
    let ResolvedCheckpoint {
        definition,
        instance,
    } = get_instance(pool, task_id, instance_id).await?;

    let state = instance.lifecycle_state()?;
    if state.is_terminal() {
        return Err(EngineError::AlreadyFinalized { state });
    }
    if state == CheckpointState::TimedOut {
        return Ok(ResolvedCheckpoint {
            definition,
            instance,
        });
    }

    record_failure(
        pool,
        &definition,
        &instance,
        CheckpointState::TimedOut,
        "timed out".to_string(),
    )
    .await
}

/// Record a non-validation submission failure (internal)
pub async fn fail(
    pool: &DatabasePool,
    task_id: &str,
    instance_id: &str,
    error: String,
) -> EngineResult<ResolvedCheckpoint> {
    let ResolvedCheckpoint {
        definition,
        instance,
    } = get_instance(pool, task_id, instance_id).await?;

    let state = instance.lifecycle_state()?;
    if state.is_terminal() {
        return Err(EngineError::AlreadyFinalized { state });
    }

    record_failure(pool, &definition, &instance, CheckpointState::Failed, error).await
}

fn exhausted(instance: &CheckpointInstance, definition: &CheckpointDefinition) -> bool {
    // attempt_count > 0 keeps pure validation failures (which never
    // increment the counter) from locking out resubmission when
    // max_retries is zero.
    instance.attempt_count > 0 && instance.attempt_count >= definition.max_retries
}

async fn record_failure(
    pool: &DatabasePool,
    definition: &CheckpointDefinition,
    instance: &CheckpointInstance,
    target: CheckpointState,
    error: String,
) -> EngineResult<ResolvedCheckpoint> {
    let attempts = instance.attempt_count + 1;
    let updated = CheckpointInstanceRepository::transition(
        pool,
        &instance.id,
        target,
        TransitionPatch {
            attempt_count: Some(attempts),
            last_error: Some(error),
            ..Default::default()
        },
    )
    .await?;
    info!(
        instance_id = %updated.id,
        control_type = %updated.control_type,
        state = %updated.state,
        attempt_count = attempts,
        max_retries = definition.max_retries,
        "Checkpoint failure recorded"
    );

    if attempts >= definition.max_retries {
        FailureTracker::record_terminal_failure(pool, definition).await?;
    }

    Ok(ResolvedCheckpoint {
        definition: definition.clone(),
        instance: updated,
    })
}
