//! Checkpoint resolver
//!
//! Given a task and a pipeline position, selects the enabled,
//! mode-applicable, non-tripped definitions in stable order and returns one
//! instance per definition, creating missing instances on the way. Repeated
//! resolves are idempotent; creation races are settled by the
//! `(task_id, definition_id)` uniqueness constraint.

use tracing::debug;

use crate::db::connection::DatabasePool;
use crate::db::models::{
    CheckpointDefinition, CheckpointInstance, CheckpointState, PipelinePosition,
};
use crate::db::repositories::{
    CheckpointDefinitionRepository, CheckpointInstanceRepository, TaskRepository, TransitionPatch,
};
use crate::engine::breaker::FailureTracker;
use crate::engine::error::{EngineError, EngineResult};

/// A definition paired with the task's instance of it
#[derive(Debug, Clone)]
pub struct ResolvedCheckpoint {
    pub definition: CheckpointDefinition,
    pub instance: CheckpointInstance,
}

impl ResolvedCheckpoint {
    /// True while this checkpoint still needs participant input
    pub fn is_pending(&self) -> EngineResult<bool> {
        Ok(!self.instance.lifecycle_state()?.is_terminal())
    }
}

/// Resolve the checkpoints that surface at a pipeline position for a task
pub async fn resolve_for_task(
    pool: &DatabasePool,
    task_id: &str,
    position: PipelinePosition,
) -> EngineResult<Vec<ResolvedCheckpoint>> {
    let task = TaskRepository::get_by_id(pool, task_id)
        .await?
        .ok_or_else(|| EngineError::TaskNotFound(task_id.to_string()))?;
    let mode = task.task_mode()?;

    let definitions = CheckpointDefinitionRepository::list_enabled_at(pool, position).await?;

    let mut resolved = Vec::new();
    for definition in definitions {
        if !definition.applies_to_mode(mode.as_str()) {
            continue;
        }
        if FailureTracker::is_tripped(pool, &definition).await? {
            debug!(
                control_type = %definition.control_type,
                "Excluding tripped checkpoint definition from resolution"
            );
            continue;
        }

        let existing = CheckpointInstanceRepository::find(pool, task_id, &definition.id).await?;
        let instance = match existing {
            None => {
                let created =
                    CheckpointInstanceRepository::create(pool, task_id, &definition, None).await?;
                // A concurrent resolve may have advanced the row past pending
                // between the insert race and this read.
                offer_if_pending(pool, created).await?
            }
            Some(instance) => offer_if_pending(pool, instance).await?,
        };

        resolved.push(ResolvedCheckpoint {
            definition,
            instance,
        });
    }

    Ok(resolved)
}

/// True iff any resolved checkpoint at the position is not yet terminal
pub async fn has_pending(
    pool: &DatabasePool,
    task_id: &str,
    position: PipelinePosition,
) -> EngineResult<bool> {
    let resolved = resolve_for_task(pool, task_id, position).await?;
    for checkpoint in &resolved {
        if checkpoint.is_pending()? {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn offer_if_pending(
    pool: &DatabasePool,
    instance: CheckpointInstance,
) -> EngineResult<CheckpointInstance> {
    if instance.lifecycle_state()? != CheckpointState::Pending {
        return Ok(instance);
    }
    let offered = CheckpointInstanceRepository::transition(
        pool,
        &instance.id,
        CheckpointState::Offered,
        TransitionPatch::default(),
    )
    .await?;
    Ok(offered)
}
