//! Orchestrator adapter
//!
//! Read facade the chat pipeline consumes at its three interleaving points.
//! The pipeline resolves the checkpoints for a position, surfaces them to
//! the participant, and blocks progression while a required checkpoint is
//! still pending.

use crate::db::connection::DatabasePool;
use crate::db::models::PipelinePosition;
use crate::engine::error::EngineResult;
use crate::engine::lifecycle;
use crate::engine::resolver::{self, ResolvedCheckpoint};

/// Read-only view over the checkpoint engine for pipeline consumers
#[derive(Clone)]
pub struct CheckpointGate {
    pool: DatabasePool,
}

impl CheckpointGate {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Active checkpoints at a position for a task, in stable order
    pub async fn resolve(
        &self,
        task_id: &str,
        position: PipelinePosition,
    ) -> EngineResult<Vec<ResolvedCheckpoint>> {
        resolver::resolve_for_task(&self.pool, task_id, position).await
    }

    /// A single checkpoint instance, scoped to its task
    pub async fn get(
        &self,
        task_id: &str,
        instance_id: &str,
    ) -> EngineResult<ResolvedCheckpoint> {
        lifecycle::get_instance(&self.pool, task_id, instance_id).await
    }

    /// True while the position holds a checkpoint that is not yet terminal
    ///
    /// The pipeline blocks progression when this is true for a required
    /// checkpoint's position.
    pub async fn has_pending(
        &self,
        task_id: &str,
        position: PipelinePosition,
    ) -> EngineResult<bool> {
        resolver::has_pending(&self.pool, task_id, position).await
    }
}
