//! Per-definition circuit breaker
//!
//! Counts terminal failures for a definition inside a sliding window by
//! scanning instance rows. Trips are rare, so the scan happens only when a
//! terminal failure is recorded; a trip force-disables the definition and
//! requires an admin toggle to recover.

use chrono::{Duration, Utc};
use tracing::warn;

use crate::db::connection::DatabasePool;
use crate::db::models::CheckpointDefinition;
use crate::db::repositories::{CheckpointDefinitionRepository, CheckpointInstanceRepository};
use crate::engine::error::EngineResult;

/// Sliding-window failure tracker over the instance store
pub struct FailureTracker;

impl FailureTracker {
    fn window_cutoff(definition: &CheckpointDefinition) -> String {
        let window = Duration::minutes(definition.circuit_breaker_window_minutes.max(0));
        let cutoff = (Utc::now() - window).to_rfc3339();
        // An admin toggle refreshes updated_at; failures older than the last
        // admin touch no longer count, so re-enabling actually recovers.
        if definition.updated_at > cutoff {
            definition.updated_at.clone()
        } else {
            cutoff
        }
    }

    /// Count terminal failures for the definition inside its window
    pub async fn terminal_failure_count(
        pool: &DatabasePool,
        definition: &CheckpointDefinition,
    ) -> EngineResult<i64> {
        let cutoff = Self::window_cutoff(definition);
        let count = CheckpointInstanceRepository::count_terminal_failures_since(
            pool,
            &definition.id,
            &cutoff,
            definition.max_retries,
        )
        .await?;
        Ok(count)
    }

    /// True when failures in the window have reached the trip threshold
    pub async fn is_tripped(
        pool: &DatabasePool,
        definition: &CheckpointDefinition,
    ) -> EngineResult<bool> {
        let count = Self::terminal_failure_count(pool, definition).await?;
        Ok(count >= definition.circuit_breaker_threshold)
    }

    /// Record a terminal failure and trip the breaker when the threshold is
    /// reached
    ///
    /// Tripping force-disables the definition (`enabled = false`, refreshed
    /// `updated_at`) and logs a single warning. Returns true when this call
    /// tripped the breaker.
    pub async fn record_terminal_failure(
        pool: &DatabasePool,
        definition: &CheckpointDefinition,
    ) -> EngineResult<bool> {
        let count = Self::terminal_failure_count(pool, definition).await?;
        if count < definition.circuit_breaker_threshold || !definition.enabled {
            return Ok(false);
        }

        CheckpointDefinitionRepository::set_enabled(pool, &definition.id, false).await?;
        warn!(
            control_type = %definition.control_type,
            failures = count,
            threshold = definition.circuit_breaker_threshold,
            window_minutes = definition.circuit_breaker_window_minutes,
            "Circuit breaker tripped; checkpoint definition disabled"
        );
        Ok(true)
    }
}
