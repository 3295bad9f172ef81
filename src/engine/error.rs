//! Engine error types
//!
//! One variant per user-visible failure kind, plus transparent database
//! passthrough. The API layer maps these onto HTTP statuses.

use thiserror::Error;

use crate::db::models::CheckpointState;
use crate::db::DatabaseError;
use crate::engine::validator::ValidationIssue;

/// Errors surfaced by engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Task id unknown
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Definition id unknown
    #[error("Checkpoint definition not found: {0}")]
    DefinitionNotFound(String),

    /// Instance id unknown (or not owned by the task)
    #[error("Checkpoint instance not found: {0}")]
    InstanceNotFound(String),

    /// Create conflict on the control type slug
    #[error("A checkpoint definition with control type '{0}' already exists")]
    DuplicateControlType(String),

    /// Submission failed field validation; does not consume a retry
    #[error("Checkpoint submission validation failed")]
    ValidationFailure {
        issues: Vec<ValidationIssue>,
        attempt_count: i64,
        max_retries: i64,
        retry_available: bool,
    },

    /// Skip attempted on a required definition
    #[error("Required checkpoints cannot be skipped")]
    SkipNotAllowed,

    /// Transition attempted from a terminal state
    #[error("Checkpoint is already finalized as {state}")]
    AlreadyFinalized { state: CheckpointState },

    /// Retry budget exhausted by real failures
    #[error("Retry budget exhausted ({attempt_count}/{max_retries})")]
    RetryExhausted {
        attempt_count: i64,
        max_retries: i64,
    },

    /// Transition not valid from the current state
    #[error("Transition not allowed from state {state}")]
    InvalidTransition { state: CheckpointState },

    /// Frozen schema or stored JSON failed to parse
    #[error("Corrupt stored data: {0}")]
    CorruptData(String),

    /// Storage failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Result type for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::TaskNotFound("t-1".to_string());
        assert!(format!("{}", err).contains("Task not found"));

        let err = EngineError::RetryExhausted {
            attempt_count: 2,
            max_retries: 2,
        };
        assert!(format!("{}", err).contains("2/2"));

        let err = EngineError::AlreadyFinalized {
            state: CheckpointState::Submitted,
        };
        assert!(format!("{}", err).contains("submitted"));
    }

    #[test]
    fn test_database_error_converts() {
        let err: EngineError = DatabaseError::not_found("row").into();
        assert!(matches!(err, EngineError::Database(_)));
    }
}
