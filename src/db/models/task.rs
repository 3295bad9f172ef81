//! Study task model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::enums::TaskMode;

/// A participant task as the engine sees it
///
/// Tasks are owned by the session layer; the engine persists only the fields
/// it reads — identity, the mode that drives checkpoint resolution, and the
/// question context.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudyTask {
    /// Unique task identifier (UUID string)
    pub id: String,

    /// Experimental condition: baseline, hitl_r, hitl_g, hitl_full
    pub mode: String,

    /// Ticker symbol of the document under study
    pub ticker: String,

    /// Participant question text
    pub query_text: String,

    /// Creation timestamp (RFC3339 string)
    pub created_at: String,

    /// Completion timestamp (RFC3339 string, optional)
    pub completed_at: Option<String>,
}

impl StudyTask {
    /// Parsed task mode
    pub fn task_mode(&self) -> DbResult<TaskMode> {
        TaskMode::parse(&self.mode).ok_or_else(|| {
            DatabaseError::type_error(format!("Unknown task mode '{}' on task {}", self.mode, self.id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_mode_parses() {
        let task = StudyTask {
            id: "task-1".to_string(),
            mode: "hitl_full".to_string(),
            ticker: "AAPL".to_string(),
            query_text: "What are the key risk factors?".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            completed_at: None,
        };
        assert_eq!(task.task_mode().unwrap(), TaskMode::HitlFull);
    }
}
