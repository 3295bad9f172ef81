//! Study task API models and DTOs

use serde::{Deserialize, Serialize};

use crate::db::models::{StudyTask, TaskMode};

/// Request to create a new study task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub mode: TaskMode,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub query_text: String,
}

/// Study task response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: String,
    pub mode: String,
    pub ticker: String,
    pub query_text: String,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl TaskResponse {
    /// Create a TaskResponse from the database model
    pub fn from_db(task: StudyTask) -> Self {
        Self {
            id: task.id,
            mode: task.mode,
            ticker: task.ticker,
            query_text: task.query_text,
            created_at: task.created_at,
            completed_at: task.completed_at,
        }
    }
}
