//! Study task repository for database operations

use chrono::Utc;
use uuid::Uuid;

use crate::db::connection::DatabasePool;
use crate::db::error::DbResult;
use crate::db::models::{StudyTask, TaskMode};

/// Study task repository for managing task database operations
pub struct TaskRepository;

impl TaskRepository {
    /// Create a new study task
    pub async fn create(
        pool: &DatabasePool,
        mode: TaskMode,
        ticker: &str,
        query_text: &str,
    ) -> DbResult<StudyTask> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let task = sqlx::query_as::<_, StudyTask>(
            "INSERT INTO tasks (id, mode, ticker, query_text, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&id)
        .bind(mode.as_str())
        .bind(ticker)
        .bind(query_text)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Get a task by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<StudyTask>> {
        let task = sqlx::query_as::<_, StudyTask>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(task)
    }
}
