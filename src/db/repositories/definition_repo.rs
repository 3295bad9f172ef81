//! Checkpoint definition repository for database operations

use chrono::Utc;
use uuid::Uuid;

use crate::db::connection::DatabasePool;
use crate::db::error::DbResult;
use crate::db::models::{CheckpointDefinition, PipelinePosition};

/// Insert payload for a new checkpoint definition
#[derive(Debug, Clone)]
pub struct NewDefinition {
    pub control_type: String,
    pub label: String,
    pub description: String,
    /// JSON array of field descriptors
    pub field_schema: String,
    pub pipeline_position: PipelinePosition,
    pub sort_order: i64,
    pub applicable_modes: Vec<String>,
    pub required: bool,
    pub timeout_seconds: Option<i64>,
    pub max_retries: i64,
    pub circuit_breaker_threshold: i64,
    pub circuit_breaker_window_minutes: i64,
}

/// Partial update for a checkpoint definition
///
/// `control_type` is immutable; unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct DefinitionPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub field_schema: Option<String>,
    pub pipeline_position: Option<PipelinePosition>,
    pub sort_order: Option<i64>,
    pub applicable_modes: Option<Vec<String>>,
    pub required: Option<bool>,
    pub timeout_seconds: Option<i64>,
    pub max_retries: Option<i64>,
    pub circuit_breaker_threshold: Option<i64>,
    pub circuit_breaker_window_minutes: Option<i64>,
    pub enabled: Option<bool>,
}

/// Checkpoint definition repository for managing definition database operations
pub struct CheckpointDefinitionRepository;

impl CheckpointDefinitionRepository {
    /// Create a new checkpoint definition
    ///
    /// The unique index on `control_type` surfaces duplicates as a
    /// constraint violation.
    pub async fn create(
        pool: &DatabasePool,
        new: NewDefinition,
    ) -> DbResult<CheckpointDefinition> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let modes = serde_json::to_string(&new.applicable_modes).unwrap_or_else(|_| "[]".to_string());

        let created = sqlx::query_as::<_, CheckpointDefinition>(
            "INSERT INTO checkpoint_definitions (
                 id, control_type, label, description, field_schema,
                 pipeline_position, sort_order, applicable_modes, required,
                 timeout_seconds, max_retries, circuit_breaker_threshold,
                 circuit_breaker_window_minutes, enabled, created_at, updated_at
             )
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&id)
        .bind(&new.control_type)
        .bind(&new.label)
        .bind(&new.description)
        .bind(&new.field_schema)
        .bind(new.pipeline_position.as_str())
        .bind(new.sort_order)
        .bind(&modes)
        .bind(new.required)
        .bind(new.timeout_seconds)
        .bind(new.max_retries)
        .bind(new.circuit_breaker_threshold)
        .bind(new.circuit_breaker_window_minutes)
        .bind(true)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(created)
    }

    /// Get a definition by ID
    pub async fn get_by_id(
        pool: &DatabasePool,
        id: &str,
    ) -> DbResult<Option<CheckpointDefinition>> {
        let definition = sqlx::query_as::<_, CheckpointDefinition>(
            "SELECT * FROM checkpoint_definitions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(definition)
    }

    /// Get a definition by its control type slug
    pub async fn get_by_control_type(
        pool: &DatabasePool,
        control_type: &str,
    ) -> DbResult<Option<CheckpointDefinition>> {
        let definition = sqlx::query_as::<_, CheckpointDefinition>(
            "SELECT * FROM checkpoint_definitions WHERE control_type = ?",
        )
        .bind(control_type)
        .fetch_optional(pool)
        .await?;
        Ok(definition)
    }

    /// List definitions ordered by (pipeline_position, sort_order, created_at)
    pub async fn list(
        pool: &DatabasePool,
        include_disabled: bool,
    ) -> DbResult<Vec<CheckpointDefinition>> {
        let query = if include_disabled {
            "SELECT * FROM checkpoint_definitions
             ORDER BY pipeline_position ASC, sort_order ASC, created_at ASC"
        } else {
            "SELECT * FROM checkpoint_definitions WHERE enabled = 1
             ORDER BY pipeline_position ASC, sort_order ASC, created_at ASC"
        };
        let definitions = sqlx::query_as::<_, CheckpointDefinition>(query)
            .fetch_all(pool)
            .await?;
        Ok(definitions)
    }

    /// List enabled definitions at a pipeline position in stable resolver order
    pub async fn list_enabled_at(
        pool: &DatabasePool,
        position: PipelinePosition,
    ) -> DbResult<Vec<CheckpointDefinition>> {
        let definitions = sqlx::query_as::<_, CheckpointDefinition>(
            "SELECT * FROM checkpoint_definitions
             WHERE enabled = 1 AND pipeline_position = ?
             ORDER BY sort_order ASC, created_at ASC",
        )
        .bind(position.as_str())
        .fetch_all(pool)
        .await?;
        Ok(definitions)
    }

    /// Apply a partial update and refresh `updated_at`
    ///
    /// Returns None when the id is unknown.
    pub async fn update(
        pool: &DatabasePool,
        id: &str,
        patch: DefinitionPatch,
    ) -> DbResult<Option<CheckpointDefinition>> {
        let Some(mut definition) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };

        if let Some(label) = patch.label {
            definition.label = label;
        }
        if let Some(description) = patch.description {
            definition.description = description;
        }
        if let Some(field_schema) = patch.field_schema {
            definition.field_schema = field_schema;
        }
        if let Some(position) = patch.pipeline_position {
            definition.pipeline_position = position.as_str().to_string();
        }
        if let Some(sort_order) = patch.sort_order {
            definition.sort_order = sort_order;
        }
        if let Some(modes) = patch.applicable_modes {
            definition.applicable_modes =
                serde_json::to_string(&modes).unwrap_or_else(|_| "[]".to_string());
        }
        if let Some(required) = patch.required {
            definition.required = required;
        }
        if let Some(timeout_seconds) = patch.timeout_seconds {
            definition.timeout_seconds = Some(timeout_seconds);
        }
        if let Some(max_retries) = patch.max_retries {
            definition.max_retries = max_retries;
        }
        if let Some(threshold) = patch.circuit_breaker_threshold {
            definition.circuit_breaker_threshold = threshold;
        }
        if let Some(window) = patch.circuit_breaker_window_minutes {
            definition.circuit_breaker_window_minutes = window;
        }
        if let Some(enabled) = patch.enabled {
            definition.enabled = enabled;
        }
        definition.updated_at = Utc::now().to_rfc3339();

        let updated = sqlx::query_as::<_, CheckpointDefinition>(
            "UPDATE checkpoint_definitions SET
                 label = ?, description = ?, field_schema = ?,
                 pipeline_position = ?, sort_order = ?, applicable_modes = ?,
                 required = ?, timeout_seconds = ?, max_retries = ?,
                 circuit_breaker_threshold = ?, circuit_breaker_window_minutes = ?,
                 enabled = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&definition.label)
        .bind(&definition.description)
        .bind(&definition.field_schema)
        .bind(&definition.pipeline_position)
        .bind(definition.sort_order)
        .bind(&definition.applicable_modes)
        .bind(definition.required)
        .bind(definition.timeout_seconds)
        .bind(definition.max_retries)
        .bind(definition.circuit_breaker_threshold)
        .bind(definition.circuit_breaker_window_minutes)
        .bind(definition.enabled)
        .bind(&definition.updated_at)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(Some(updated))
    }

    /// Flip the enabled flag and refresh `updated_at`
    ///
    /// Returns None when the id is unknown.
    pub async fn set_enabled(
        pool: &DatabasePool,
        id: &str,
        enabled: bool,
    ) -> DbResult<Option<CheckpointDefinition>> {
        let now = Utc::now().to_rfc3339();
        let updated = sqlx::query_as::<_, CheckpointDefinition>(
            "UPDATE checkpoint_definitions SET enabled = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(enabled)
        .bind(&now)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(updated)
    }
}
