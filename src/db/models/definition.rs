//! Checkpoint definition model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::enums::PipelinePosition;

/// Admin-owned template for a checkpoint kind
///
/// `field_schema` and `applicable_modes` are JSON TEXT columns; timestamps
/// are RFC3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckpointDefinition {
    /// Unique definition identifier (UUID string)
    pub id: String,

    /// Globally unique control slug (e.g., "chunk_selector")
    pub control_type: String,

    /// Display label
    pub label: String,

    /// Display description
    pub description: String,

    /// Ordered field descriptors (JSON array)
    pub field_schema: String,

    /// Pipeline position: after_retrieval, after_generation, post_generation
    pub pipeline_position: String,

    /// Ascending sort key within a pipeline position
    pub sort_order: i64,

    /// Mode tags this definition applies to; "*" matches any mode (JSON array)
    pub applicable_modes: String,

    /// Whether the pipeline blocks until this checkpoint is final
    pub required: bool,

    /// UI timer in seconds; absent disables the timer
    pub timeout_seconds: Option<i64>,

    /// Retry budget for infrastructure failures and timeouts
    pub max_retries: i64,

    /// Terminal failures within the window before the breaker trips
    pub circuit_breaker_threshold: i64,

    /// Sliding window for the breaker, in minutes
    pub circuit_breaker_window_minutes: i64,

    /// Disabled definitions produce no new instances
    pub enabled: bool,

    /// Creation timestamp (RFC3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC3339 string)
    pub updated_at: String,
}

impl CheckpointDefinition {
    /// Parsed pipeline position
    pub fn position(&self) -> DbResult<PipelinePosition> {
        PipelinePosition::parse(&self.pipeline_position).ok_or_else(|| {
            DatabaseError::type_error(format!(
                "Unknown pipeline position '{}' on definition {}",
                self.pipeline_position, self.id
            ))
        })
    }

    /// Parsed applicable mode tags; tolerates a malformed column as empty
    pub fn modes(&self) -> Vec<String> {
        serde_json::from_str(&self.applicable_modes).unwrap_or_default()
    }

    /// True when this definition applies to the given task mode
    pub fn applies_to_mode(&self, mode: &str) -> bool {
        let modes = self.modes();
        modes.iter().any(|m| m == "*" || m == mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition_with_modes(modes: &str) -> CheckpointDefinition {
        CheckpointDefinition {
            id: "def-1".to_string(),
            control_type: "chunk_selector".to_string(),
            label: "Chunk Selector".to_string(),
            description: String::new(),
            field_schema: "[]".to_string(),
            pipeline_position: "after_retrieval".to_string(),
            sort_order: 10,
            applicable_modes: modes.to_string(),
            required: true,
            timeout_seconds: None,
            max_retries: 2,
            circuit_breaker_threshold: 5,
            circuit_breaker_window_minutes: 60,
            enabled: true,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_applies_to_listed_mode() {
        let def = definition_with_modes(r#"["hitl_r", "hitl_full"]"#);
        assert!(def.applies_to_mode("hitl_r"));
        assert!(def.applies_to_mode("hitl_full"));
        assert!(!def.applies_to_mode("baseline"));
    }

    #[test]
    fn test_wildcard_matches_every_mode() {
        let def = definition_with_modes(r#"["*"]"#);
        assert!(def.applies_to_mode("baseline"));
        assert!(def.applies_to_mode("hitl_full"));
    }

    #[test]
    fn test_empty_modes_match_none() {
        let def = definition_with_modes("[]");
        assert!(!def.applies_to_mode("baseline"));
        assert!(!def.applies_to_mode("hitl_full"));
    }

    #[test]
    fn test_position_parse() {
        let def = definition_with_modes("[]");
        assert_eq!(def.position().unwrap(), PipelinePosition::AfterRetrieval);
    }
}
