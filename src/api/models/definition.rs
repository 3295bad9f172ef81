//! Checkpoint definition API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{validate_not_empty, validate_slug};
use crate::db::models::{CheckpointDefinition, PipelinePosition};
use crate::db::repositories::{DefinitionPatch, NewDefinition};
use crate::engine::schema::{self, FieldDefinition, FieldType};

/// Request to create a new checkpoint definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDefinitionRequest {
    pub control_type: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub field_schema: Vec<FieldDefinition>,
    pub pipeline_position: PipelinePosition,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub applicable_modes: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub timeout_seconds: Option<i64>,
    #[serde(default = "default_max_retries")]
    pub max_retries: i64,
    #[serde(default = "default_breaker_threshold")]
    pub circuit_breaker_threshold: i64,
    #[serde(default = "default_breaker_window")]
    pub circuit_breaker_window_minutes: i64,
}

fn default_max_retries() -> i64 {
    2
}

fn default_breaker_threshold() -> i64 {
    5
}

fn default_breaker_window() -> i64 {
    60
}

impl CreateDefinitionRequest {
    /// Validate the create request and convert it to an insert payload
    pub fn into_new(self) -> ApiResult<NewDefinition> {
        validate_slug(&self.control_type, "control_type")?;
        validate_not_empty(&self.label, "label")?;
        check_policy(
            self.max_retries,
            self.timeout_seconds,
            self.circuit_breaker_threshold,
            self.circuit_breaker_window_minutes,
        )?;
        check_schema(&self.field_schema)?;

        Ok(NewDefinition {
            control_type: self.control_type,
            label: self.label,
            description: self.description,
            field_schema: schema::fields_to_json(&self.field_schema)
                .map_err(|e| ApiError::InternalError(e.to_string()))?,
            pipeline_position: self.pipeline_position,
            sort_order: self.sort_order,
            applicable_modes: self.applicable_modes,
            required: self.required,
            timeout_seconds: self.timeout_seconds,
            max_retries: self.max_retries,
            circuit_breaker_threshold: self.circuit_breaker_threshold,
            circuit_breaker_window_minutes: self.circuit_breaker_window_minutes,
        })
    }
}

/// Partial update to a checkpoint definition; `control_type` is immutable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDefinitionRequest {
    pub label: Option<String>,
    pub description: Option<String>,
    pub field_schema: Option<Vec<FieldDefinition>>,
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

impl UpdateDefinitionRequest {
    /// True when at least one field is set
    pub fn has_updates(&self) -> bool {
        self.label.is_some()
            || self.description.is_some()
            || self.field_schema.is_some()
            || self.pipeline_position.is_some()
            || self.sort_order.is_some()
            || self.applicable_modes.is_some()
            || self.required.is_some()
            || self.timeout_seconds.is_some()
            || self.max_retries.is_some()
            || self.circuit_breaker_threshold.is_some()
            || self.circuit_breaker_window_minutes.is_some()
            || self.enabled.is_some()
    }

    /// Validate the update request and convert it to a repository patch
    pub fn into_patch(self) -> ApiResult<DefinitionPatch> {
        if let Some(label) = &self.label {
            validate_not_empty(label, "label")?;
        }
        if let Some(fields) = &self.field_schema {
            check_schema(fields)?;
        }
        if let Some(max_retries) = self.max_retries {
            if max_retries < 0 {
                return Err(ApiError::ValidationError(
                    "max_retries must be non-negative".to_string(),
                ));
            }
        }
        if let Some(threshold) = self.circuit_breaker_threshold {
            if threshold < 1 {
                return Err(ApiError::ValidationError(
                    "circuit_breaker_threshold must be at least 1".to_string(),
                ));
            }
        }
        if let Some(window) = self.circuit_breaker_window_minutes {
            if window < 1 {
                return Err(ApiError::ValidationError(
                    "circuit_breaker_window_minutes must be at least 1".to_string(),
                ));
            }
        }
        if let Some(timeout) = self.timeout_seconds {
            if timeout < 1 {
                return Err(ApiError::ValidationError(
                    "timeout_seconds must be at least 1".to_string(),
                ));
            }
        }

        let field_schema = match &self.field_schema {
            Some(fields) => Some(
                schema::fields_to_json(fields)
                    .map_err(|e| ApiError::InternalError(e.to_string()))?,
            ),
            None => None,
        };

        Ok(DefinitionPatch {
            label: self.label,
            description: self.description,
            field_schema,
            pipeline_position: self.pipeline_position,
            sort_order: self.sort_order,
            applicable_modes: self.applicable_modes,
            required: self.required,
            timeout_seconds: self.timeout_seconds,
            max_retries: self.max_retries,
            circuit_breaker_threshold: self.circuit_breaker_threshold,
            circuit_breaker_window_minutes: self.circuit_breaker_window_minutes,
            enabled: self.enabled,
        })
    }
}

fn check_policy(
    max_retries: i64,
    timeout_seconds: Option<i64>,
    threshold: i64,
    window: i64,
) -> ApiResult<()> {
    if max_retries < 0 {
        return Err(ApiError::ValidationError(
            "max_retries must be non-negative".to_string(),
        ));
    }
    if let Some(timeout) = timeout_seconds {
        if timeout < 1 {
            return Err(ApiError::ValidationError(
                "timeout_seconds must be at least 1".to_string(),
            ));
        }
    }
    if threshold < 1 {
        return Err(ApiError::ValidationError(
            "circuit_breaker_threshold must be at least 1".to_string(),
        ));
    }
    if window < 1 {
        return Err(ApiError::ValidationError(
            "circuit_breaker_window_minutes must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn check_schema(fields: &[FieldDefinition]) -> ApiResult<()> {
    let problems = schema::check_field_schema(fields);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ApiError::ValidationError(problems.join("; ")))
    }
}

/// Toggle request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleDefinitionRequest {
    pub enabled: bool,
}

/// Query parameters for listing definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionListQuery {
    /// Include disabled definitions (default false)
    pub include_disabled: Option<bool>,
}

/// Checkpoint definition response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionResponse {
    pub id: String,
    pub control_type: String,
    pub label: String,
    pub description: String,
    pub field_schema: Vec<FieldDefinition>,
    pub pipeline_position: PipelinePosition,
    pub sort_order: i64,
    pub applicable_modes: Vec<String>,
    pub required: bool,
    pub timeout_seconds: Option<i64>,
    pub max_retries: i64,
    pub circuit_breaker_threshold: i64,
    pub circuit_breaker_window_minutes: i64,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl DefinitionResponse {
    /// Create a DefinitionResponse from the database model
    pub fn from_db(definition: CheckpointDefinition) -> ApiResult<Self> {
        let field_schema = schema::parse_fields(&definition.field_schema)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let pipeline_position = definition
            .position()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let applicable_modes = definition.modes();

        Ok(Self {
            id: definition.id,
            control_type: definition.control_type,
            label: definition.label,
            description: definition.description,
            field_schema,
            pipeline_position,
            sort_order: definition.sort_order,
            applicable_modes,
            required: definition.required,
            timeout_seconds: definition.timeout_seconds,
            max_retries: definition.max_retries,
            circuit_breaker_threshold: definition.circuit_breaker_threshold,
            circuit_breaker_window_minutes: definition.circuit_breaker_window_minutes,
            enabled: definition.enabled,
            created_at: definition.created_at,
            updated_at: definition.updated_at,
        })
    }
}

/// Catalog entry for a supported field kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTypeInfo {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub supports_options: bool,
    pub supports_bounds: bool,
}

impl FieldTypeInfo {
    /// The static catalog of supported field kinds
    pub fn catalog() -> Vec<FieldTypeInfo> {
        FieldType::all()
            .iter()
            .map(|field_type| FieldTypeInfo {
                field_type: *field_type,
                label: display_label(*field_type).to_string(),
                supports_options: field_type.supports_options(),
                supports_bounds: field_type.supports_bounds(),
            })
            .collect()
    }
}

fn display_label(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "Single-line text",
        FieldType::Textarea => "Multi-line text",
        FieldType::Select => "Dropdown select",
        FieldType::MultiSelect => "Multi select",
        FieldType::Radio => "Radio buttons",
        FieldType::Checkbox => "Checkbox",
        FieldType::Chips => "Chips",
        FieldType::Number => "Number input",
        FieldType::Range => "Range slider",
    }
}
