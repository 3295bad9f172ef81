//! Field schema data model
//!
//! Declarative descriptors for the input form a checkpoint renders. Pure
//! data: the engine stores them as JSON, freezes a copy per instance, and
//! feeds them to the validator. Rendering semantics live on the UI side,
//! keyed by control type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::error::{EngineError, EngineResult};

/// Supported field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    MultiSelect,
    Radio,
    Checkbox,
    Chips,
    Number,
    Range,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multi_select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Chips => "chips",
            FieldType::Number => "number",
            FieldType::Range => "range",
        }
    }

    /// All supported kinds, in catalog order
    pub fn all() -> &'static [FieldType] {
        &[
            FieldType::Text,
            FieldType::Textarea,
            FieldType::Select,
            FieldType::MultiSelect,
            FieldType::Radio,
            FieldType::Checkbox,
            FieldType::Chips,
            FieldType::Number,
            FieldType::Range,
        ]
    }

    /// Kinds whose values are drawn from declared options
    pub fn supports_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::MultiSelect | FieldType::Radio | FieldType::Chips
        )
    }

    /// Kinds that accept min/max bounds
    pub fn supports_bounds(&self) -> bool {
        matches!(self, FieldType::Number | FieldType::Range)
    }
}

/// One enumerated choice for select-like fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Descriptor of a single input field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Unique within the schema; matches submission keys
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Parse a stored JSON field schema column
pub fn parse_fields(raw: &str) -> EngineResult<Vec<FieldDefinition>> {
    serde_json::from_str(raw)
        .map_err(|e| EngineError::CorruptData(format!("Invalid field schema: {}", e)))
}

/// Serialize a field schema for storage
pub fn fields_to_json(fields: &[FieldDefinition]) -> EngineResult<String> {
    serde_json::to_string(fields)
        .map_err(|e| EngineError::CorruptData(format!("Unserializable field schema: {}", e)))
}

/// Structurally validate an admin-supplied field schema
///
/// Returns human-readable problems; empty means acceptable.
pub fn check_field_schema(fields: &[FieldDefinition]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen_keys = std::collections::HashSet::new();

    for field in fields {
        let key = field.key.trim();
        if key.is_empty() {
            problems.push("Field key cannot be empty".to_string());
            continue;
        }
        if !seen_keys.insert(key.to_string()) {
            problems.push(format!("Duplicate field key '{}'", key));
        }

        match field.field_type {
            FieldType::Select | FieldType::Radio => {
                let empty = field.options.as_ref().map_or(true, |o| o.is_empty());
                if empty {
                    problems.push(format!(
                        "Field '{}' of type {} requires options",
                        key,
                        field.field_type.as_str()
                    ));
                }
            }
            FieldType::Number | FieldType::Range => {
                if let (Some(min), Some(max)) = (field.min, field.max) {
                    if min > max {
                        problems.push(format!("Field '{}' has min greater than max", key));
                    }
                }
            }
            _ => {}
        }

        if field.options.is_some() && !field.field_type.supports_options() {
            problems.push(format!(
                "Field '{}' of type {} does not take options",
                key,
                field.field_type.as_str()
            ));
        }
        if (field.min.is_some() || field.max.is_some()) && !field.field_type.supports_bounds() {
            problems.push(format!(
                "Field '{}' of type {} does not take min/max bounds",
                key,
                field.field_type.as_str()
            ));
        }
    }

    problems
}
