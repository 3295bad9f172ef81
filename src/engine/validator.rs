//! Submission validator
//!
//! Checks a submission map against a frozen field schema and either returns
//! the accepted, normalized mapping or an ordered list of field-level issues.
//! Pure and deterministic: no I/O, no clock.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine::schema::{FieldDefinition, FieldType};

/// A single field-level validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub key: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a submission against a field schema
///
/// Unknown keys are dropped silently unless `strict` is set, in which case
/// they produce an issue. On success the returned map contains only known
/// keys, with defaults substituted for absent non-required fields and absent
/// non-required checkboxes normalized to `false`.
pub fn validate_submission(
    fields: &[FieldDefinition],
    data: &Map<String, Value>,
    strict: bool,
) -> Result<Map<String, Value>, Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    let mut normalized = Map::new();

    if strict {
        for key in data.keys() {
            if !fields.iter().any(|f| f.key == *key) {
                issues.push(ValidationIssue::new(key, "Unexpected field"));
            }
        }
    }

    for field in fields {
        let value = data.get(&field.key).filter(|v| !v.is_null());

        if field.required && is_empty_value(value) {
            issues.push(ValidationIssue::new(&field.key, "This field is required."));
            continue;
        }

        let Some(value) = value else {
            // Defaults apply only to optional fields; required means the
            // participant must provide the value.
            if let Some(default) = &field.default {
                normalized.insert(field.key.clone(), default.clone());
            } else if field.field_type == FieldType::Checkbox {
                normalized.insert(field.key.clone(), Value::Bool(false));
            }
            continue;
        };

        match check_field_value(field, value) {
            Ok(()) => {
                normalized.insert(field.key.clone(), value.clone());
            }
            Err(field_issues) => issues.extend(field_issues),
        }
    }

    if issues.is_empty() {
        Ok(normalized)
    } else {
        Err(issues)
    }
}

/// Join issues into the one-line summary stored as `last_error`
pub fn summarize_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.key, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

fn option_values(field: &FieldDefinition) -> Vec<&str> {
    field
        .options
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|option| option.value.as_str())
        .collect()
}

fn check_field_value(field: &FieldDefinition, value: &Value) -> Result<(), Vec<ValidationIssue>> {
    let key = field.key.as_str();
    let mut issues = Vec::new();

    match field.field_type {
        FieldType::Text | FieldType::Textarea => {
            if !value.is_string() {
                issues.push(ValidationIssue::new(key, "Expected a string"));
            }
        }
        FieldType::Select | FieldType::Radio => match value.as_str() {
            None => issues.push(ValidationIssue::new(key, "Expected a string option")),
            Some(chosen) => {
                let allowed = option_values(field);
                if !allowed.is_empty() && !allowed.contains(&chosen) {
                    issues.push(ValidationIssue::new(key, "Value is not in allowed options"));
                }
            }
        },
        FieldType::MultiSelect | FieldType::Chips => match value.as_array() {
            Some(items) if items.iter().all(Value::is_string) => {
                let allowed = option_values(field);
                if !allowed.is_empty() {
                    let unknown = items
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|item| !allowed.contains(&item));
                    if unknown {
                        issues.push(ValidationIssue::new(
                            key,
                            "Contains values not in allowed options",
                        ));
                    }
                }
            }
            _ => issues.push(ValidationIssue::new(key, "Expected an array of strings")),
        },
        FieldType::Checkbox => {
            if !value.is_boolean() {
                issues.push(ValidationIssue::new(key, "Expected a boolean"));
            }
        }
        FieldType::Number | FieldType::Range => match value {
            Value::Number(number) => {
                let Some(number) = number.as_f64().filter(|n| n.is_finite()) else {
                    issues.push(ValidationIssue::new(key, "Expected a numeric value"));
                    return Err(issues);
                };
                if let Some(min) = field.min {
                    if number < min {
                        issues.push(ValidationIssue::new(key, format!("Value must be >= {}", min)));
                    }
                }
                if let Some(max) = field.max {
                    if number > max {
                        issues.push(ValidationIssue::new(key, format!("Value must be <= {}", max)));
                    }
                }
            }
            _ => issues.push(ValidationIssue::new(key, "Expected a numeric value")),
        },
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schema::FieldOption;
    use serde_json::json;

    fn field(key: &str, field_type: FieldType, required: bool) -> FieldDefinition {
        FieldDefinition {
            key: key.to_string(),
            field_type,
            label: key.to_string(),
            required,
            placeholder: None,
            options: None,
            min: None,
            max: None,
            default: None,
        }
    }

    fn with_options(mut f: FieldDefinition, values: &[&str]) -> FieldDefinition {
        f.options = Some(
            values
                .iter()
                .map(|v| FieldOption {
                    value: v.to_string(),
                    label: v.to_string(),
                })
                .collect(),
        );
        f
    }

    fn data(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_required_rejects_absent() {
        let fields = vec![field("notes", FieldType::Textarea, true)];
        let issues = validate_submission(&fields, &data(&[]), false).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "notes");
        assert_eq!(issues[0].message, "This field is required.");
    }

    #[test]
    fn test_required_rejects_empty_and_whitespace_strings() {
        let fields = vec![field("notes", FieldType::Textarea, true)];
        assert!(validate_submission(&fields, &data(&[("notes", json!(""))]), false).is_err());
        assert!(validate_submission(&fields, &data(&[("notes", json!("   "))]), false).is_err());
        assert!(validate_submission(&fields, &data(&[("notes", json!("hi"))]), false).is_ok());
    }

    #[test]
    fn test_required_rejects_empty_array() {
        let fields = vec![field("ids", FieldType::Chips, true)];
        assert!(validate_submission(&fields, &data(&[("ids", json!([]))]), false).is_err());
        assert!(
            validate_submission(&fields, &data(&[("ids", json!(["n1", "n2"]))]), false).is_ok()
        );
    }

    #[test]
    fn test_unknown_keys_dropped_when_lenient() {
        let fields = vec![field("notes", FieldType::Text, false)];
        let normalized = validate_submission(
            &fields,
            &data(&[("notes", json!("ok")), ("extra", json!(1))]),
            false,
        )
        .unwrap();
        assert_eq!(normalized.len(), 1);
        assert!(!normalized.contains_key("extra"));
    }

    #[test]
    fn test_unknown_keys_flagged_when_strict() {
        let fields = vec![field("notes", FieldType::Text, false)];
        let issues = validate_submission(
            &fields,
            &data(&[("notes", json!("ok")), ("extra", json!(1))]),
            true,
        )
        .unwrap_err();
        assert_eq!(issues[0].key, "extra");
        assert_eq!(issues[0].message, "Unexpected field");
    }

    #[test]
    fn test_text_rejects_numbers() {
        let fields = vec![field("notes", FieldType::Text, false)];
        let issues =
            validate_submission(&fields, &data(&[("notes", json!(42))]), false).unwrap_err();
        assert_eq!(issues[0].message, "Expected a string");
    }

    #[test]
    fn test_select_enforces_options() {
        let fields = vec![with_options(
            field("confidence", FieldType::Select, true),
            &["1", "2", "3"],
        )];
        assert!(
            validate_submission(&fields, &data(&[("confidence", json!("2"))]), false).is_ok()
        );
        let issues = validate_submission(&fields, &data(&[("confidence", json!("9"))]), false)
            .unwrap_err();
        assert_eq!(issues[0].message, "Value is not in allowed options");
    }

    #[test]
    fn test_select_without_options_accepts_any_string() {
        let fields = vec![field("choice", FieldType::Radio, false)];
        assert!(
            validate_submission(&fields, &data(&[("choice", json!("anything"))]), false).is_ok()
        );
    }

    #[test]
    fn test_multi_select_membership() {
        let fields = vec![with_options(
            field("picks", FieldType::MultiSelect, false),
            &["a", "b"],
        )];
        assert!(
            validate_submission(&fields, &data(&[("picks", json!(["a", "b"]))]), false).is_ok()
        );
        let issues = validate_submission(&fields, &data(&[("picks", json!(["a", "z"]))]), false)
            .unwrap_err();
        assert_eq!(issues[0].message, "Contains values not in allowed options");
    }

    #[test]
    fn test_chips_free_form_without_options() {
        let fields = vec![field("tags", FieldType::Chips, false)];
        assert!(
            validate_submission(&fields, &data(&[("tags", json!(["x", "y"]))]), false).is_ok()
        );
        let issues =
            validate_submission(&fields, &data(&[("tags", json!(["x", 3]))]), false).unwrap_err();
        assert_eq!(issues[0].message, "Expected an array of strings");
    }

    #[test]
    fn test_checkbox_requires_boolean() {
        let fields = vec![field("agree", FieldType::Checkbox, false)];
        assert!(
            validate_submission(&fields, &data(&[("agree", json!(true))]), false).is_ok()
        );
        let issues =
            validate_submission(&fields, &data(&[("agree", json!("yes"))]), false).unwrap_err();
        assert_eq!(issues[0].message, "Expected a boolean");
    }

    #[test]
    fn test_absent_checkbox_normalizes_to_false() {
        let fields = vec![field("agree", FieldType::Checkbox, false)];
        let normalized = validate_submission(&fields, &data(&[]), false).unwrap();
        assert_eq!(normalized.get("agree"), Some(&json!(false)));
    }

    #[test]
    fn test_number_bounds_inclusive() {
        let mut score = field("score", FieldType::Number, false);
        score.min = Some(1.0);
        score.max = Some(5.0);
        let fields = vec![score];

        assert!(validate_submission(&fields, &data(&[("score", json!(1))]), false).is_ok());
        assert!(validate_submission(&fields, &data(&[("score", json!(5))]), false).is_ok());

        let issues =
            validate_submission(&fields, &data(&[("score", json!(0))]), false).unwrap_err();
        assert_eq!(issues[0].message, "Value must be >= 1");

        let issues =
            validate_submission(&fields, &data(&[("score", json!(5.5))]), false).unwrap_err();
        assert_eq!(issues[0].message, "Value must be <= 5");
    }

    #[test]
    fn test_number_rejects_bool_and_string() {
        let fields = vec![field("score", FieldType::Range, false)];
        assert!(validate_submission(&fields, &data(&[("score", json!(true))]), false).is_err());
        assert!(validate_submission(&fields, &data(&[("score", json!("3"))]), false).is_err());
    }

    #[test]
    fn test_default_substituted_for_absent_optional() {
        let mut notes = field("notes", FieldType::Text, false);
        notes.default = Some(json!("n/a"));
        let fields = vec![notes];

        let normalized = validate_submission(&fields, &data(&[]), false).unwrap();
        assert_eq!(normalized.get("notes"), Some(&json!("n/a")));
    }

    #[test]
    fn test_default_not_applied_for_required() {
        let mut notes = field("notes", FieldType::Text, true);
        notes.default = Some(json!("n/a"));
        let fields = vec![notes];

        let issues = validate_submission(&fields, &data(&[]), false).unwrap_err();
        assert_eq!(issues[0].message, "This field is required.");
    }

    #[test]
    fn test_provided_value_beats_default() {
        let mut notes = field("notes", FieldType::Text, false);
        notes.default = Some(json!("n/a"));
        let fields = vec![notes];

        let normalized =
            validate_submission(&fields, &data(&[("notes", json!("real"))]), false).unwrap();
        assert_eq!(normalized.get("notes"), Some(&json!("real")));
    }

    #[test]
    fn test_null_treated_as_absent() {
        let fields = vec![field("agree", FieldType::Checkbox, false)];
        let normalized =
            validate_submission(&fields, &data(&[("agree", Value::Null)]), false).unwrap();
        assert_eq!(normalized.get("agree"), Some(&json!(false)));
    }

    #[test]
    fn test_issues_preserve_schema_order() {
        let fields = vec![
            field("first", FieldType::Text, true),
            field("second", FieldType::Text, true),
        ];
        let issues = validate_submission(&fields, &data(&[]), false).unwrap_err();
        assert_eq!(issues[0].key, "first");
        assert_eq!(issues[1].key, "second");
    }

    #[test]
    fn test_summarize_issues() {
        let issues = vec![
            ValidationIssue::new("a", "This field is required."),
            ValidationIssue::new("b", "Expected a string"),
        ];
        assert_eq!(
            summarize_issues(&issues),
            "a: This field is required.; b: Expected a string"
        );
    }

    #[test]
    fn test_validator_is_deterministic() {
        let fields = vec![with_options(
            field("confidence", FieldType::Select, true),
            &["1", "2"],
        )];
        let submission = data(&[("confidence", json!("1"))]);
        let first = validate_submission(&fields, &submission, false).unwrap();
        let second = validate_submission(&fields, &submission, false).unwrap();
        assert_eq!(first, second);
    }
}
