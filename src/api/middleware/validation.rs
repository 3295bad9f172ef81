//! Request validation utilities
//!
//! Validation helpers for ensuring request data meets requirements before it
//! reaches the engine.

use crate::api::error::{ApiError, ApiResult};

/// Validate that a required string field is not empty
pub fn validate_not_empty(value: &str, field_name: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!(
            "{} cannot be empty",
            field_name
        )));
    }
    Ok(())
}

/// Validate a control-type slug: lowercase alphanumeric plus underscores
pub fn validate_slug(value: &str, field_name: &str) -> ApiResult<()> {
    validate_not_empty(value, field_name)?;
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(ApiError::ValidationError(format!(
            "{} must contain only lowercase letters, digits, and underscores",
            field_name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty_valid() {
        assert!(validate_not_empty("hello", "name").is_ok());
    }

    #[test]
    fn test_validate_not_empty_empty() {
        assert!(validate_not_empty("", "name").is_err());
        assert!(validate_not_empty("   ", "name").is_err());
    }

    #[test]
    fn test_validate_slug_valid() {
        assert!(validate_slug("chunk_selector", "control_type").is_ok());
        assert!(validate_slug("q2_review", "control_type").is_ok());
    }

    #[test]
    fn test_validate_slug_invalid() {
        assert!(validate_slug("Chunk-Selector", "control_type").is_err());
        assert!(validate_slug("has space", "control_type").is_err());
        assert!(validate_slug("", "control_type").is_err());
    }
}
