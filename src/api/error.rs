//! API error types and HTTP response conversion
//!
//! Provides custom error types for API operations with conversion to Axum
//! HTTP responses. Engine and database errors are translated to the matching
//! HTTP status codes; submission validation failures carry their field-level
//! issues in the 422 body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DatabaseError;
use crate::engine::{EngineError, ValidationIssue};

/// API error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ApiErrorResponse {
    /// Create a new API error response
    pub fn new(
        error: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// 422 body for checkpoint submission failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitValidationResponse {
    pub message: String,
    pub issues: Vec<ValidationIssue>,
    pub attempt_count: i64,
    pub max_retries: i64,
    pub retry_available: bool,
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Custom API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request-level validation error (e.g. malformed definition schema)
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Checkpoint submission failed field validation
    #[error("Checkpoint submission validation failed")]
    SubmitValidation {
        issues: Vec<ValidationIssue>,
        attempt_count: i64,
        max_retries: i64,
        retry_available: bool,
    },

    /// Conflict (duplicate slug, forbidden transition)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::SubmitValidation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseError(db_err) => {
                if db_err.is_not_found() {
                    StatusCode::NOT_FOUND
                } else if db_err.is_constraint_violation() {
                    StatusCode::CONFLICT
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

    /// Get the error code identifier
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::SubmitValidation { .. } => "VALIDATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::DatabaseError(db_err) => {
                if db_err.is_not_found() {
                    "DB_NOT_FOUND"
                } else if db_err.is_constraint_violation() {
                    "DB_CONSTRAINT_VIOLATION"
                } else {
                    "DB_ERROR"
                }
            }
        }
    }

    /// Get the error type name
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NotFound",
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::SubmitValidation { .. } => "ValidationError",
            ApiError::Conflict(_) => "Conflict",
            ApiError::InternalError(_) => "InternalError",
            ApiError::DatabaseError(_) => "DatabaseError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            ApiError::SubmitValidation {
                issues,
                attempt_count,
                max_retries,
                retry_available,
            } => {
                let body = SubmitValidationResponse {
                    message: "Checkpoint submission validation failed".to_string(),
                    issues,
                    attempt_count,
                    max_retries,
                    retry_available,
                };
                (status, Json(body)).into_response()
            }
            other => {
                let body =
                    ApiErrorResponse::new(other.error_type(), other.to_string(), other.code());
                tracing::error!("API Error: {:?}", body);
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::TaskNotFound(_)
            | EngineError::DefinitionNotFound(_)
            | EngineError::InstanceNotFound(_) => ApiError::NotFound(err.to_string()),
            EngineError::DuplicateControlType(_)
            | EngineError::SkipNotAllowed
            | EngineError::AlreadyFinalized { .. }
            | EngineError::RetryExhausted { .. }
            | EngineError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
            EngineError::ValidationFailure {
                issues,
                attempt_count,
                max_retries,
                retry_available,
            } => ApiError::SubmitValidation {
                issues,
                attempt_count,
                max_retries,
                retry_available,
            },
            EngineError::CorruptData(msg) => ApiError::InternalError(msg),
            EngineError::Database(db_err) => ApiError::DatabaseError(db_err),
        }
    }
}
