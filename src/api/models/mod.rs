//! API data transfer objects (DTOs) and response models
//!
//! Provides request/response structures for API endpoints with validation.

pub mod definition;
pub mod instance;
pub mod task;

pub use definition::{
    CreateDefinitionRequest, DefinitionListQuery, DefinitionResponse, FieldTypeInfo,
    ToggleDefinitionRequest, UpdateDefinitionRequest,
};
pub use instance::{InstanceResponse, ResolveQuery, ResolvedCheckpointsResponse, SubmitRequest};
pub use task::{CreateTaskRequest, TaskResponse};

/// System health response
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// API version
    pub version: String,

    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn new(status: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            database: database.into(),
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
