//! Database models
//!
//! Core data models for persistent storage in the checkpoint engine database.
//! All timestamp fields are stored as RFC3339 strings (TEXT in SQLite) due to
//! sqlx and SQLite type limitations with chrono::DateTime<Utc>; JSON-valued
//! columns are stored as TEXT.

pub mod definition;
pub mod enums;
pub mod instance;
pub mod task;

pub use definition::CheckpointDefinition;
pub use enums::{CheckpointState, PipelinePosition, TaskMode};
pub use instance::CheckpointInstance;
pub use task::StudyTask;
