//! Repository pattern implementations for database access
//!
//! This module provides repository structs for managing database operations
//! on the core entities: checkpoint definitions, checkpoint instances, and
//! study tasks.

pub mod definition_repo;
pub mod instance_repo;
pub mod task_repo;

pub use definition_repo::{CheckpointDefinitionRepository, DefinitionPatch, NewDefinition};
pub use instance_repo::{CheckpointInstanceRepository, TransitionPatch};
pub use task_repo::TaskRepository;
