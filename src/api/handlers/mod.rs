//! API request handlers
//!
//! Provides handler functions for all API endpoints organized by resource.

pub mod checkpoints;
pub mod definitions;
pub mod health;
pub mod tasks;

pub use checkpoints::{
    get_task_checkpoint, resolve_task_checkpoints, retry_task_checkpoint, skip_task_checkpoint,
    submit_task_checkpoint, timeout_task_checkpoint,
};
pub use definitions::{
    create_definition, delete_definition, get_definition, list_definitions, list_field_types,
    toggle_definition, update_definition,
};
pub use health::{health, health_detailed};
pub use tasks::{create_task, get_task};
