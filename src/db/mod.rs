//! Database module for the checkpoint engine
//!
//! Provides database connectivity, models, repositories, and error handling
//! for persistent storage of checkpoint definitions, instances, and tasks.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{DatabaseConnection, DatabasePool, MIGRATOR};
pub use error::{DatabaseError, DbResult};
