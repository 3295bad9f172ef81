//! REST API layer for the checkpoint engine
//!
//! Provides HTTP/JSON endpoints for:
//! - Checkpoint definition administration (CRUD, toggle, soft delete)
//! - Per-task checkpoint resolution and lifecycle transitions
//! - System health

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::{create_router, AppState};
