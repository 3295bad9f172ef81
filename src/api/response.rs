//! API response helpers
//!
//! Thin helpers for the handful of success shapes the handlers produce.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Create a 200 OK JSON response
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(data))
}

/// Create a 201 Created JSON response
pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[derive(Serialize)]
    struct TestData {
        id: u32,
    }

    #[test]
    fn test_ok_status() {
        let response = ok(TestData { id: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_created_status() {
        let response = created(TestData { id: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
