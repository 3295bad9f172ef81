//! CORS middleware configuration
//!
//! The study UI is served from a separate dev origin, so the API allows
//! cross-origin requests.

use tower_http::cors::CorsLayer;

/// Create CORS layer for development (allows any origin)
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_creation() {
        let _cors = cors_layer();
    }
}
