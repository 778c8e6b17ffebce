//! CORS policy for the versioned API.

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Any origin; the CRUD methods; `Content-Type` and `Authorization` headers.
///
/// Preflight `OPTIONS` requests are answered by the layer itself, so it must
/// wrap the authentication middleware.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
