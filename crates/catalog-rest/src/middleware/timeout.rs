//! Envelope for requests cut off by the request timeout.

use crate::responses::ApiResponse;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// Replaces the bare 408 from `TimeoutLayer` with a failure envelope.
///
/// Must sit directly outside the timeout layer; handlers never answer 408.
pub async fn timeout_envelope(request: Request<Body>, next: Next) -> Response {
    let uri = request.uri().clone();
    let response = next.run(request).await;

    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    warn!(%uri, "request timed out");
    ApiResponse::<()>::failure(StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
}
