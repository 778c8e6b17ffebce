//! HTTP Basic authentication middleware.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use catalog_config::AuthConfig;
use std::sync::Arc;
use tracing::debug;

/// Credentials accepted by [`basic_auth_middleware`].
#[derive(Clone)]
pub struct BasicAuthState {
    credentials: Arc<AuthConfig>,
}

impl BasicAuthState {
    /// Creates the middleware state from configured credentials.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            credentials: Arc::new(config.clone()),
        }
    }

    /// Checks an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns the rejection for the first check that fails.
    pub fn authorize(&self, header: Option<&str>) -> Result<(), AppError> {
        let header = header.filter(|h| !h.is_empty()).ok_or(AppError::Unauthorized("Unauthorized"))?;

        let encoded = match header.split_once(' ') {
            Some(("Basic", encoded)) => encoded,
            _ => return Err(AppError::Unauthorized("Invalid authentication format")),
        };

        let decoded = STANDARD
            .decode(encoded)
            .map_err(|_| AppError::Unauthorized("Invalid base64 encoding"))?;
        let decoded = String::from_utf8_lossy(&decoded);

        let (username, password) = decoded
            .split_once(':')
            .ok_or(AppError::Unauthorized("Invalid credentials format"))?;

        if username != self.credentials.username || password != self.credentials.password {
            debug!("Rejected credentials for user '{}'", username);
            return Err(AppError::Unauthorized("Unauthorized"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for BasicAuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthState").finish_non_exhaustive()
    }
}

/// Rejects requests without valid Basic credentials.
pub async fn basic_auth_middleware(
    State(state): State<BasicAuthState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = request.headers().get(AUTHORIZATION).map(|h| h.to_str().unwrap_or_default());
    state.authorize(header)?;

    Ok(next.run(request).await)
}
