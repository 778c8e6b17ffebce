//! API response types.
//!
//! Every JSON body is the `{success, message, data}` envelope and carries
//! headers that disable client and proxy caching.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::{CatalogError, FieldError};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Headers attached to every envelope.
pub const NO_CACHE_HEADERS: [(header::HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<T> ApiResponse<T> {
    /// A 200 success envelope.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status: StatusCode::OK,
        }
    }

    /// A 200 success envelope without data.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            status: StatusCode::OK,
        }
    }

    /// A failure envelope.
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, NO_CACHE_HEADERS, Json(self)).into_response()
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub enum AppError {
    /// 400 with a fixed message, e.g. an unparsable ID.
    BadRequest(&'static str),
    /// 400 listing every violated constraint.
    Validation(Vec<FieldError>),
    /// 401 with the failing check.
    Unauthorized(&'static str),
    /// A service error, mapped by its status code.
    Catalog(CatalogError),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                ApiResponse::<()>::failure(StatusCode::BAD_REQUEST, message).into_response()
            }
            Self::Validation(errors) => ApiResponse {
                success: false,
                message: "Validation error".to_string(),
                data: Some(errors),
                status: StatusCode::BAD_REQUEST,
            }
            .into_response(),
            Self::Unauthorized(message) => {
                ApiResponse::<()>::failure(StatusCode::UNAUTHORIZED, message).into_response()
            }
            Self::Catalog(err) => {
                let status =
                    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

                // Internal detail stays in the log.
                let message = match err {
                    _ if status.is_server_error() => {
                        error!(code = err.error_code(), retriable = err.is_retriable(), error = %err, "request failed");
                        "Internal server error".to_string()
                    }
                    CatalogError::Validation(message) => message,
                    other => other.to_string(),
                };

                ApiResponse::<()>::failure(status, message).into_response()
            }
        }
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;
