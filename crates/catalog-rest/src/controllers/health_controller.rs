//! Health check controller.

use crate::{
    responses::{ApiResponse, NO_CACHE_HEADERS},
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use catalog_service::probe;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Cache probe result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheHealthResponse {
    pub status: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub service: String,
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheStatsResponse {
    pub db_size: i64,
    pub timestamp: i64,
    /// Raw `INFO` output.
    pub info: String,
}

/// Cache flush acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheFlushResponse {
    pub message: String,
    pub timestamp: i64,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health-check", get(health_check))
        .route("/api/health/cache", get(cache_health))
        .route("/api/health/cache/stats", get(cache_stats))
        .route("/api/health/cache/flush", post(flush_cache))
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/api/health-check",
    tag = "health",
    responses((status = 200, description = "Service is alive", body = String))
)]
pub async fn health_check() -> impl IntoResponse {
    (NO_CACHE_HEADERS, "OK")
}

/// Cache round-trip check.
#[utoipa::path(
    get,
    path = "/api/health/cache",
    tag = "health",
    responses(
        (status = 200, description = "Cache is healthy", body = CacheHealthResponse),
        (status = 503, description = "Cache is unhealthy")
    )
)]
pub async fn cache_health(State(state): State<AppState>) -> ApiResponse<CacheHealthResponse> {
    match probe(state.cache.as_ref()).await {
        Ok(()) => ApiResponse::ok(
            "Cache is healthy",
            CacheHealthResponse {
                status: "healthy".to_string(),
                timestamp: chrono::Utc::now().timestamp(),
                service: "redis".to_string(),
            },
        ),
        Err(failure) => ApiResponse::failure(StatusCode::SERVICE_UNAVAILABLE, failure.to_string()),
    }
}

/// Redis `INFO` and `DBSIZE`.
#[utoipa::path(
    get,
    path = "/api/health/cache/stats",
    tag = "health",
    responses(
        (status = 200, description = "Cache statistics", body = CacheStatsResponse),
        (status = 500, description = "Statistics unavailable")
    )
)]
pub async fn cache_stats(State(state): State<AppState>) -> ApiResponse<CacheStatsResponse> {
    let info = match state.cache.info().await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "failed to get cache stats");
            return ApiResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get cache statistics");
        }
    };

    let db_size = match state.cache.db_size().await {
        Ok(size) => size,
        Err(e) => {
            error!(error = %e, "failed to get database size");
            return ApiResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get database size");
        }
    };

    ApiResponse::ok(
        "Cache statistics",
        CacheStatsResponse {
            db_size,
            timestamp: chrono::Utc::now().timestamp(),
            info,
        },
    )
}

/// Remove every cached entry.
#[utoipa::path(
    post,
    path = "/api/health/cache/flush",
    tag = "health",
    responses(
        (status = 200, description = "Cache flushed", body = CacheFlushResponse),
        (status = 500, description = "Flush failed")
    )
)]
pub async fn flush_cache(State(state): State<AppState>) -> ApiResponse<CacheFlushResponse> {
    if let Err(e) = state.cache.flush().await {
        error!(error = %e, "failed to flush cache");
        return ApiResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to flush cache");
    }

    ApiResponse::ok(
        "Cache flushed successfully",
        CacheFlushResponse {
            message: "All cache data cleared".to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        },
    )
}
