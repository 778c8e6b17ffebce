//! Main application router.

use crate::{
    controllers::{category_controller, health_controller, product_controller},
    metrics,
    middleware::{
        basic_auth_middleware, cors_layer, logging_middleware, make_span, record_status, timeout_envelope,
        BasicAuthState,
    },
    openapi::ApiDoc,
    state::AppState,
};
use axum::{middleware, Router};
use catalog_config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the application router.
///
/// `/api/v1` is wrapped in CORS and Basic auth, with CORS outermost so
/// preflight requests never reach the auth check. The health, metrics and
/// documentation routes are public. Every route is timed for Prometheus,
/// traced, logged and bounded by the request timeout.
pub fn create_router(state: AppState, config: &AppConfig, metrics_handle: Option<PrometheusHandle>) -> Router {
    let auth_state = BasicAuthState::new(&config.auth);

    let api_router = Router::new()
        .merge(product_controller::router())
        .merge(category_controller::router())
        .layer(middleware::from_fn_with_state(auth_state, basic_auth_middleware))
        .layer(cors_layer());

    let mut router = Router::new()
        .merge(health_controller::router())
        .nest("/api/v1", api_router)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::router(handle, &config.observability.metrics.path));
    }

    let router = router
        .layer(middleware::from_fn(metrics::track_metrics))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(middleware::from_fn(timeout_envelope))
        .layer(TraceLayer::new_for_http().make_span_with(make_span).on_response(record_status))
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger");
    router
}
