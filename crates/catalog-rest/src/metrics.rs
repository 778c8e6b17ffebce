//! Prometheus HTTP metrics.
//!
//! Every request increments a counter and records its latency, labelled by
//! status code, lowercase method and matched route template. Requests that
//! match no route share the `"404"` path label so unknown URLs cannot grow
//! the label set.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use catalog_core::{CatalogError, CatalogResult};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::{Duration, Instant};

/// Metric names.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "catalog_api_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "catalog_api_http_request_duration_seconds";
}

/// Latency histogram buckets, in seconds.
pub const DURATION_BUCKETS: [f64; 4] = [0.3, 1.0, 2.5, 5.0];

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "404";

/// A builder with the HTTP histogram buckets configured.
///
/// # Errors
///
/// Fails only if the bucket list is rejected by the exporter.
pub fn prometheus_builder() -> CatalogResult<PrometheusBuilder> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(names::HTTP_REQUEST_DURATION_SECONDS.to_string()),
            &DURATION_BUCKETS,
        )
        .map_err(|e| CatalogError::configuration(format!("Invalid metric buckets: {e}")))
}

/// Installs the global Prometheus recorder and describes the HTTP metrics.
///
/// # Errors
///
/// Fails when a global recorder is already installed.
pub fn install_recorder() -> CatalogResult<PrometheusHandle> {
    let handle = prometheus_builder()?
        .install_recorder()
        .map_err(|e| CatalogError::internal(format!("Failed to install metrics recorder: {e}")))?;
    describe_metrics();
    Ok(handle)
}

/// Registers help text for the HTTP metrics.
pub fn describe_metrics() {
    metrics::describe_counter!(
        names::HTTP_REQUESTS_TOTAL,
        "How many HTTP requests processed, partitioned by status code, method and HTTP path."
    );
    metrics::describe_histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "How long it took to process the request, partitioned by status code, method and HTTP path."
    );
}

/// Records one finished request.
pub fn record_request(code: u16, method: &str, path: &str, elapsed: Duration) {
    let code = code.to_string();
    let method = method.to_lowercase();
    let path = path.to_string();

    metrics::counter!(
        names::HTTP_REQUESTS_TOTAL,
        "code" => code.clone(),
        "method" => method.clone(),
        "path" => path.clone()
    )
    .increment(1);
    metrics::histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        "code" => code,
        "method" => method,
        "path" => path
    )
    .record(elapsed.as_secs_f64());
}

/// Middleware recording [`record_request`] for every request.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_PATH.to_string(), |p| p.as_str().to_string());

    let response = next.run(request).await;

    record_request(response.status().as_u16(), method.as_str(), &path, start.elapsed());
    response
}

async fn render(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}

/// Router serving the exposition text at `path`.
pub fn router<S>(handle: PrometheusHandle, path: &str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(path, get(render)).with_state(handle)
}
