//! Server spans with W3C trace-context propagation.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderMap, Request, Response},
};
use opentelemetry::propagation::Extractor;
use std::time::Duration;
use tracing::{field::Empty, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

/// Extracts the remote parent context from `traceparent`/`tracestate`.
#[must_use]
pub fn trace_context_from_headers(headers: &HeaderMap) -> opentelemetry::Context {
    opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(headers))
    })
}

/// Opens the server span, named after the matched route and parented on the
/// incoming trace context.
pub fn make_span(request: &Request<Body>) -> Span {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path().to_string(), |path| path.as_str().to_string());

    let span = tracing::info_span!(
        "http.request",
        otel.name = %route,
        otel.kind = "server",
        http.method = %request.method(),
        http.route = %route,
        http.status_code = Empty,
    );
    span.set_parent(trace_context_from_headers(request.headers()));
    span
}

/// Records the response status on the server span.
pub fn record_status(response: &Response<Body>, _latency: Duration, span: &Span) {
    span.record("http.status_code", response.status().as_u16());
}
