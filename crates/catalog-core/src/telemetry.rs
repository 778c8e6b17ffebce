//! Logging and distributed tracing setup.
//!
//! Logs go through a `tracing-subscriber` registry. When tracing is enabled an
//! OpenTelemetry layer exports spans over OTLP, which Jaeger ingests directly.

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider as _;
#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::CatalogResult;
use serde::{Deserialize, Serialize};

/// Log output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Forces the `debug` level regardless of `level`.
    #[serde(default)]
    pub debug: bool,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default = "default_true")]
    pub json: bool,

    /// Annotate each event with its source file and line.
    #[serde(default = "default_true")]
    pub caller: bool,

    /// Install no log output at all.
    #[serde(default)]
    pub noop: bool,
}

fn default_level() -> String {
    "info".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            debug: false,
            json: true,
            caller: true,
            noop: false,
        }
    }
}

impl LoggingConfig {
    /// Returns the filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        if self.debug {
            "debug".to_string()
        } else {
            format!("{},tower_http=info,sqlx=warn", self.level)
        }
    }
}

/// Distributed tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether span export is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Service name reported to the collector.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP gRPC endpoint (e.g. `http://localhost:4317`).
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Sampling ratio (0.0 to 1.0).
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_service_name() -> String {
    "catalog-api".to_string()
}

const fn default_sampling_ratio() -> f64 {
    1.0
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: default_service_name(),
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

/// Keeps the tracer provider alive until shutdown.
#[derive(Debug, Default)]
pub struct TelemetryGuard {
    #[cfg(feature = "telemetry")]
    provider: Option<TracerProvider>,
}

impl TelemetryGuard {
    /// Returns true when spans are being exported.
    #[cfg(feature = "telemetry")]
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }

    /// Returns true when spans are being exported.
    #[cfg(not(feature = "telemetry"))]
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        false
    }

    /// Flushes pending spans and stops the exporter.
    #[cfg(feature = "telemetry")]
    pub fn shutdown(self) -> CatalogResult<()> {
        if let Some(provider) = self.provider {
            provider
                .shutdown()
                .map_err(|e| crate::CatalogError::Internal(format!("Tracer shutdown failed: {e}")))?;
            tracing::info!("Tracer provider shut down");
        }
        Ok(())
    }

    /// Flushes pending spans and stops the exporter.
    #[cfg(not(feature = "telemetry"))]
    pub fn shutdown(self) -> CatalogResult<()> {
        Ok(())
    }
}

/// Installs the global subscriber and, when enabled, the OTLP tracer.
///
/// Must be called once from within a Tokio runtime.
#[cfg(feature = "telemetry")]
pub fn init_telemetry(logging: &LoggingConfig, config: &TelemetryConfig) -> CatalogResult<TelemetryGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    let fmt_layer = (!logging.noop).then(|| {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(logging.caller)
            .with_line_number(logging.caller);
        if logging.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    });

    let provider = if config.enabled {
        Some(build_tracer_provider(config)?)
    } else {
        None
    };

    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer("catalog-api")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| crate::CatalogError::Internal(format!("Failed to install subscriber: {e}")))?;

    if let Some(provider) = &provider {
        opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());
        opentelemetry::global::set_tracer_provider(provider.clone());
        tracing::info!(
            service_name = %config.service_name,
            sampling_ratio = %config.sampling_ratio,
            otlp_endpoint = ?config.otlp_endpoint,
            "Telemetry initialized"
        );
    }

    Ok(TelemetryGuard { provider })
}

#[cfg(feature = "telemetry")]
fn build_tracer_provider(config: &TelemetryConfig) -> CatalogResult<TracerProvider> {
    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let resource = Resource::new(vec![KeyValue::new(SERVICE_NAME, config.service_name.clone())]);

    let builder = TracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(sampler)))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource);

    let Some(endpoint) = &config.otlp_endpoint else {
        return Ok(builder.build());
    };

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| crate::CatalogError::Internal(format!("Failed to create OTLP exporter: {e}")))?;

    Ok(builder.with_batch_exporter(exporter, runtime::Tokio).build())
}

/// Without the `telemetry` feature nothing is installed.
#[cfg(not(feature = "telemetry"))]
pub fn init_telemetry(_logging: &LoggingConfig, _config: &TelemetryConfig) -> CatalogResult<TelemetryGuard> {
    Ok(TelemetryGuard::default())
}
