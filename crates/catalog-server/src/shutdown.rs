//! Signal handling and ordered release of process resources.

use async_trait::async_trait;
use catalog_core::telemetry::TelemetryGuard;
use catalog_core::{CatalogError, CatalogResult};
use catalog_repository::DatabasePoolInterface;
use catalog_service::CacheInterface;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// A resource released once the HTTP server has stopped.
#[async_trait]
pub trait ShutdownStep: Send {
    /// Name used in shutdown logs.
    fn name(&self) -> &'static str;

    async fn shutdown(self: Box<Self>) -> CatalogResult<()>;
}

/// Flushes and stops the span exporter.
pub struct TracerShutdown(pub TelemetryGuard);

#[async_trait]
impl ShutdownStep for TracerShutdown {
    fn name(&self) -> &'static str {
        "tracer"
    }

    async fn shutdown(self: Box<Self>) -> CatalogResult<()> {
        self.0.shutdown()
    }
}

/// Closes the Redis pool.
pub struct CacheShutdown(pub Arc<dyn CacheInterface>);

#[async_trait]
impl ShutdownStep for CacheShutdown {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn shutdown(self: Box<Self>) -> CatalogResult<()> {
        self.0.close();
        Ok(())
    }
}

/// Closes the MySQL pool once checked-out connections come back.
pub struct DatabaseShutdown(pub Arc<dyn DatabasePoolInterface>);

#[async_trait]
impl ShutdownStep for DatabaseShutdown {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn shutdown(self: Box<Self>) -> CatalogResult<()> {
        self.0.close().await;
        Ok(())
    }
}

/// The fixed release order: tracer, then cache, then database.
#[must_use]
pub fn shutdown_steps(
    telemetry: TelemetryGuard,
    cache: Arc<dyn CacheInterface>,
    database: Arc<dyn DatabasePoolInterface>,
) -> Vec<Box<dyn ShutdownStep>> {
    vec![
        Box::new(TracerShutdown(telemetry)),
        Box::new(CacheShutdown(cache)),
        Box::new(DatabaseShutdown(database)),
    ]
}

/// Runs every step in order, even after a failure.
///
/// # Errors
///
/// Returns the first step error; the rest are only logged.
pub async fn shutdown_all(steps: Vec<Box<dyn ShutdownStep>>) -> CatalogResult<()> {
    let mut first_error: Option<CatalogError> = None;
    let mut failures = 0_usize;

    for step in steps {
        let name = step.name();
        match step.shutdown().await {
            Ok(()) => info!("{} shutdown completed", name),
            Err(e) => {
                error!(error = %e, "Failed to shutdown {}", name);
                failures += 1;
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        None => {
            info!("Application shutdown completed successfully");
            Ok(())
        }
        Some(e) => {
            error!(failures, "Some components failed to shutdown gracefully");
            Err(e)
        }
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
