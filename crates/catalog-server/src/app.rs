//! Application lifecycle.

use crate::di::{build_module, CatalogModule};
use crate::shutdown::{shutdown_all, shutdown_steps};
use crate::startup::print_startup_info;
use axum::Router;
use catalog_config::AppConfig;
use catalog_core::telemetry::TelemetryGuard;
use catalog_core::{CatalogError, CatalogResult, RequestValidator};
use catalog_repository::{DatabasePool, DatabasePoolInterface};
use catalog_rest::{create_router, metrics, AppState};
use catalog_service::{CacheInterface, RedisCacheService};
use shaku::HasComponent;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// A fully wired server waiting to be run.
pub struct Application {
    config: AppConfig,
    module: Arc<CatalogModule>,
    router: Router,
    telemetry: TelemetryGuard,
}

impl Application {
    /// Connects MySQL and Redis, builds the module and the router.
    ///
    /// The telemetry guard is kept so the tracer can be flushed during
    /// shutdown.
    ///
    /// # Errors
    ///
    /// Fails when a backing service is unreachable, migrations fail or the
    /// metrics recorder cannot be installed.
    pub async fn build(config: AppConfig, telemetry: TelemetryGuard) -> CatalogResult<Self> {
        let metrics_handle = if config.observability.metrics.enabled {
            Some(metrics::install_recorder()?)
        } else {
            None
        };

        info!("Initializing database connection");
        let db_pool = DatabasePool::connect(&config.database).await?;
        if config.database.run_migrations {
            if let Err(e) = db_pool.run_migrations().await {
                db_pool.close().await;
                return Err(e);
            }
        }
        info!("Database connection established successfully");

        info!("Initializing Redis cache connection");
        let cache = match RedisCacheService::connect(&config.redis).await {
            Ok(cache) => cache,
            Err(e) => {
                db_pool.close().await;
                return Err(e);
            }
        };
        info!("Redis cache connection established successfully");

        let module = build_module(&db_pool, &cache);
        let state = AppState::from_module(module.as_ref(), Arc::new(RequestValidator::new()));
        let router = create_router(state, &config, metrics_handle);

        Ok(Self {
            config,
            module,
            router,
            telemetry,
        })
    }

    /// Serves until `shutdown` resolves, then releases every resource.
    ///
    /// # Errors
    ///
    /// Returns the server error if there was one, otherwise the first
    /// shutdown step that failed.
    pub async fn run_until<F>(self, shutdown: F) -> CatalogResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server.addr();
        let grace = self.config.server.shutdown_timeout();

        let served = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                print_startup_info(&self.config, &addr);
                serve_with_grace(listener, self.router, shutdown, grace).await
            }
            Err(e) => Err(CatalogError::Internal(format!("Failed to bind {addr}: {e}"))),
        };

        info!("Starting graceful shutdown");
        match &served {
            Ok(()) => info!("HTTP server shutdown completed"),
            Err(e) => error!(error = %e, "Failed to shutdown HTTP server"),
        }

        let cache: Arc<dyn CacheInterface> = self.module.resolve();
        let database: Arc<dyn DatabasePoolInterface> = self.module.resolve();
        let released = shutdown_all(shutdown_steps(self.telemetry, cache, database)).await;

        served.and(released)
    }
}

/// Serves `router` on `listener` until `shutdown` resolves, then drains
/// in-flight requests for at most `grace`.
///
/// # Errors
///
/// Returns an error when the accept loop fails.
pub async fn serve_with_grace<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    grace: Duration,
) -> CatalogResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (draining_tx, draining_rx) = oneshot::channel::<()>();
    let signal = async move {
        shutdown.await;
        let _ = draining_tx.send(());
    };

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(signal)
        .into_future();
    tokio::pin!(server);

    let result = tokio::select! {
        result = &mut server => result,
        Ok(()) = draining_rx => {
            if let Ok(result) = tokio::time::timeout(grace, &mut server).await {
                result
            } else {
                warn!("Connections still open after {:?}, abandoning them", grace);
                Ok(())
            }
        }
    };

    result.map_err(|e| CatalogError::Internal(format!("HTTP server error: {e}")))
}
