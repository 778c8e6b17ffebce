//! Server startup utilities.

use catalog_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#);
}

/// Prints where each surface is reachable.
pub fn print_startup_info(config: &AppConfig, addr: &str) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    info!("REST API:    http://{}/api/v1", addr);
    info!("Health:      http://{}/api/health-check", addr);
    info!("Swagger:     http://{}/swagger/", addr);
    if config.observability.metrics.enabled {
        info!("Metrics:     http://{}{}", addr, config.observability.metrics.path);
    }
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_without_metrics() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        config.observability.metrics.enabled = false;
        print_startup_info(&config, "127.0.0.1:8080");
    }
}
