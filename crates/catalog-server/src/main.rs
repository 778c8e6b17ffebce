//! # Catalog Server
//!
//! Entry point for the product and category API.

use catalog_config::ConfigLoader;
use catalog_core::telemetry::init_telemetry;
use catalog_core::CatalogResult;
use catalog_server::app::Application;
use catalog_server::shutdown::shutdown_signal;
use catalog_server::startup::print_banner;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Configuration errors surface before the subscriber exists.
        if tracing::dispatcher::has_been_set() {
            error!("Application error: {}", e);
        } else {
            eprintln!("Application error: {e}");
        }
        std::process::exit(1);
    }
}

async fn run() -> CatalogResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    let telemetry = init_telemetry(&config.observability.logging, &config.observability.telemetry)?;

    print_banner();
    info!("Starting {} v{}", config.app.name, config.app.version);

    let app = Application::build(config, telemetry).await?;
    app.run_until(shutdown_signal()).await
}
