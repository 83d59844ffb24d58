//! # JobPortal Server
//!
//! Main entry point for the JobPortal API.

use anyhow::Context;
use jobportal_config::ConfigLoader;
use jobportal_core::telemetry::{init_logging, LogFormat};
use jobportal_server::{
    startup::{print_banner, print_startup_info, shutdown_signal},
    App,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_loader =
        ConfigLoader::from_default_location().context("Failed to load configuration")?;
    let config = config_loader.get().await;

    init_logging(
        &config.observability.log_level,
        LogFormat::parse(&config.observability.log_format),
    )
    .context("Failed to initialize logging")?;

    print_banner();
    info!("Starting JobPortal server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let addr = config.server.addr();
    let app = App::build(config).await.context("Failed to build application")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    print_startup_info(&addr, app.store().backend_name());

    app.serve(listener, shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}
