//! Server startup utilities.

use tokio::signal;
use tracing::{info, warn};

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r"
       __      __    ____             __        __
      / /___  / /_  / __ \____  _____/ /_____ _/ /
 __  / / __ \/ __ \/ /_/ / __ \/ ___/ __/ __ `/ /
/ /_/ / /_/ / /_/ / ____/ /_/ / /  / /_/ /_/ / /
\____/\____/_.___/_/    \____/_/   \__/\__,_/_/
    "
    );
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str, cache_backend: &str) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1", addr);
    info!("Health:    http://{}/health", addr);
    info!("Cache:     http://{}/health/cache ({})", addr, cache_backend);
    info!("{}", separator);
}

/// Completes on Ctrl+C or SIGTERM.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info("0.0.0.0:8000", "memory");
    }
}
