use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use game_core::{MemoryPreferenceStore, PreferenceStore};
use game_persistence::{PreferenceRepository, connect_and_migrate};
use game_server::{config::Config, create_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Rock Paper Scissors server...");

    let config = Config::from_env()?;

    // Theme preferences are best effort: without a database they live in memory
    let store: Arc<dyn PreferenceStore> = match connect_and_migrate(&config.database_url).await {
        Ok(db) => Arc::new(PreferenceRepository::new(db)),
        Err(e) => {
            warn!(
                "Preference database '{}' unavailable ({}), keeping preferences in memory",
                config.database_url, e
            );
            Arc::new(MemoryPreferenceStore::new())
        }
    };

    let routes = create_routes(Arc::new(config.session_settings()), store);

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (config.host.parse::<std::net::IpAddr>()?, config.port);

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .map_err(|e| anyhow::anyhow!("Failed to bind {}:{}: {}", config.host, config.port, e))?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    // Wait for SIGINT (Ctrl+C) or SIGTERM
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal as unix_signal};

        match (
            unix_signal(SignalKind::interrupt()),
            unix_signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
            }
            _ => {
                error!("Failed to install signal handlers, falling back to Ctrl+C");
                if let Err(e) = signal::ctrl_c().await {
                    error!("Failed to listen for ctrl+c: {}", e);
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
