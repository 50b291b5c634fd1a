//! regenradar - An animated rain radar overlay
//!
//! This is the main entry point for the regenradar application. It attaches
//! the widget to a headless map surface and keeps it refreshing until shut down.

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use regenradar::surface::HeadlessSurface;
use regenradar::{init_tracing, BrightSkyClient, Config, RadarWidget, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing with the configured level
    init_tracing(&config.log_level);

    info!("Starting regenradar v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let client = BrightSkyClient::new(config.source.clone(), config.card.lat, config.card.lon)
        .map_err(|e| {
            error!("Failed to create radar client: {}", e);
            e
        })?;

    if let Some(dir) = &config.output_dir {
        info!("Writing overlay to {}", dir.display());
    }

    let mut surface = HeadlessSurface::new(config.output_dir.clone());
    let widget = RadarWidget::attach(&config, Arc::new(client), &mut surface)?;

    info!(
        "Refreshing every {}s, press Ctrl+C to stop",
        config.refresh_interval_secs
    );

    shutdown_signal().await;

    widget.detach();
    info!("regenradar has been shut down");
    Ok(())
}

/// Wait for a shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
