mod config;
mod display;
mod models;
mod providers;
mod services;
mod sync;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use display::{LogPicker, LogPresenter};
use providers::WarsawClient;
use sync::{MapEvent, SyncController};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reqwest=warn".into()),
        )
        .init();

    // Load config, falling back to defaults when no file is present
    let config = match Config::load("config.yaml") {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "No usable config file, using defaults");
            Config::default()
        }
    };
    if config.api.api_key.is_empty() {
        tracing::warn!("No API key configured, the feed will reject requests");
    }

    let client = WarsawClient::new(&config.api).expect("Failed to build API client");

    // Start the sync controller in the background
    let controller = SyncController::new(
        Arc::new(client),
        Box::new(LogPresenter),
        Box::new(LogPicker),
        config.sync,
    );
    let (events, rx) = mpsc::channel(32);
    let controller_task = tokio::spawn(controller.run(rx));

    // Kick off polling from the configured startup viewport
    let viewport = config.viewport;
    tracing::info!(
        lat = viewport.center_lat,
        lon = viewport.center_lon,
        zoom = viewport.zoom,
        "Watching viewport"
    );
    events
        .send(MapEvent::MapReady {
            viewport: viewport.bounds(),
            zoom: viewport.zoom,
        })
        .await
        .expect("Sync controller stopped unexpectedly");

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("Shutting down");
    let _ = events.send(MapEvent::Shutdown).await;
    let _ = controller_task.await;
}
