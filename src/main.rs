//! Meme Coin Tracker - Main executable
//!
//! Polls the backend snapshot for newly announced tokens (or simulates them
//! while no backend is available), keeps their prices fresh and renders the
//! token board to the log until Ctrl+C.
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use meme_coin_tracker::{ConsoleTokenView, ServiceContainer, TokenView, TrackerSettings};
use std::sync::Arc;

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting Meme Coin Tracker v{}", meme_coin_tracker::VERSION);

    let settings = TrackerSettings::from_env().context("Failed to load tracker settings")?;
    info!(
        "Backend source: {}, price API: {}, capacity: {}",
        settings.backend_source, settings.price_api_url, settings.max_tokens
    );

    let container = ServiceContainer::new(settings)?;

    let view = Arc::new(ConsoleTokenView::default()) as Arc<dyn TokenView>;
    let presenter = container.tracker_presenter(view);
    let mut tracker_service = container.tracker_service(presenter);

    tracker_service.start().await?;
    info!("Tracker is running! Press Ctrl+C to stop.");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("Stopping tracker service...");
    tracker_service.stop().await;

    Ok(())
}
