//! Reads channel messages from stdin and merges the token signals they
//! contain into the backend snapshot file read by the tracker.
//!
//! Messages are separated by blank lines.
use anyhow::{Context, Result};
use chrono::Utc;
use dotenv::dotenv;
use log::{debug, info};
use meme_coin_tracker::signals::{entry_from_signal, extract_signal, message_id, SnapshotWriter};
use meme_coin_tracker::TrackerSettings;
use std::env;
use tokio::io::{self, AsyncReadExt};

const DEFAULT_CHANNEL: &str = "MomentumTrackerCN2";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = TrackerSettings::from_env()?;
    if settings.backend_source.starts_with("http://") || settings.backend_source.starts_with("https://") {
        anyhow::bail!("TRACKER_BACKEND_SOURCE must be a local file to ingest signals");
    }
    let channel = env::var("SIGNAL_CHANNEL").unwrap_or_else(|_| DEFAULT_CHANNEL.to_string());

    let writer = SnapshotWriter::new(&settings.backend_source).with_max_entries(settings.max_tokens);
    writer.ensure_exists().await?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read messages from stdin")?;

    let mut saved = 0;
    for message in split_messages(&input) {
        let Some(signal) = extract_signal(message) else {
            debug!("No contract address in message, skipping");
            continue;
        };

        info!("Found CA: {} in {}", signal.address, channel);
        let entry = entry_from_signal(
            message_id(&channel, message),
            channel.as_str(),
            Utc::now().timestamp() as f64,
            signal,
        );

        if writer.merge(entry).await? {
            saved += 1;
        }
    }

    info!("Ingest complete: {} new tokens in {}", saved, writer.path().display());
    Ok(())
}

fn split_messages(input: &str) -> impl Iterator<Item = &str> {
    input
        .split("\n\n")
        .map(str::trim)
        .filter(|message| !message.is_empty())
}

