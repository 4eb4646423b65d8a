use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use crate::entity::{SnapshotEntry, TrackerError};
use crate::utils::unix_millis;

/// Source of the backend token snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current batch, newest first.
    ///
    /// Any error, including an empty or non-array payload, means the backend
    /// is unavailable for this tick.
    async fn fetch_snapshot(&self) -> Result<Vec<SnapshotEntry>>;

    /// Human readable location, used in logs
    fn location(&self) -> String;
}

/// Snapshot served over HTTP(S)
pub struct HttpSnapshotSource {
    http_client: Client,
    url: String,
}

impl HttpSnapshotSource {
    pub fn new(http_client: Client, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<Vec<SnapshotEntry>> {
        // Timestamp query defeats intermediate caches
        let response = self
            .http_client
            .get(&self.url)
            .query(&[("t", unix_millis().to_string())])
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(TrackerError::from)?;

        if !response.status().is_success() {
            return Err(TrackerError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: self.url.clone(),
            }
            .into());
        }

        let body = response.text().await.map_err(TrackerError::from)?;
        parse_snapshot(&body)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Snapshot read from a local file
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<Vec<SnapshotEntry>> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(TrackerError::from)
            .with_context(|| format!("Failed to read snapshot {}", self.path.display()))?;

        parse_snapshot(&body)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Picks the HTTP or file source depending on the configured location
pub fn create_snapshot_source(http_client: Client, location: &str) -> Arc<dyn SnapshotSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpSnapshotSource::new(http_client, location))
    } else {
        Arc::new(FileSnapshotSource::new(location))
    }
}

fn parse_snapshot(body: &str) -> Result<Vec<SnapshotEntry>> {
    let value: Value = serde_json::from_str(body).map_err(TrackerError::from)?;

    let entries = SnapshotEntry::parse_batch(value).ok_or(TrackerError::EmptySnapshot)?;
    if entries.is_empty() {
        return Err(TrackerError::EmptySnapshot.into());
    }

    debug!("Snapshot contains {} entries", entries.len());
    Ok(entries)
}
