use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::entity::{SnapshotEntry, TrackerError};
use crate::settings::MAX_TOKENS;
use crate::signals::parser::ChannelSignal;

/// Maintains the backend snapshot file consumed by the reconcile loop
pub struct SnapshotWriter {
    path: PathBuf,
    max_entries: usize,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_entries: MAX_TOKENS,
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file as an empty array if it does not exist yet
    pub async fn ensure_exists(&self) -> Result<()> {
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }

        tokio::fs::write(&self.path, "[]")
            .await
            .map_err(TrackerError::from)
            .with_context(|| format!("Failed to create {}", self.path.display()))
    }

    /// Put an entry on top of the snapshot unless its id is already present.
    ///
    /// Returns whether the file changed.
    pub async fn merge(&self, entry: SnapshotEntry) -> Result<bool> {
        let mut entries = self.load().await;

        if entries.iter().any(|existing| existing.id == entry.id) {
            return Ok(false);
        }

        info!(
            "Saved new token: {} ({})",
            entry.name.as_deref().unwrap_or("Unknown"),
            entry.address()
        );
        entries.insert(0, entry);
        entries.truncate(self.max_entries);

        let body = serde_json::to_string_pretty(&entries).map_err(TrackerError::from)?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(TrackerError::from)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        Ok(true)
    }

    /// Current entries; a missing or unreadable file counts as empty
    pub async fn load(&self) -> Vec<SnapshotEntry> {
        let body = match tokio::fs::read_to_string(&self.path).await {
            Ok(body) => body,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => SnapshotEntry::parse_batch(value).unwrap_or_default(),
            Err(e) => {
                warn!("Snapshot {} is not valid JSON, starting over: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }
}

/// Stable id for a channel message; the same message always maps to the same id
pub fn message_id(channel: &str, message: &str) -> String {
    let name = format!("{}\n{}", channel, message);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}

/// Backend record for a parsed channel message
pub fn entry_from_signal(
    id: impl Into<String>,
    channel: impl Into<String>,
    timestamp: f64,
    signal: ChannelSignal,
) -> SnapshotEntry {
    SnapshotEntry {
        id: id.into(),
        address: Some(signal.address),
        name: Some(signal.name),
        channel: Some(channel.into()),
        mentions: Some(signal.mentions),
        mcap: Some(signal.mcap),
        time_since_open: Some(signal.time_since_open).filter(|t| !t.is_empty()),
        timestamp: Some(timestamp),
        ..Default::default()
    }
}
