use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;

use crate::entity::TrackerError;

pub const DEFAULT_BACKEND_SOURCE: &str = "meme_data.json";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.dexscreener.com/latest";
pub const MAX_TOKENS: usize = 100;
pub const HISTORY_POINTS: usize = 20;
pub const RECONCILE_INTERVAL_SECS: u64 = 8;
pub const REFRESH_INTERVAL_SECS: u64 = 5;
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Tracker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerSettings {
    /// Backend snapshot location, an http(s) URL or a local file path
    pub backend_source: String,

    /// Base URL of the DexScreener API
    pub price_api_url: String,

    /// Maximum number of tokens kept in the store
    pub max_tokens: usize,

    /// Number of samples in every token history
    pub history_points: usize,

    /// Seconds between reconcile ticks
    pub reconcile_interval_secs: u64,

    /// Seconds between price refresh ticks
    pub refresh_interval_secs: u64,

    /// Timeout applied to every outgoing HTTP request
    pub http_timeout_secs: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            backend_source: DEFAULT_BACKEND_SOURCE.to_string(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            max_tokens: MAX_TOKENS,
            history_points: HISTORY_POINTS,
            reconcile_interval_secs: RECONCILE_INTERVAL_SECS,
            refresh_interval_secs: REFRESH_INTERVAL_SECS,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
        }
    }
}

impl TrackerSettings {
    /// Builds settings from defaults overridden by `TRACKER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Environment::with_prefix("TRACKER"))
    }

    fn from_environment(environment: Environment) -> Result<Self> {
        let defaults = Self::default();

        let settings: Self = Config::builder()
            .set_default("backend_source", defaults.backend_source)?
            .set_default("price_api_url", defaults.price_api_url)?
            .set_default("max_tokens", defaults.max_tokens as u64)?
            .set_default("history_points", defaults.history_points as u64)?
            .set_default("reconcile_interval_secs", defaults.reconcile_interval_secs)?
            .set_default("refresh_interval_secs", defaults.refresh_interval_secs)?
            .set_default("http_timeout_secs", defaults.http_timeout_secs)?
            .add_source(environment.try_parsing(true))
            .build()
            .map_err(TrackerError::from)
            .context("Failed to build tracker configuration")?
            .try_deserialize()
            .map_err(TrackerError::from)
            .context("Invalid tracker configuration")?;

        settings.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.max_tokens == 0 {
            anyhow::bail!("max_tokens must be greater than zero");
        }
        if self.history_points < 2 {
            anyhow::bail!("history_points must be at least 2");
        }
        if self.reconcile_interval_secs == 0 || self.refresh_interval_secs == 0 {
            anyhow::bail!("tick intervals must be greater than zero");
        }
        Ok(self)
    }

    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
