use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

use crate::dexscreener::{lookup_price, PriceService};
use crate::entity::{FeedStatus, SnapshotEntry, Token};
use crate::feed::SnapshotSource;
use crate::interactor::history;
use crate::interactor::simulator::Simulator;
use crate::interactor::token_store::SharedTokenStore;
use crate::interactor::TickGuard;
use crate::utils::is_plausible_address;

// Parallel price lookups while adopting a backend batch
const ENRICH_CONCURRENCY: usize = 4;

const DEFAULT_NAME: &str = "Unknown";
const DEFAULT_CHANNEL: &str = "Unknown";
const DEFAULT_MENTIONS: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Backend batch merged; `inserted` new tokens, `known` already present
    Live { inserted: usize, known: usize },
    /// Backend unavailable, simulated token `token_id` added
    Simulated { token_id: String },
    /// Previous tick still running
    Skipped,
}

impl ReconcileOutcome {
    pub fn changed_store(&self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

#[async_trait]
pub trait ReconcileInteractor: Send + Sync {
    /// Run one backend-or-simulate cycle
    async fn reconcile(&self) -> ReconcileOutcome;

    /// Source used by the most recent cycle
    fn feed_status(&self) -> FeedStatus;
}

pub struct ReconcileInteractorImpl {
    store: SharedTokenStore,
    snapshot_source: Arc<dyn SnapshotSource>,
    price_service: Arc<dyn PriceService>,
    simulator: Arc<Simulator>,
    history_points: usize,
    status: RwLock<FeedStatus>,
    busy: AtomicBool,
}

impl ReconcileInteractorImpl {
    pub fn new(
        store: SharedTokenStore,
        snapshot_source: Arc<dyn SnapshotSource>,
        price_service: Arc<dyn PriceService>,
        simulator: Arc<Simulator>,
        history_points: usize,
    ) -> Self {
        Self {
            store,
            snapshot_source,
            price_service,
            simulator,
            history_points,
            status: RwLock::new(FeedStatus::default()),
            busy: AtomicBool::new(false),
        }
    }

    async fn merge_batch(&self, batch: Vec<SnapshotEntry>) -> ReconcileOutcome {
        let existing = self.store.read().await.ids();
        let total = batch.len();
        let unseen = unseen_entries(batch, &existing);
        let known = total - unseen.len();

        // Oldest first so the newest entry ends up at the front
        let tokens: Vec<Token> = stream::iter(unseen.into_iter().rev())
            .map(|entry| self.adopt_entry(entry))
            .buffered(ENRICH_CONCURRENCY)
            .collect()
            .await;

        let mut inserted = 0;
        let mut store = self.store.write().await;
        for token in tokens {
            // Deleted or re-added while lookups were in flight
            if store.contains(&token.id) {
                continue;
            }
            if let Some(evicted) = store.insert_front(token) {
                debug!("Evicted token {} ({})", evicted.id, evicted.name);
            }
            inserted += 1;
        }
        let max_tokens = store.max_tokens();
        store.trim_to(max_tokens);

        ReconcileOutcome::Live { inserted, known }
    }

    async fn adopt_entry(&self, entry: SnapshotEntry) -> Token {
        let mut token = token_from_entry(entry, self.history_points);

        if is_plausible_address(&token.address) {
            if let Some(quote) = lookup_price(self.price_service.as_ref(), &token.address).await {
                token.price = quote.price;
                token.change_24h = quote.change_24h;
                token.name = quote.symbol;
                token.history = history::generate(token.change_24h, self.history_points);
            }
        }

        token
    }

    async fn simulate(&self) -> ReconcileOutcome {
        let mut token = self.simulator.generate_token().await;

        let mut store = self.store.write().await;
        // Backend ids share the timestamp space; ids only grow so this ends
        while store.contains(&token.id) {
            token.id = self.simulator.next_id();
        }

        let token_id = token.id.clone();
        info!("Simulated token {} ({})", token.name, token.address);
        if let Some(evicted) = store.insert_front(token) {
            debug!("Evicted token {} ({})", evicted.id, evicted.name);
        }

        ReconcileOutcome::Simulated { token_id }
    }

    fn set_status(&self, status: FeedStatus) {
        if let Ok(mut current) = self.status.write() {
            if *current != status {
                info!("Feed status changed: {}", status);
            }
            *current = status;
        }
    }
}

#[async_trait]
impl ReconcileInteractor for ReconcileInteractorImpl {
    async fn reconcile(&self) -> ReconcileOutcome {
        let Some(_guard) = TickGuard::try_acquire(&self.busy) else {
            debug!("Reconcile tick still running, skipping");
            return ReconcileOutcome::Skipped;
        };

        match self.snapshot_source.fetch_snapshot().await {
            Ok(batch) => {
                self.set_status(FeedStatus::Live);
                let outcome = self.merge_batch(batch).await;
                debug!("Reconciled backend batch: {:?}", outcome);
                outcome
            }
            Err(e) => {
                debug!(
                    "Backend snapshot {} unavailable: {}",
                    self.snapshot_source.location(),
                    e
                );
                self.set_status(FeedStatus::Simulated);
                self.simulate().await
            }
        }
    }

    fn feed_status(&self) -> FeedStatus {
        match self.status.read() {
            Ok(status) => *status,
            Err(_) => {
                warn!("Feed status lock poisoned");
                FeedStatus::default()
            }
        }
    }
}

/// Entries whose id is not yet known, first occurrence wins inside the batch
fn unseen_entries(batch: Vec<SnapshotEntry>, existing: &HashSet<String>) -> Vec<SnapshotEntry> {
    let mut seen = HashSet::new();
    batch
        .into_iter()
        .filter(|entry| !existing.contains(&entry.id) && seen.insert(entry.id.clone()))
        .collect()
}

/// Build a token from a backend entry, filling missing fields with defaults
pub fn token_from_entry(entry: SnapshotEntry, history_points: usize) -> Token {
    let change_24h = entry.change_24h.unwrap_or(0.0);
    let history = history::fit_or_generate(entry.history, change_24h, history_points);

    Token {
        id: entry.id,
        name: entry.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        address: entry.address.unwrap_or_default(),
        channel: entry.channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
        price: entry.price.filter(|p| *p >= 0.0).unwrap_or(0.0),
        change_24h,
        mentions: entry
            .mentions
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_MENTIONS),
        history,
        mcap: entry.mcap,
        time_since_open: entry.time_since_open,
        timestamp: entry.timestamp,
    }
}
