use async_trait::async_trait;
use futures::future::join_all;
use log::debug;
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::dexscreener::{lookup_price, PriceService};
use crate::entity::{Token, TokenPrice};
use crate::interactor::history;
use crate::interactor::token_store::{SharedTokenStore, TokenStore};
use crate::interactor::TickGuard;
use crate::utils::round_to;

// Random walk step bounds used when a lookup fails
const PRICE_WALK: f64 = 0.000001;
const CHANGE_WALK: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// `quoted` tokens got fresh prices, `walked` fell back to the random walk
    Refreshed { quoted: usize, walked: usize },
    /// Previous tick still running
    Skipped,
}

#[async_trait]
pub trait RefreshInteractor: Send + Sync {
    /// Re-price every stored token and advance its history
    async fn refresh(&self) -> RefreshOutcome;
}

pub struct RefreshInteractorImpl {
    store: SharedTokenStore,
    price_service: Arc<dyn PriceService>,
    busy: AtomicBool,
}

impl RefreshInteractorImpl {
    pub fn new(store: SharedTokenStore, price_service: Arc<dyn PriceService>) -> Self {
        Self {
            store,
            price_service,
            busy: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RefreshInteractor for RefreshInteractorImpl {
    async fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = TickGuard::try_acquire(&self.busy) else {
            debug!("Refresh tick still running, skipping");
            return RefreshOutcome::Skipped;
        };

        let targets: Vec<(String, String)> = self
            .store
            .read()
            .await
            .iter()
            .map(|t| (t.id.clone(), t.address.clone()))
            .collect();

        // Scatter all lookups, gather regardless of individual failures
        let price_service = self.price_service.as_ref();
        let quotes = join_all(targets.into_iter().map(|(id, address)| async move {
            let quote = lookup_price(price_service, &address).await;
            (id, quote)
        }))
        .await;

        let mut store = self.store.write().await;
        let outcome = apply_quotes(&mut store, quotes);
        debug!("Refreshed prices: {:?}", outcome);
        outcome
    }
}

/// Apply gathered lookup results; tokens removed meanwhile are ignored
pub fn apply_quotes(store: &mut TokenStore, quotes: Vec<(String, Option<TokenPrice>)>) -> RefreshOutcome {
    apply_quotes_with(&mut rand::rng(), store, quotes)
}

pub fn apply_quotes_with<R: Rng + ?Sized>(
    rng: &mut R,
    store: &mut TokenStore,
    quotes: Vec<(String, Option<TokenPrice>)>,
) -> RefreshOutcome {
    let mut quoted = 0;
    let mut walked = 0;

    for (id, quote) in quotes {
        let Some(token) = store.get_mut(&id) else {
            continue;
        };

        match quote {
            Some(quote) => {
                token.price = quote.price;
                token.change_24h = quote.change_24h;
                quoted += 1;
            }
            None => {
                random_walk(rng, token);
                walked += 1;
            }
        }

        history::advance_with(rng, &mut token.history, token.change_24h);
    }

    RefreshOutcome::Refreshed { quoted, walked }
}

// Keep prices moving while no data is available; price never drops below zero
fn random_walk<R: Rng + ?Sized>(rng: &mut R, token: &mut Token) {
    let price_step = (rng.random::<f64>() - 0.5) * PRICE_WALK;
    let change_step = (rng.random::<f64>() - 0.5) * CHANGE_WALK;

    token.price = (token.price + price_step).max(0.0);
    token.change_24h = round_to(token.change_24h + change_step, 2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactor::token_store::tests::token;
    use anyhow::{anyhow, Result};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Unavailable;

    #[async_trait]
    impl PriceService for Unavailable {
        async fn get_token_price(&self, _address: &str) -> Result<TokenPrice> {
            Err(anyhow!("timeout"))
        }
    }

    // Quotes every address except the ones starting with "0xdead"
    struct Partial;

    #[async_trait]
    impl PriceService for Partial {
        async fn get_token_price(&self, address: &str) -> Result<TokenPrice> {
            if address.starts_with("0xdead") {
                return Err(anyhow!("no pairs"));
            }
            Ok(TokenPrice {
                price: 2.0,
                change_24h: 3.0,
                symbol: "LIVE".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_failed_lookup_still_refreshes() {
        let store = TokenStore::shared(10);
        let mut zero = token("1");
        zero.price = 0.0;
        store.write().await.insert_front(zero);

        let refresh = RefreshInteractorImpl::new(store.clone(), Arc::new(Unavailable));
        let outcome = refresh.refresh().await;

        assert_eq!(outcome, RefreshOutcome::Refreshed { quoted: 0, walked: 1 });
        let store = store.read().await;
        let token = store.get("1").unwrap();
        assert!(token.price >= 0.0);
        assert!(!token.format_change().is_empty());
        assert_eq!(token.history.len(), 20);
    }

    #[tokio::test]
    async fn test_partial_failures_do_not_fail_batch() {
        let store = TokenStore::shared(10);
        let mut dead = token("1");
        dead.address = "0xdeadbeef".to_string();
        let live = token("2");
        {
            let mut store = store.write().await;
            store.insert_front(dead);
            store.insert_front(live);
        }

        let refresh = RefreshInteractorImpl::new(store.clone(), Arc::new(Partial));
        let outcome = refresh.refresh().await;

        assert_eq!(outcome, RefreshOutcome::Refreshed { quoted: 1, walked: 1 });
        let store = store.read().await;
        let live = store.get("2").unwrap();
        assert_eq!(live.price, 2.0);
        assert_eq!(live.change_24h, 3.0);
        // lookups refresh prices, never the display name
        assert_eq!(live.name, "TKN2");
    }

    #[test]
    fn test_random_walk_floors_price() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut store = TokenStore::new(10);
        let mut zero = token("1");
        zero.price = 0.0;
        store.insert_front(zero);

        for _ in 0..1000 {
            apply_quotes_with(&mut rng, &mut store, vec![("1".to_string(), None)]);
            let token = store.get("1").unwrap();
            assert!(token.price >= 0.0);
            assert_eq!(token.history.len(), 20);
            assert!(token.history.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_change_walk_is_bounded_and_rounded() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut store = TokenStore::new(10);
        store.insert_front(token("1"));

        apply_quotes_with(&mut rng, &mut store, vec![("1".to_string(), None)]);

        let change = store.get("1").unwrap().change_24h;
        assert!((change - 1.5).abs() <= 0.5 + 1e-9);
        assert_eq!(change, round_to(change, 2));
    }

    #[test]
    fn test_removed_tokens_are_ignored() {
        let mut store = TokenStore::new(10);
        store.insert_front(token("1"));

        let outcome = apply_quotes(&mut store, vec![("gone".to_string(), None)]);

        assert_eq!(outcome, RefreshOutcome::Refreshed { quoted: 0, walked: 0 });
        assert_eq!(store.get("1").unwrap().history, vec![100.0; 20]);
    }

    #[tokio::test]
    async fn test_overlapping_tick_is_skipped() {
        let store = TokenStore::shared(10);
        store.write().await.insert_front(token("1"));
        let refresh = RefreshInteractorImpl::new(store.clone(), Arc::new(Partial));

        let held = TickGuard::try_acquire(&refresh.busy).unwrap();
        assert_eq!(refresh.refresh().await, RefreshOutcome::Skipped);
        assert_eq!(store.read().await.get("1"), Some(&token("1")));

        drop(held);
        assert_eq!(
            refresh.refresh().await,
            RefreshOutcome::Refreshed { quoted: 1, walked: 0 }
        );
        assert_eq!(store.read().await.get("1").unwrap().price, 2.0);
    }

    #[tokio::test]
    async fn test_empty_store_refresh() {
        let refresh = RefreshInteractorImpl::new(TokenStore::shared(10), Arc::new(Unavailable));
        assert_eq!(
            refresh.refresh().await,
            RefreshOutcome::Refreshed { quoted: 0, walked: 0 }
        );
    }
}
