use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::dexscreener::{lookup_price, PriceService};
use crate::entity::Token;
use crate::interactor::history;
use crate::utils::{round_to, unix_millis};

pub const SIMULATED_NAMES: [&str; 10] = [
    "PEPE", "DOGE", "SHIB", "BONK", "WIF", "FLOKI", "MEME", "TURBO", "LADYS", "WOJAK",
];

pub const SIMULATED_CHANNELS: [&str; 5] = [
    "Meme Calls 🚀",
    "Degen Plays 💎",
    "Solana Gems ☀️",
    "Whale Alerts 🐋",
    "Alpha Hunters 🕵️",
];

// Real contracts so that some simulated tokens resolve to live prices
pub const KNOWN_ADDRESSES: [&str; 4] = [
    "0x6982508145454Ce325dDbE47a25d4ec3d2311933", // PEPE
    "0xba2aE424d960c26247Dd6c32edC70B295c759791", // TURBO
    "0x95ad61b0a150d79219dcf64e1e6cc01f0b64c4ce", // SHIB
    "0x7d1afa7b718fb893db30a3abc0cfc608aacfebb0", // MATIC
];

const KNOWN_ADDRESS_PROBABILITY: f64 = 0.3;
const MAX_SIMULATED_PRICE: f64 = 0.0001;
const MAX_SIMULATED_CHANGE: f64 = 10.0;
const MAX_SIMULATED_MENTIONS: u32 = 50;

/// Fabricates tokens while no backend feed is available
pub struct Simulator {
    price_service: Arc<dyn PriceService>,
    history_points: usize,
    last_id: AtomicU64,
}

impl Simulator {
    pub fn new(price_service: Arc<dyn PriceService>, history_points: usize) -> Self {
        Self {
            price_service,
            history_points,
            last_id: AtomicU64::new(0),
        }
    }

    /// Produce a new token, priced by lookup when the address resolves
    pub async fn generate_token(&self) -> Token {
        let mut token = self.candidate();

        match lookup_price(self.price_service.as_ref(), &token.address).await {
            Some(quote) => {
                debug!("Simulated token {} resolved to {}", token.name, quote.symbol);
                token.price = quote.price;
                token.change_24h = quote.change_24h;
                token.name = quote.symbol;
            }
            None => {
                let (price, change) = fallback_quote(&mut rand::rng());
                token.price = price;
                token.change_24h = change;
            }
        }

        token.history = history::generate(token.change_24h, self.history_points);
        token
    }

    /// Random token without price data
    pub fn candidate(&self) -> Token {
        random_candidate(&mut rand::rng(), self.next_id())
    }

    /// Millisecond timestamp, bumped so ids stay strictly increasing
    pub fn next_id(&self) -> String {
        let now = unix_millis();
        let previous = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);

        now.max(previous + 1).to_string()
    }
}

pub fn random_candidate<R: Rng + ?Sized>(rng: &mut R, id: String) -> Token {
    let name = format!(
        "{}{}",
        SIMULATED_NAMES.choose(rng).copied().unwrap_or("MEME"),
        rng.random_range(0..1000)
    );

    let address = if rng.random_bool(KNOWN_ADDRESS_PROBABILITY) {
        KNOWN_ADDRESSES
            .choose(rng)
            .map(|a| a.to_string())
            .unwrap_or_else(|| random_address(rng))
    } else {
        random_address(rng)
    };

    let channel = SIMULATED_CHANNELS
        .choose(rng)
        .copied()
        .unwrap_or("Meme Calls 🚀")
        .to_string();

    Token {
        id,
        name,
        address,
        channel,
        price: 0.0,
        change_24h: 0.0,
        mentions: rng.random_range(1..=MAX_SIMULATED_MENTIONS),
        history: Vec::new(),
        mcap: None,
        time_since_open: None,
        timestamp: None,
    }
}

// 0x followed by 40 lowercase hex digits
pub fn random_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits: String = (0..40)
        .map(|_| std::char::from_digit(rng.random_range(0..16), 16).unwrap_or('0'))
        .collect();
    format!("0x{}", digits)
}

// Small positive price and a change in [-10, 10]
pub fn fallback_quote<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    let price = round_to(rng.random_range(0.0..MAX_SIMULATED_PRICE), 8);
    let change = round_to(
        rng.random_range(-MAX_SIMULATED_CHANGE..=MAX_SIMULATED_CHANGE),
        2,
    );
    (price, change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TokenPrice;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Unavailable;

    #[async_trait]
    impl PriceService for Unavailable {
        async fn get_token_price(&self, _address: &str) -> Result<TokenPrice> {
            Err(anyhow!("offline"))
        }
    }

    struct Fixed;

    #[async_trait]
    impl PriceService for Fixed {
        async fn get_token_price(&self, _address: &str) -> Result<TokenPrice> {
            Ok(TokenPrice {
                price: 1.25,
                change_24h: -4.0,
                symbol: "REAL".to_string(),
            })
        }
    }

    #[test]
    fn test_candidate_fields() {
        let mut rng = StdRng::seed_from_u64(42);
        for i in 0..200 {
            let token = random_candidate(&mut rng, i.to_string());

            assert!(SIMULATED_NAMES.iter().any(|n| token.name.starts_with(n)));
            assert!(SIMULATED_CHANNELS.contains(&token.channel.as_str()));
            assert!((1..=50).contains(&token.mentions));
            assert!(token.address.starts_with("0x"));
            assert!(
                KNOWN_ADDRESSES.contains(&token.address.as_str())
                    || (token.address.len() == 42
                        && token.address[2..].chars().all(|c| c.is_ascii_hexdigit()))
            );
        }
    }

    #[test]
    fn test_fallback_quote_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let (price, change) = fallback_quote(&mut rng);
            assert!((0.0..=MAX_SIMULATED_PRICE).contains(&price));
            assert!((-10.0..=10.0).contains(&change));
        }
    }

    #[test]
    fn test_ids_strictly_increase() {
        let simulator = Simulator::new(Arc::new(Unavailable), 20);
        let ids: Vec<u64> = (0..100)
            .map(|_| simulator.candidate().id.parse().unwrap())
            .collect();

        assert!(ids.windows(2).all(|w| w[1] > w[0]));
    }

    #[tokio::test]
    async fn test_generate_token_without_lookup() {
        let simulator = Simulator::new(Arc::new(Unavailable), 20);
        let token = simulator.generate_token().await;

        assert_eq!(token.history.len(), 20);
        assert!(token.price >= 0.0);
        assert!((-10.0..=10.0).contains(&token.change_24h));
    }

    #[tokio::test]
    async fn test_generate_token_uses_lookup() {
        let simulator = Simulator::new(Arc::new(Fixed), 20);
        let token = simulator.generate_token().await;

        assert_eq!(token.name, "REAL");
        assert_eq!(token.price, 1.25);
        assert_eq!(token.change_24h, -4.0);
        assert_eq!(token.history.len(), 20);
    }
}
