use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::dexscreener::models::SearchResponse;
use crate::entity::{TokenPrice, TrackerError};

/// Price lookup for a single token contract address
#[async_trait]
pub trait PriceService: Send + Sync {
    /// Current USD price, 24h change and symbol of the token
    async fn get_token_price(&self, address: &str) -> Result<TokenPrice>;
}

/// Price service backed by the DexScreener search API
pub struct DexScreenerPriceService {
    http_client: Client,
    base_url: String,
}

impl DexScreenerPriceService {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PriceService for DexScreenerPriceService {
    async fn get_token_price(&self, address: &str) -> Result<TokenPrice> {
        let url = format!("{}/dex/search", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", address)])
            .send()
            .await
            .map_err(TrackerError::from)?;

        if !response.status().is_success() {
            return Err(TrackerError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let body = response.text().await.map_err(TrackerError::from)?;
        let search: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Failed to parse DexScreener response: {}", e))?;

        let pair = search
            .first_pair()
            .ok_or_else(|| TrackerError::NoPairs(address.to_string()))?;

        if !pair.price_usd.is_finite() || pair.price_usd < 0.0 {
            return Err(anyhow!("Invalid price {} for {}", pair.price_usd, address));
        }

        debug!(
            "DexScreener price for {}: {} ({})",
            address, pair.price_usd, pair.base_token.symbol
        );

        Ok(TokenPrice {
            price: pair.price_usd,
            change_24h: pair
                .price_change
                .h24
                .filter(|change| change.is_finite())
                .unwrap_or(0.0),
            symbol: pair.base_token.symbol,
        })
    }
}

/// Lookup that turns every kind of failure into "no data"
pub async fn lookup_price(price_service: &dyn PriceService, address: &str) -> Option<TokenPrice> {
    match price_service.get_token_price(address).await {
        Ok(price) => Some(price),
        Err(e) => {
            debug!("No price data for {}: {}", address, e);
            None
        }
    }
}
