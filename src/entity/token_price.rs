use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPrice {
    pub price: f64,      // Price in USD
    pub change_24h: f64, // 24h change in percent
    pub symbol: String,  // Canonical token symbol
}
