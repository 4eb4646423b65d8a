use serde::{Deserialize, Serialize};

use crate::utils::{format_change, format_price};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: String, // Unique id (backend message id or simulator id)
    pub name: String, // Display symbol, overwritten by price lookups
    #[serde(alias = "ca")]
    pub address: String, // Contract address
    pub channel: String, // Originating channel label
    pub price: f64, // Price in USD
    #[serde(rename = "change24h")]
    pub change_24h: f64, // 24h change in percent
    pub mentions: u32, // Community mentions
    pub history: Vec<f64>, // Sparkline samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcap: Option<String>, // Market cap label from the channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_since_open: Option<String>, // Time between open and first mention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>, // Unix timestamp of the originating message
}

impl Token {
    pub fn is_positive(&self) -> bool {
        self.change_24h >= 0.0
    }

    // Format price for display
    pub fn format_price(&self) -> String {
        format_price(self.price)
    }

    // Format 24h change with sign for display
    pub fn format_change(&self) -> String {
        format_change(self.change_24h)
    }
}
