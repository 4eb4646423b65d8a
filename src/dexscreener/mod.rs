// src/dexscreener/mod.rs
pub mod models;
pub mod price_service;

pub use models::{BaseToken, DexPair, PriceChange, SearchResponse};
pub use price_service::{lookup_price, DexScreenerPriceService, PriceService};
