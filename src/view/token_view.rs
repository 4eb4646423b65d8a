use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use serde::Serialize;
use tokio::sync::watch;

use crate::entity::{FeedStatus, Token};
use crate::utils::shorten_address;

/// Everything a view needs to draw the token grid
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenBoard {
    pub tokens: Vec<Token>,
    pub status: FeedStatus,
    pub max_tokens: usize,
    pub expanded: Option<String>,
}

impl TokenBoard {
    pub fn counter(&self) -> String {
        format!("Tokens: {}/{}", self.tokens.len(), self.max_tokens)
    }
}

#[async_trait]
pub trait TokenView: Send + Sync {
    async fn display_tokens(&self, board: &TokenBoard) -> Result<()>;
    async fn display_address_copied(&self, address: &str) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

/// Writes every board to the log, one line per card
pub struct ConsoleTokenView {
    max_cards: usize,
}

impl ConsoleTokenView {
    pub fn new(max_cards: usize) -> Self {
        Self { max_cards }
    }
}

impl Default for ConsoleTokenView {
    fn default() -> Self {
        Self::new(10)
    }
}

pub fn format_card(token: &Token, expanded: bool) -> String {
    let mut card = format!(
        "{:<12} {:>16} {:>9}  🔥 {}",
        token.name,
        token.format_price(),
        token.format_change(),
        token.mentions
    );

    if let Some(mcap) = &token.mcap {
        card.push_str(&format!("  💰 {}", mcap));
    }

    if expanded {
        card.push_str(&format!(
            "\n    channel: {}\n    address: {}\n    first mention: {}",
            token.channel,
            token.address,
            token.time_since_open.as_deref().unwrap_or("N/A")
        ));
    } else {
        card.push_str(&format!("  {}", shorten_address(&token.address)));
    }

    card
}

#[async_trait]
impl TokenView for ConsoleTokenView {
    async fn display_tokens(&self, board: &TokenBoard) -> Result<()> {
        info!("{} | {}", board.status, board.counter());

        for token in board.tokens.iter().take(self.max_cards) {
            let expanded = board.expanded.as_deref() == Some(token.id.as_str());
            info!("{}", format_card(token, expanded));
        }

        Ok(())
    }

    async fn display_address_copied(&self, address: &str) -> Result<()> {
        info!("Copied address {}", address);
        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        error!("{}", error_message);
        Ok(())
    }
}

/// Publishes every board to subscribers through a watch channel
pub struct WatchTokenView {
    sender: watch::Sender<TokenBoard>,
}

impl WatchTokenView {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(TokenBoard::default());
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<TokenBoard> {
        self.sender.subscribe()
    }
}

impl Default for WatchTokenView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenView for WatchTokenView {
    async fn display_tokens(&self, board: &TokenBoard) -> Result<()> {
        // send_replace keeps the latest board even with no receivers yet
        self.sender.send_replace(board.clone());
        Ok(())
    }

    async fn display_address_copied(&self, _address: &str) -> Result<()> {
        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        error!("{}", error_message);
        Ok(())
    }
}
