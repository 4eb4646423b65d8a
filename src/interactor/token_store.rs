use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::entity::Token;

/// Token store shared between the tick loops and the presenter
pub type SharedTokenStore = Arc<RwLock<TokenStore>>;

/// Ordered, capped collection of tokens, newest first.
///
/// Ids are unique: callers check `contains` before `insert_front`.
#[derive(Debug, Clone)]
pub struct TokenStore {
    tokens: VecDeque<Token>,
    max_tokens: usize,
}

impl TokenStore {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            tokens: VecDeque::with_capacity(max_tokens.min(1024)),
            max_tokens,
        }
    }

    pub fn shared(max_tokens: usize) -> SharedTokenStore {
        Arc::new(RwLock::new(Self::new(max_tokens)))
    }

    /// Insert at the front, evicting the oldest token when over capacity
    pub fn insert_front(&mut self, token: Token) -> Option<Token> {
        debug_assert!(!self.contains(&token.id), "duplicate token id {}", token.id);

        self.tokens.push_front(token);
        if self.tokens.len() > self.max_tokens {
            self.tokens.pop_back()
        } else {
            None
        }
    }

    /// Remove a token by id; unknown ids leave the store untouched
    pub fn remove_by_id(&mut self, id: &str) -> Option<Token> {
        let index = self.tokens.iter().position(|t| t.id == id)?;
        self.tokens.remove(index)
    }

    /// Drop tokens from the back until at most `n` remain
    pub fn trim_to(&mut self, n: usize) -> Vec<Token> {
        if self.tokens.len() <= n {
            return Vec::new();
        }
        self.tokens.split_off(n).into()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tokens.iter().any(|t| t.id == id)
    }

    pub fn ids(&self) -> HashSet<String> {
        self.tokens.iter().map(|t| t.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Copy of the tokens in display order
    pub fn snapshot(&self) -> Vec<Token> {
        self.tokens.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn token(id: &str) -> Token {
        Token {
            id: id.to_string(),
            name: format!("TKN{}", id),
            address: format!("0x{:0>40}", id),
            channel: "Meme Calls 🚀".to_string(),
            price: 0.0001,
            change_24h: 1.5,
            mentions: 1,
            history: vec![100.0; 20],
            mcap: None,
            time_since_open: None,
            timestamp: None,
        }
    }

    fn ids(store: &TokenStore) -> Vec<String> {
        store.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_insert_front_is_newest_first() {
        let mut store = TokenStore::new(10);
        store.insert_front(token("1"));
        store.insert_front(token("2"));
        store.insert_front(token("3"));

        assert_eq!(ids(&store), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_insert_at_capacity_evicts_oldest() {
        let mut store = TokenStore::new(1);
        store.insert_front(token("1"));

        let evicted = store.insert_front(token("2"));

        assert_eq!(evicted.map(|t| t.id), Some("1".to_string()));
        assert_eq!(ids(&store), vec!["2"]);
    }

    #[test]
    fn test_size_never_exceeds_cap() {
        let mut store = TokenStore::new(5);
        for i in 0..50 {
            let evicted = store.insert_front(token(&i.to_string()));
            assert!(store.len() <= 5);
            if i >= 5 {
                assert_eq!(evicted.map(|t| t.id), Some((i - 5).to_string()));
            } else {
                assert!(evicted.is_none());
            }
        }
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut store = TokenStore::new(10);
        store.insert_front(token("1"));
        store.insert_front(token("2"));

        assert!(store.remove_by_id("404").is_none());
        assert_eq!(ids(&store), vec!["2", "1"]);

        assert_eq!(store.remove_by_id("1").map(|t| t.id), Some("1".to_string()));
        assert_eq!(ids(&store), vec!["2"]);
    }

    #[test]
    fn test_trim_to_drops_back() {
        let mut store = TokenStore::new(10);
        for i in 0..6 {
            store.insert_front(token(&i.to_string()));
        }

        let dropped = store.trim_to(4);

        assert_eq!(dropped.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["1", "0"]);
        assert_eq!(ids(&store), vec!["5", "4", "3", "2"]);
        assert!(store.trim_to(10).is_empty());
    }
}
