use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::sync::{Arc, Mutex};

use crate::interactor::reconcile_interactor::{ReconcileInteractor, ReconcileOutcome};
use crate::interactor::refresh_interactor::{RefreshInteractor, RefreshOutcome};
use crate::interactor::token_store::SharedTokenStore;
use crate::view::token_view::{TokenBoard, TokenView};

#[async_trait]
pub trait TrackerPresenter: Send + Sync {
    /// Run a reconcile tick and redraw when the store changed
    async fn reconcile_tick(&self) -> Result<ReconcileOutcome>;

    /// Run a refresh tick followed by a single redraw
    async fn refresh_tick(&self) -> Result<RefreshOutcome>;

    async fn show_tokens(&self) -> Result<()>;

    /// Remove a token on user request; unknown ids only trigger a redraw
    async fn delete_token(&self, id: &str) -> Result<bool>;

    /// Expand a card, collapsing any other; expanding the open card collapses it
    async fn toggle_expanded(&self, id: &str) -> Result<bool>;

    /// Contract address of a token, announced to the view
    async fn copy_address(&self, id: &str) -> Result<Option<String>>;
}

pub struct TrackerPresenterImpl<R: ?Sized, F: ?Sized, V: ?Sized> {
    reconcile: Arc<R>,
    refresh: Arc<F>,
    view: Arc<V>,
    store: SharedTokenStore,
    expanded: Mutex<Option<String>>,
}

impl<R, F, V> TrackerPresenterImpl<R, F, V>
where
    R: ReconcileInteractor + ?Sized,
    F: RefreshInteractor + ?Sized,
    V: TokenView + ?Sized,
{
    pub fn new(reconcile: Arc<R>, refresh: Arc<F>, view: Arc<V>, store: SharedTokenStore) -> Self {
        Self {
            reconcile,
            refresh,
            view,
            store,
            expanded: Mutex::new(None),
        }
    }

    async fn board(&self) -> TokenBoard {
        let (tokens, max_tokens) = {
            let store = self.store.read().await;
            (store.snapshot(), store.max_tokens())
        };

        let expanded = {
            let mut expanded = self.expanded.lock().unwrap_or_else(|e| e.into_inner());
            // Evicted or deleted cards cannot stay open
            if let Some(id) = expanded.as_ref() {
                if !tokens.iter().any(|t| &t.id == id) {
                    *expanded = None;
                }
            }
            expanded.clone()
        };

        TokenBoard {
            tokens,
            status: self.reconcile.feed_status(),
            max_tokens,
            expanded,
        }
    }
}

#[async_trait]
impl<R, F, V> TrackerPresenter for TrackerPresenterImpl<R, F, V>
where
    R: ReconcileInteractor + ?Sized,
    F: RefreshInteractor + ?Sized,
    V: TokenView + ?Sized,
{
    async fn reconcile_tick(&self) -> Result<ReconcileOutcome> {
        let outcome = self.reconcile.reconcile().await;
        if outcome.changed_store() {
            self.show_tokens().await?;
        }
        Ok(outcome)
    }

    async fn refresh_tick(&self) -> Result<RefreshOutcome> {
        let outcome = self.refresh.refresh().await;
        if outcome != RefreshOutcome::Skipped {
            self.show_tokens().await?;
        }
        Ok(outcome)
    }

    async fn show_tokens(&self) -> Result<()> {
        let board = self.board().await;
        self.view.display_tokens(&board).await
    }

    async fn delete_token(&self, id: &str) -> Result<bool> {
        let removed = self.store.write().await.remove_by_id(id);
        if removed.is_none() {
            debug!("Delete requested for unknown token {}", id);
        }

        self.show_tokens().await?;
        Ok(removed.is_some())
    }

    async fn toggle_expanded(&self, id: &str) -> Result<bool> {
        let exists = self.store.read().await.contains(id);

        let now_expanded = {
            let mut expanded = self.expanded.lock().unwrap_or_else(|e| e.into_inner());
            if !exists || expanded.as_deref() == Some(id) {
                *expanded = None;
                false
            } else {
                *expanded = Some(id.to_string());
                true
            }
        };

        self.show_tokens().await?;
        Ok(now_expanded)
    }

    async fn copy_address(&self, id: &str) -> Result<Option<String>> {
        let address = self
            .store
            .read()
            .await
            .get(id)
            .map(|t| t.address.clone());

        match &address {
            Some(address) => self.view.display_address_copied(address).await?,
            None => {
                self.view
                    .display_error(format!("Token {} not found", id))
                    .await?
            }
        }

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FeedStatus;
    use crate::interactor::token_store::tests::token;
    use crate::interactor::token_store::TokenStore;

    struct NoopReconcile;

    #[async_trait]
    impl ReconcileInteractor for NoopReconcile {
        async fn reconcile(&self) -> ReconcileOutcome {
            ReconcileOutcome::Skipped
        }

        fn feed_status(&self) -> FeedStatus {
            FeedStatus::Live
        }
    }

    struct NoopRefresh;

    #[async_trait]
    impl RefreshInteractor for NoopRefresh {
        async fn refresh(&self) -> RefreshOutcome {
            RefreshOutcome::Refreshed { quoted: 0, walked: 0 }
        }
    }

    #[derive(Default)]
    struct RecordingView {
        boards: Mutex<Vec<TokenBoard>>,
        copied: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TokenView for RecordingView {
        async fn display_tokens(&self, board: &TokenBoard) -> Result<()> {
            self.boards.lock().unwrap().push(board.clone());
            Ok(())
        }

        async fn display_address_copied(&self, address: &str) -> Result<()> {
            self.copied.lock().unwrap().push(address.to_string());
            Ok(())
        }

        async fn display_error(&self, error_message: String) -> Result<()> {
            self.errors.lock().unwrap().push(error_message);
            Ok(())
        }
    }

    async fn presenter(
        ids: &[&str],
    ) -> (
        TrackerPresenterImpl<NoopReconcile, NoopRefresh, RecordingView>,
        Arc<RecordingView>,
        SharedTokenStore,
    ) {
        let store = TokenStore::shared(100);
        for id in ids {
            store.write().await.insert_front(token(id));
        }
        let view = Arc::new(RecordingView::default());
        let presenter = TrackerPresenterImpl::new(
            Arc::new(NoopReconcile),
            Arc::new(NoopRefresh),
            view.clone(),
            store.clone(),
        );
        (presenter, view, store)
    }

    #[tokio::test]
    async fn test_delete_redraws_once() {
        let (presenter, view, store) = presenter(&["1", "2"]).await;

        assert!(presenter.delete_token("1").await.unwrap());

        assert!(!store.read().await.contains("1"));
        let boards = view.boards.lock().unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].tokens.len(), 1);
        assert_eq!(boards[0].status, FeedStatus::Live);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_leaves_store() {
        let (presenter, _view, store) = presenter(&["1"]).await;

        assert!(!presenter.delete_token("404").await.unwrap());
        assert_eq!(store.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_only_one_card_expanded() {
        let (presenter, view, _store) = presenter(&["1", "2"]).await;

        assert!(presenter.toggle_expanded("1").await.unwrap());
        assert!(presenter.toggle_expanded("2").await.unwrap());
        assert_eq!(
            view.boards.lock().unwrap().last().unwrap().expanded.as_deref(),
            Some("2")
        );

        assert!(!presenter.toggle_expanded("2").await.unwrap());
        assert_eq!(view.boards.lock().unwrap().last().unwrap().expanded, None);
    }

    #[tokio::test]
    async fn test_deleting_expanded_card_collapses_it() {
        let (presenter, view, _store) = presenter(&["1"]).await;

        presenter.toggle_expanded("1").await.unwrap();
        presenter.delete_token("1").await.unwrap();

        assert_eq!(view.boards.lock().unwrap().last().unwrap().expanded, None);
    }

    #[tokio::test]
    async fn test_copy_address() {
        let (presenter, view, _store) = presenter(&["1"]).await;

        let address = presenter.copy_address("1").await.unwrap();
        assert_eq!(address, Some(token("1").address));
        assert_eq!(view.copied.lock().unwrap().len(), 1);

        assert_eq!(presenter.copy_address("404").await.unwrap(), None);
        assert_eq!(view.errors.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_skipped_reconcile_does_not_redraw() {
        let (presenter, view, _store) = presenter(&[]).await;

        presenter.reconcile_tick().await.unwrap();
        assert!(view.boards.lock().unwrap().is_empty());

        presenter.refresh_tick().await.unwrap();
        assert_eq!(view.boards.lock().unwrap().len(), 1);
    }
}
