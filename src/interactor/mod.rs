use std::sync::atomic::{AtomicBool, Ordering};

pub mod history;
pub mod reconcile_interactor;
pub mod refresh_interactor;
pub mod simulator;
pub mod token_store;

pub use reconcile_interactor::{ReconcileInteractor, ReconcileInteractorImpl, ReconcileOutcome};
pub use refresh_interactor::{RefreshInteractor, RefreshInteractorImpl, RefreshOutcome};
pub use simulator::Simulator;
pub use token_store::{SharedTokenStore, TokenStore};

/// Marks a tick as running; released on drop.
///
/// A second tick of the same loop that starts while one is in flight gets
/// `None` and must not touch the store.
pub struct TickGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> TickGuard<'a> {
    pub fn try_acquire(busy: &'a AtomicBool) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { busy })
    }
}

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_guard_excludes_overlap() {
        let busy = AtomicBool::new(false);

        let guard = TickGuard::try_acquire(&busy);
        assert!(guard.is_some());
        assert!(TickGuard::try_acquire(&busy).is_none());

        drop(guard);
        assert!(TickGuard::try_acquire(&busy).is_some());
    }
}
