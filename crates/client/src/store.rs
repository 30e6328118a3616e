//! Filter-state store owned by the page controller.
//!
//! The store is cheaply cloneable via `Arc`. Every clone sees the same state;
//! subscribers are woken whenever the state actually changes.

use std::sync::{Arc, PoisonError, RwLock};

use shopfacet_core::{FilterMetadata, FilterState};
use tokio::sync::watch;

/// Shared filter state plus the server's facet metadata.
#[derive(Clone)]
pub struct FilterStore {
    inner: Arc<FilterStoreInner>,
}

struct FilterStoreInner {
    state: watch::Sender<FilterState>,
    metadata: RwLock<FilterMetadata>,
}

impl FilterStore {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: FilterState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(FilterStoreInner {
                state,
                metadata: RwLock::new(FilterMetadata::default()),
            }),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn get(&self) -> FilterState {
        self.inner.state.borrow().clone()
    }

    /// Replace the state; subscribers are notified when it differs.
    pub fn set(&self, state: FilterState) {
        self.inner.state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    /// Mutate the state in place.
    ///
    /// Subscribers are notified only when the mutation changed something.
    /// Returns whether it did.
    pub fn update<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut FilterState),
    {
        self.inner.state.send_if_modified(|current| {
            let before = current.clone();
            mutate(current);
            *current != before
        })
    }

    /// Clear every selection and restore the default price bounds.
    pub fn reset(&self) -> bool {
        self.update(FilterState::reset)
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.inner.state.subscribe(),
        }
    }

    /// Snapshot of the facet metadata.
    #[must_use]
    pub fn metadata(&self) -> FilterMetadata {
        self.inner
            .metadata
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store fresh metadata and drop price bounds it makes redundant.
    pub fn set_metadata(&self, metadata: FilterMetadata) {
        let bounds = metadata.price_range;
        *self
            .inner
            .metadata
            .write()
            .unwrap_or_else(PoisonError::into_inner) = metadata;
        self.update(|state| state.normalize_price(&bounds));
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

/// A stream of state snapshots.
pub struct Subscription {
    receiver: watch::Receiver<FilterState>,
}

impl Subscription {
    /// The state as of the last observed change.
    #[must_use]
    pub fn current(&self) -> FilterState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once every store handle has been dropped.
    pub async fn next(&mut self) -> Option<FilterState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Whether a change arrived that has not been observed yet.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shopfacet_core::{CategoryId, PriceBounds};

    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let store = FilterStore::default();
        let mut sub = store.subscribe();

        assert!(store.update(|s| {
            s.toggle_category(CategoryId::new(5));
        }));

        let next = sub.next().await.expect("store alive");
        assert!(next.categories.contains(&CategoryId::new(5)));
    }

    #[test]
    fn test_noop_update_does_not_notify() {
        let store = FilterStore::default();
        let sub = store.subscribe();

        assert!(!store.update(|s| s.set_search("   ")));
        store.set(FilterState::default());

        assert!(!sub.has_changed());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let store = FilterStore::default();
        store.update(|s| {
            s.toggle_brand("Acme");
            s.in_stock = true;
        });

        assert!(store.reset());
        assert!(store.get().is_empty());
        assert!(!store.reset());
    }

    #[test]
    fn test_set_metadata_normalizes_price() {
        let store = FilterStore::default();
        store.update(|s| s.set_price_range(None, Some(Decimal::from(5000))));

        store.set_metadata(FilterMetadata {
            price_range: PriceBounds::new(Decimal::ZERO, Decimal::from(5000)),
            ..FilterMetadata::default()
        });

        assert!(store.get().price_range.is_unbounded());
        assert_eq!(store.metadata().price_range.max, Decimal::from(5000));
    }

    #[tokio::test]
    async fn test_subscription_ends_when_store_dropped() {
        let store = FilterStore::default();
        let mut sub = store.subscribe();
        drop(store);
        assert!(sub.next().await.is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = FilterStore::default();
        let other = store.clone();
        other.update(|s| s.is_new = true);
        assert!(store.get().is_new);
    }
}
