//! In-process change notification for item mutations.
//!
//! # Invariants
//! - Observers are called outside the registry lock, so a callback may
//!   subscribe, unsubscribe, or call back into the store.
//! - Observer ids are never reused within one notifier.

use crate::contract::ItemAddress;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Receives the address of every successful mutation.
pub trait ChangeObserver: Send + Sync {
    fn on_change(&self, address: &ItemAddress);
}

impl<F> ChangeObserver for F
where
    F: Fn(&ItemAddress) + Send + Sync,
{
    fn on_change(&self, address: &ItemAddress) {
        self(address)
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    observers: RwLock<BTreeMap<ObserverId, Arc<dyn ChangeObserver>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, observer);
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `address` to every observer in subscription order.
    pub fn notify(&self, address: &ItemAddress) {
        let snapshot: Vec<Arc<dyn ChangeObserver>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for observer in snapshot {
            observer.on_change(address);
        }
    }
}
