//! Inventory list use-case.
//!
//! # Responsibility
//! - Keep a rendered snapshot of the whole collection for list views.
//! - Re-query lazily after the store reports a change.
//!
//! # Invariants
//! - Rows are ordered by ascending item id.
//! - The snapshot is never served after a change notification without a
//!   fresh query in between.

use crate::contract::ItemAddress;
use crate::model::item::Item;
use crate::store::notify::ObserverId;
use crate::store::{ItemStore, StoreResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const UNKNOWN_ITEM_NAME: &str = "Unknown Item";
pub const CURRENCY_GLYPH: &str = "₱";
pub const IN_STOCK_PREFIX: &str = "In Stock: ";

/// Display-ready projection of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListRow {
    /// Target for the "select" action.
    pub address: ItemAddress,
    pub name: String,
    pub description: String,
    pub price_label: String,
    pub stock_label: String,
}

impl From<&Item> for ItemListRow {
    fn from(item: &Item) -> Self {
        let name = if item.name.trim().is_empty() {
            UNKNOWN_ITEM_NAME.to_string()
        } else {
            item.name.clone()
        };

        Self {
            address: ItemAddress::Item(item.id),
            name,
            description: item.description.clone(),
            price_label: format!("{CURRENCY_GLYPH} {}", item.price),
            stock_label: format!("{IN_STOCK_PREFIX}{}", item.quantity),
        }
    }
}

/// List controller bound to a shared store for its whole lifetime.
pub struct InventoryList {
    store: Arc<ItemStore>,
    observer: ObserverId,
    stale: Arc<AtomicBool>,
    rows: Vec<ItemListRow>,
}

impl InventoryList {
    /// Subscribes to `store` and performs the initial collection query.
    pub fn attach(store: Arc<ItemStore>) -> StoreResult<Self> {
        let stale = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&stale);
        let observer = store.subscribe(Arc::new(move |_: &ItemAddress| {
            flag.store(true, Ordering::Release);
        }));

        let mut list = Self {
            store,
            observer,
            stale,
            rows: Vec::new(),
        };
        list.refresh()?;
        Ok(list)
    }

    /// Current rows, re-queried first when a change was reported.
    pub fn rows(&mut self) -> StoreResult<&[ItemListRow]> {
        if self.is_stale() {
            self.refresh()?;
        }
        Ok(&self.rows)
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    /// Unconditionally re-queries the collection.
    pub fn refresh(&mut self) -> StoreResult<()> {
        // Clear before querying so a change racing the query marks us stale again.
        self.stale.store(false, Ordering::Release);
        match self.store.query(&ItemAddress::Collection) {
            Ok(items) => {
                self.rows = items.iter().map(ItemListRow::from).collect();
                Ok(())
            }
            Err(err) => {
                self.stale.store(true, Ordering::Release);
                Err(err)
            }
        }
    }

    /// Address of the row at `index`, for opening the editor.
    pub fn select(&self, index: usize) -> Option<ItemAddress> {
        self.rows.get(index).map(|row| row.address)
    }

    /// Removes every item and returns how many were deleted.
    pub fn delete_all(&self) -> StoreResult<usize> {
        self.store.delete(&ItemAddress::Collection)
    }
}

impl Drop for InventoryList {
    fn drop(&mut self) {
        self.store.unsubscribe(self.observer);
    }
}

/// Notice shown after "delete all".
pub fn delete_all_message(deleted: usize) -> String {
    format!("Deleted all {deleted} items.")
}
