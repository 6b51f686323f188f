//! Address-dispatching item store.
//!
//! # Responsibility
//! - Own the single connection to the inventory table.
//! - Translate an [`ItemAddress`] into a row filter and run the matching
//!   repository operation.
//! - Publish a change notification after every mutation that touched rows.
//!
//! # Invariants
//! - An item address always replaces the caller's filter with `_id = id`.
//! - Observers run after the statement has committed and after the
//!   connection lock is released; a re-query from a callback sees the change.
//! - Validation failures, empty updates and zero-row mutations never notify.

pub mod notify;

use crate::config::CoreConfig;
use crate::contract::{self, ContentType, InvalidAddress, ItemAddress};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::item::{Item, ItemValidationError, ItemValues};
use crate::repo::item_repo::{
    ItemFilter, ItemRepository, ItemSort, RepoError, SqliteItemRepository,
};
use log::{debug, warn};
use notify::{ChangeNotifier, ChangeObserver, ObserverId};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Unknown address shape. A caller bug, not a user-recoverable state.
    InvalidAddress(String),
    /// A supplied field breaks an item constraint; nothing was written.
    Validation(ItemValidationError),
    /// SQLite failed or returned rows that break item invariants.
    Storage(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(address) => write!(f, "invalid item address `{address}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAddress(_) => None,
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(RepoError::Db(value))
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<InvalidAddress> for StoreError {
    fn from(value: InvalidAddress) -> Self {
        Self::InvalidAddress(value.0)
    }
}

/// Filter and ordering for collection queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub filter: ItemFilter,
    pub sort: Option<ItemSort>,
}

/// Thread-safe CRUD entry point over the `items` table.
pub struct ItemStore {
    conn: Mutex<Connection>,
    notifier: ChangeNotifier,
}

impl ItemStore {
    /// Wraps a connection already bootstrapped by [`open_db`].
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn from_config(config: &CoreConfig) -> StoreResult<Self> {
        Self::open(&config.db_path)
    }

    /// Runs a query; an item address with no row yields an empty vector.
    pub fn query(&self, address: &ItemAddress) -> StoreResult<Vec<Item>> {
        self.query_with(address, &ItemQuery::default())
    }

    pub fn query_with(&self, address: &ItemAddress, query: &ItemQuery) -> StoreResult<Vec<Item>> {
        let started_at = Instant::now();
        let filter = effective_filter(address, &query.filter);
        let conn = self.lock_conn();
        let items = SqliteItemRepository::new(&conn).query_items(&filter, query.sort)?;
        debug!(
            "event=item_query module=store status=ok target={} rows={} duration_ms={}",
            target_label(address),
            items.len(),
            started_at.elapsed().as_millis()
        );
        Ok(items)
    }

    /// Creates a row and returns its item address.
    pub fn insert(&self, values: &ItemValues) -> StoreResult<ItemAddress> {
        let started_at = Instant::now();
        let result = {
            let conn = self.lock_conn();
            SqliteItemRepository::new(&conn).insert_item(values)
        };

        match result {
            Ok(id) => {
                debug!(
                    "event=item_insert module=store status=ok item_id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                self.notifier.notify(&ItemAddress::Collection);
                Ok(contract::with_appended_id(id))
            }
            Err(err) => {
                log_write_failure("item_insert", &ItemAddress::Collection, &err);
                Err(err.into())
            }
        }
    }

    /// Writes the supplied fields to the addressed row(s).
    pub fn update(&self, address: &ItemAddress, values: &ItemValues) -> StoreResult<usize> {
        self.update_matching(address, values, &ItemFilter::default())
    }

    /// Like [`ItemStore::update`]; `filter` narrows a collection update and
    /// is ignored for an item address.
    pub fn update_matching(
        &self,
        address: &ItemAddress,
        values: &ItemValues,
        filter: &ItemFilter,
    ) -> StoreResult<usize> {
        let filter = effective_filter(address, filter);
        let result = {
            let conn = self.lock_conn();
            SqliteItemRepository::new(&conn).update_items(&filter, values)
        };
        self.finish_mutation("item_update", address, result)
    }

    /// Deletes the addressed row, or every row for the collection address.
    pub fn delete(&self, address: &ItemAddress) -> StoreResult<usize> {
        self.delete_matching(address, &ItemFilter::default())
    }

    pub fn delete_matching(&self, address: &ItemAddress, filter: &ItemFilter) -> StoreResult<usize> {
        let filter = effective_filter(address, filter);
        let result = {
            let conn = self.lock_conn();
            SqliteItemRepository::new(&conn).delete_items(&filter)
        };
        self.finish_mutation("item_delete", address, result)
    }

    /// Classifies an address string. Never touches storage.
    pub fn resolve_type(&self, address: &str) -> StoreResult<ContentType> {
        Ok(contract::resolve_type(address)?)
    }

    pub fn subscribe(&self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        self.notifier.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.notifier.len()
    }

    fn finish_mutation(
        &self,
        event: &'static str,
        address: &ItemAddress,
        result: Result<usize, RepoError>,
    ) -> StoreResult<usize> {
        match result {
            Ok(rows) => {
                debug!(
                    "event={event} module=store status=ok target={} rows={rows}",
                    target_label(address)
                );
                if rows > 0 {
                    self.notifier.notify(address);
                }
                Ok(rows)
            }
            Err(err) => {
                log_write_failure(event, address, &err);
                Err(err.into())
            }
        }
    }

    // Each statement is atomic, so a panic elsewhere cannot leave the
    // connection half-written.
    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn effective_filter(address: &ItemAddress, filter: &ItemFilter) -> ItemFilter {
    match address {
        ItemAddress::Collection => filter.clone(),
        ItemAddress::Item(id) => ItemFilter::by_id(*id),
    }
}

fn target_label(address: &ItemAddress) -> String {
    match address {
        ItemAddress::Collection => "collection".to_string(),
        ItemAddress::Item(id) => format!("item:{id}"),
    }
}

fn log_write_failure(event: &str, address: &ItemAddress, err: &RepoError) {
    match err {
        RepoError::Validation(reason) => debug!(
            "event={event} module=store status=rejected target={} reason=\"{reason}\"",
            target_label(address)
        ),
        other => warn!(
            "event={event} module=store status=error target={} error={other}",
            target_label(address)
        ),
    }
}
