//! Core inventory logic for StockTrack.
//! This crate owns the `items` table and every rule about what may be stored in it.

pub mod config;
pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use contract::{resolve_type, ContentType, InvalidAddress, ItemAddress};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::item::{Item, ItemId, ItemValidationError, ItemValues};
pub use repo::item_repo::{
    ItemColumn, ItemFilter, ItemRepository, ItemSort, RepoError, RepoResult, SortDirection,
    SqliteItemRepository,
};
pub use service::inventory_list::{delete_all_message, InventoryList, ItemListRow};
pub use service::item_editor::{
    delete_message, save_failure_message, EditorError, EditorField, ItemEditor, ItemForm,
    SaveOutcome,
};
pub use store::notify::{ChangeNotifier, ChangeObserver, ObserverId};
pub use store::{ItemQuery, ItemStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
