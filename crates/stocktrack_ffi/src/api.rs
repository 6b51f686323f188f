//! FFI use-case API for the Flutter inventory screens.
//!
//! # Responsibility
//! - Expose list/editor flows of the core as sync, string-friendly calls.
//! - Translate core errors into the user notices shown by the app.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Items cross the boundary by their textual address (`item_uri`).
//! - Single-item calls refuse the collection address.

use log::warn;
use std::sync::{Arc, OnceLock};
use stocktrack_core::{
    core_version as core_version_inner, delete_all_message, delete_message,
    init_logging as init_logging_inner, ping as ping_inner, resolve_type, save_failure_message,
    CoreConfig, EditorField, InventoryList, ItemAddress, ItemEditor, ItemListRow, ItemStore,
    SaveOutcome,
};

static CORE_CONFIG: OnceLock<CoreConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One rendered row of the inventory list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListEntry {
    /// Address passed back to `item_get` / `item_save` / `item_delete`.
    pub item_uri: String,
    pub name: String,
    pub description: String,
    pub price_label: String,
    pub stock_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListResponse {
    pub ok: bool,
    /// Empty list renders the empty-state view.
    pub items: Vec<ItemListEntry>,
    pub message: String,
}

/// Editor form pre-fill for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFormResponse {
    pub ok: bool,
    /// Whether the addressed item exists; fields are blank when it does not.
    pub found: bool,
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub message: String,
}

/// Generic action response envelope for save/delete flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemActionResponse {
    pub ok: bool,
    /// Address of the saved item, when one exists.
    pub item_uri: Option<String>,
    /// Notice for a transient toast/snackbar; may be empty.
    pub message: String,
}

impl ItemActionResponse {
    fn success(message: impl Into<String>, item_uri: Option<String>) -> Self {
        Self {
            ok: true,
            item_uri,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_uri: None,
            message: message.into(),
        }
    }
}

/// Lists all items in id order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures return `ok=false` with an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn items_list() -> ItemListResponse {
    let result = open_store().and_then(|store| {
        let mut list = InventoryList::attach(store).map_err(|err| err.to_string())?;
        let rows = list.rows().map_err(|err| err.to_string())?;
        Ok(rows.iter().map(to_list_entry).collect::<Vec<_>>())
    });

    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No items in stock.".to_string()
            } else {
                format!("{} item(s).", items.len())
            };
            ItemListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => ItemListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("items_list failed: {err}"),
        },
    }
}

/// Loads one item into editor form fields.
#[flutter_rust_bridge::frb(sync)]
pub fn item_get(item_uri: String) -> ItemFormResponse {
    let result = parse_item_address(&item_uri).and_then(|address| {
        let store = open_store()?;
        ItemEditor::open(store, address).map_err(|err| err.to_string())
    });

    match result {
        Ok(editor) => {
            let form = editor.form().clone();
            let found = !form.is_blank();
            ItemFormResponse {
                ok: true,
                found,
                name: form.name,
                description: form.description,
                price: form.price,
                quantity: form.quantity,
                message: String::new(),
            }
        }
        Err(err) => ItemFormResponse {
            ok: false,
            found: false,
            name: String::new(),
            description: String::new(),
            price: String::new(),
            quantity: String::new(),
            message: format!("item_get failed: {err}"),
        },
    }
}

/// Saves the editor form: insert when `item_uri` is `None`, update otherwise.
///
/// # FFI contract
/// - A new item with all four fields blank is skipped (`ok=true`, empty message).
/// - Blank price/quantity are stored as 0.
#[flutter_rust_bridge::frb(sync)]
pub fn item_save(
    item_uri: Option<String>,
    name: String,
    description: String,
    price: String,
    quantity: String,
) -> ItemActionResponse {
    let is_editing = item_uri.is_some();
    let address = match item_uri.as_deref().map(parse_item_address).transpose() {
        Ok(address) => address,
        Err(err) => return ItemActionResponse::failure(err),
    };
    let store = match open_store() {
        Ok(store) => store,
        Err(err) => {
            return ItemActionResponse::failure(format!(
                "{} {err}",
                save_failure_message(is_editing)
            ))
        }
    };

    let mut editor = match address {
        Some(address) => match ItemEditor::open(store, address) {
            Ok(editor) => editor,
            Err(err) => {
                return ItemActionResponse::failure(format!(
                    "{} {err}",
                    save_failure_message(is_editing)
                ))
            }
        },
        None => ItemEditor::new_item(store),
    };
    editor.set_field(EditorField::Name, name);
    editor.set_field(EditorField::Description, description);
    editor.set_field(EditorField::Price, price);
    editor.set_field(EditorField::Quantity, quantity);

    match editor.save() {
        Ok(SaveOutcome::Skipped) => ItemActionResponse::success("", None),
        Ok(outcome @ SaveOutcome::Updated(0)) => {
            ItemActionResponse::failure(outcome.message().unwrap_or_default())
        }
        Ok(outcome) => ItemActionResponse::success(
            outcome.message().unwrap_or_default(),
            editor.address().map(|address| address.to_string()),
        ),
        Err(err) => {
            warn!("event=ffi_item_save module=ffi status=error editing={is_editing}");
            ItemActionResponse::failure(format!("{} {err}", save_failure_message(is_editing)))
        }
    }
}

/// Deletes one item.
#[flutter_rust_bridge::frb(sync)]
pub fn item_delete(item_uri: String) -> ItemActionResponse {
    let result = parse_item_address(&item_uri).and_then(|address| {
        let store = open_store()?;
        store.delete(&address).map_err(|err| err.to_string())
    });

    match result {
        Ok(deleted) if deleted > 0 => ItemActionResponse::success(delete_message(deleted), None),
        Ok(deleted) => ItemActionResponse::failure(delete_message(deleted)),
        Err(err) => ItemActionResponse::failure(format!("{} {err}", delete_message(0))),
    }
}

/// Deletes every item.
#[flutter_rust_bridge::frb(sync)]
pub fn items_delete_all() -> ItemActionResponse {
    let result = open_store().and_then(|store| {
        store
            .delete(&ItemAddress::Collection)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(deleted) => ItemActionResponse::success(delete_all_message(deleted), None),
        Err(err) => ItemActionResponse::failure(format!("items_delete_all failed: {err}")),
    }
}

/// Content type of an address, or `None` when it is not an item address.
#[flutter_rust_bridge::frb(sync)]
pub fn item_content_type(item_uri: String) -> Option<String> {
    resolve_type(&item_uri)
        .ok()
        .map(|kind| kind.as_str().to_string())
}

fn core_config() -> &'static CoreConfig {
    CORE_CONFIG.get_or_init(|| {
        CoreConfig::from_env().unwrap_or_else(|err| {
            warn!("event=ffi_config module=ffi status=fallback error={err}");
            CoreConfig::default()
        })
    })
}

fn open_store() -> Result<Arc<ItemStore>, String> {
    ItemStore::from_config(core_config())
        .map(Arc::new)
        .map_err(|err| format!("inventory DB open failed: {err}"))
}

/// Parses an address that must name exactly one item.
fn parse_item_address(item_uri: &str) -> Result<ItemAddress, String> {
    let address = item_uri.parse::<ItemAddress>().map_err(|err| err.to_string())?;
    if address.is_collection() {
        return Err(format!("expected an item address, got `{item_uri}`"));
    }
    Ok(address)
}

fn to_list_entry(row: &ItemListRow) -> ItemListEntry {
    ItemListEntry {
        item_uri: row.address.to_string(),
        name: row.name.clone(),
        description: row.description.clone(),
        price_label: row.price_label.clone(),
        stock_label: row.stock_label.clone(),
    }
}
