//! Inventory schema contract: table/column names and item addressing.
//!
//! # Responsibility
//! - Declare the canonical `items` entity identifiers shared by SQL and callers.
//! - Resolve textual addresses into [`ItemAddress`] once, at the boundary.
//!
//! # Invariants
//! - An address is either the whole collection or exactly one item id.
//! - Parsing is the only place where address strings are inspected.

use crate::model::item::ItemId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const CONTENT_AUTHORITY: &str = "stocktrack";
pub const BASE_CONTENT_URI: &str = "content://stocktrack";
pub const PATH_ITEMS: &str = "items";
/// Canonical collection address string.
pub const CONTENT_URI: &str = "content://stocktrack/items";

pub const TABLE_NAME: &str = "items";
pub const COLUMN_ID: &str = "_id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_DESCRIPTION: &str = "description";
pub const COLUMN_PRICE: &str = "price";
pub const COLUMN_QUANTITY: &str = "quantity";

pub const CONTENT_LIST_TYPE: &str = "vnd.stocktrack.dir/items";
pub const CONTENT_ITEM_TYPE: &str = "vnd.stocktrack.item/items";

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^content://stocktrack/items(?:/([0-9]+))?/?$").expect("valid address regex")
});

/// Target of a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemAddress {
    /// Every row of the `items` table.
    Collection,
    /// Exactly the row with this id.
    Item(ItemId),
}

/// Classification of an address, independent of storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Collection,
    Item,
}

/// A string that is neither the collection address nor an item address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAddress(pub String);

impl Display for InvalidAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid item address `{}`", self.0)
    }
}

impl Error for InvalidAddress {}

impl ItemAddress {
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Collection => ContentType::Collection,
            Self::Item(_) => ContentType::Item,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection)
    }
}

impl Display for ItemAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => f.write_str(CONTENT_URI),
            Self::Item(id) => write!(f, "{CONTENT_URI}/{id}"),
        }
    }
}

impl FromStr for ItemAddress {
    type Err = InvalidAddress;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let captures = ADDRESS_RE
            .captures(value.trim())
            .ok_or_else(|| InvalidAddress(value.to_string()))?;

        match captures.get(1) {
            None => Ok(Self::Collection),
            Some(id) => id
                .as_str()
                .parse::<i64>()
                .map(|id| Self::Item(ItemId(id)))
                .map_err(|_| InvalidAddress(value.to_string())),
        }
    }
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => CONTENT_LIST_TYPE,
            Self::Item => CONTENT_ITEM_TYPE,
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the item address for `id` under the collection.
pub fn with_appended_id(id: ItemId) -> ItemAddress {
    ItemAddress::Item(id)
}

/// Extracts the id of an item address; `None` for the collection.
pub fn parse_id(address: &ItemAddress) -> Option<ItemId> {
    match address {
        ItemAddress::Collection => None,
        ItemAddress::Item(id) => Some(*id),
    }
}

/// Classifies a textual address without touching storage.
pub fn resolve_type(address: &str) -> Result<ContentType, InvalidAddress> {
    address.parse::<ItemAddress>().map(|parsed| parsed.content_type())
}
