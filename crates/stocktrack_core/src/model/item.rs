//! Item record and write payload.
//!
//! # Responsibility
//! - Define the stored `Item` shape returned by queries.
//! - Define `ItemValues`, the partial field set accepted by insert/update.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - `name` is present and non-blank on insert, and non-blank whenever an
//!   update sets it.
//! - `price`/`quantity` are rejected when negative, and only when present.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row id. Never reused within one database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the `items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Empty when the stored column is NULL.
    pub description: String,
    pub price: i64,
    pub quantity: i64,
}

/// Field set for insert/update. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemValues {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    NameRequired,
    InvalidPrice(i64),
    InvalidQuantity(i64),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => f.write_str("name required"),
            Self::InvalidPrice(_) => f.write_str("invalid price"),
            Self::InvalidQuantity(_) => f.write_str("invalid quantity"),
        }
    }
}

impl Error for ItemValidationError {}

impl ItemValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Number of supplied fields.
    pub fn len(&self) -> usize {
        usize::from(self.name.is_some())
            + usize::from(self.description.is_some())
            + usize::from(self.price.is_some())
            + usize::from(self.quantity.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks a payload that creates a new row.
    pub fn validate_for_insert(&self) -> Result<(), ItemValidationError> {
        if self.name.is_none() {
            return Err(ItemValidationError::NameRequired);
        }
        self.validate_present()
    }

    /// Checks only the fields an update would write.
    pub fn validate_for_update(&self) -> Result<(), ItemValidationError> {
        self.validate_present()
    }

    fn validate_present(&self) -> Result<(), ItemValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ItemValidationError::NameRequired);
            }
        }
        if let Some(price) = self.price {
            if price < 0 {
                return Err(ItemValidationError::InvalidPrice(price));
            }
        }
        if let Some(quantity) = self.quantity {
            if quantity < 0 {
                return Err(ItemValidationError::InvalidQuantity(quantity));
            }
        }
        Ok(())
    }
}
