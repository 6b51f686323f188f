//! Item editor use-case.
//!
//! # Responsibility
//! - Hold the four text fields of the add/edit form.
//! - Turn form text into an `ItemValues` payload and route it to insert or update.
//! - Track whether the form was touched, to gate a discard prompt.
//!
//! # Invariants
//! - An editor only ever targets one item; the collection address is refused.
//! - Loading a row into the form does not count as a change.
//! - Creating with all four fields blank writes nothing.
//! - Price and quantity text is blank (0) or a base-10 integer; anything else
//!   is rejected before the store is called.

use crate::contract::ItemAddress;
use crate::model::item::ItemValues;
use crate::store::{ItemStore, StoreError, StoreResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Text content of the editor form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
}

impl ItemForm {
    pub fn is_blank(&self) -> bool {
        [&self.name, &self.description, &self.price, &self.quantity]
            .iter()
            .all(|value| value.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Name,
    Description,
    Price,
    Quantity,
}

impl EditorField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::Quantity => "quantity",
        }
    }
}

/// Result of a save action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New-item form was entirely blank.
    Skipped,
    Inserted(ItemAddress),
    /// Rows updated; 0 when the edited item no longer exists.
    Updated(usize),
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Updated(0))
    }

    /// User notice for this outcome; `None` when nothing happened.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Skipped => None,
            Self::Inserted(_) => Some("Item saved."),
            Self::Updated(0) => Some("Error updating item."),
            Self::Updated(_) => Some("Item updated."),
        }
    }
}

#[derive(Debug)]
pub enum EditorError {
    InvalidNumber { field: EditorField, input: String },
    /// Delete requested on a form that was never saved.
    NothingToDelete,
    Store(StoreError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { field, input } => {
                write!(f, "{} must be a whole number, got `{input}`", field.label())
            }
            Self::NothingToDelete => f.write_str("no saved item to delete"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EditorError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub struct ItemEditor {
    store: Arc<ItemStore>,
    address: Option<ItemAddress>,
    form: ItemForm,
    has_changed: bool,
}

impl ItemEditor {
    /// Editor for a new item; starts blank.
    pub fn new_item(store: Arc<ItemStore>) -> Self {
        Self {
            store,
            address: None,
            form: ItemForm::default(),
            has_changed: false,
        }
    }

    /// Editor for an existing item, pre-filled from the store.
    ///
    /// The form stays blank when the item does not exist. The collection
    /// address is rejected with [`StoreError::InvalidAddress`].
    pub fn open(store: Arc<ItemStore>, address: ItemAddress) -> StoreResult<Self> {
        if address.is_collection() {
            return Err(StoreError::InvalidAddress(address.to_string()));
        }

        let mut editor = Self {
            store,
            address: Some(address),
            form: ItemForm::default(),
            has_changed: false,
        };
        editor.reload()?;
        Ok(editor)
    }

    /// Re-reads the edited item, discarding local edits.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.form = ItemForm::default();
        self.has_changed = false;

        let Some(address) = self.address else {
            return Ok(());
        };
        if let Some(item) = self.store.query(&address)?.into_iter().next() {
            self.form = ItemForm {
                name: item.name,
                description: item.description,
                price: item.price.to_string(),
                quantity: item.quantity.to_string(),
            };
        }
        Ok(())
    }

    pub fn address(&self) -> Option<ItemAddress> {
        self.address
    }

    /// Whether the delete action applies.
    pub fn is_editing(&self) -> bool {
        self.address.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Item"
        } else {
            "Add an Item"
        }
    }

    pub fn form(&self) -> &ItemForm {
        &self.form
    }

    pub fn set_field(&mut self, field: EditorField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EditorField::Name => self.form.name = value,
            EditorField::Description => self.form.description = value,
            EditorField::Price => self.form.price = value,
            EditorField::Quantity => self.form.quantity = value,
        }
        self.has_changed = true;
    }

    /// Marks the form as touched without changing any text.
    pub fn touch(&mut self) {
        self.has_changed = true;
    }

    /// True when leaving should ask before discarding edits.
    pub fn has_unsaved_changes(&self) -> bool {
        self.has_changed
    }

    /// Persists the form through insert (new item) or update (existing item).
    pub fn save(&mut self) -> Result<SaveOutcome, EditorError> {
        if self.address.is_none() && self.form.is_blank() {
            return Ok(SaveOutcome::Skipped);
        }

        let values = self.values()?;
        let outcome = match self.address {
            None => {
                let address = self.store.insert(&values)?;
                self.address = Some(address);
                SaveOutcome::Inserted(address)
            }
            Some(address) => SaveOutcome::Updated(self.store.update(&address, &values)?),
        };

        self.has_changed = false;
        Ok(outcome)
    }

    /// Deletes the edited item and returns the rows removed.
    pub fn delete(&mut self) -> Result<usize, EditorError> {
        let address = self.address.ok_or(EditorError::NothingToDelete)?;
        let deleted = self.store.delete(&address)?;
        self.has_changed = false;
        Ok(deleted)
    }

    fn values(&self) -> Result<ItemValues, EditorError> {
        Ok(ItemValues {
            name: Some(self.form.name.clone()),
            description: Some(self.form.description.clone()),
            price: Some(parse_count(EditorField::Price, &self.form.price)?),
            quantity: Some(parse_count(EditorField::Quantity, &self.form.quantity)?),
        })
    }
}

/// Notice for a failed save, by editor mode.
pub fn save_failure_message(is_editing: bool) -> &'static str {
    if is_editing {
        "Error updating item."
    } else {
        "Error saving item."
    }
}

/// Notice for a delete action that removed `deleted` rows.
pub fn delete_message(deleted: usize) -> &'static str {
    if deleted > 0 {
        "Item deleted."
    } else {
        "Error deleting item."
    }
}

fn parse_count(field: EditorField, input: &str) -> Result<i64, EditorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| EditorError::InvalidNumber {
            field,
            input: input.to_string(),
        })
}
