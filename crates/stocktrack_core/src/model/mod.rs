//! Inventory domain model.
//!
//! # Invariants
//! - Every stored item is identified by a store-assigned `ItemId`.
//! - `price` and `quantity` are never negative for a stored item.

pub mod item;
