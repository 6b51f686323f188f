//! Use-case controllers over the item store.
//!
//! # Responsibility
//! - Give list and editor front-ends (FFI, CLI) ready-made flows.
//! - Keep presentation strings (labels, notices) out of the store.

pub mod inventory_list;
pub mod item_editor;
