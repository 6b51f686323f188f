//! Repository layer over the `items` table.
//!
//! # Responsibility
//! - Keep SQL text and row decoding inside the persistence boundary.
//! - Translate typed filters into parameterized statements.
//!
//! # Invariants
//! - Write paths run `ItemValues` validation before any SQL is issued.
//! - Read paths reject rows that break item invariants.

pub mod item_repo;
