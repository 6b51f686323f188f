//! Flutter-facing bindings for the StockTrack core.

pub mod api;
