//! Flutter-facing bindings for QuickNote core.

pub mod api;
