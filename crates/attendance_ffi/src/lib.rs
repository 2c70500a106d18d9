//! Flutter-facing bindings for the attendance core.

pub mod api;
