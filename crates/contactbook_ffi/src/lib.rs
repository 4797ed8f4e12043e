//! Flutter-facing bindings for the contact book.
//!
//! Screens call these functions through `flutter_rust_bridge`; all
//! persistence and validation stays in `contactbook_core`.

pub mod api;
