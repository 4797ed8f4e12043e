//! Contact search entry points.
//!
//! # Responsibility
//! - Filter already loaded contact lists while the user types.
//!
//! # Invariants
//! - Search never touches storage.

pub mod filter;
