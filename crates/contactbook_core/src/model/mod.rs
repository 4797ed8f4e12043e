//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its writable input shape.
//! - Own the validation rules gating every write.
//! - Turn image-acquisition results into stored photo references.
//!
//! # Invariants
//! - Every persisted contact is identified by a store-assigned `ContactId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod contact;
pub mod photo;
pub mod validation;
