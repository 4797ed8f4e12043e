//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for contacts.
//! - Isolate SQLite query details from service/presentation code.
//!
//! # Invariants
//! - Repository writes must run the validation rule set before persistence.
//! - Zero-row updates and deletes are reported as `WriteOutcome::NotFound`,
//!   never as errors.

pub mod contact_repo;
