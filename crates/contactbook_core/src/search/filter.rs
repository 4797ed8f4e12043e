//! In-memory name filter for type-as-you-search.
//!
//! # Invariants
//! - An empty query returns the input list unchanged.
//! - Matching is a case-insensitive substring test on `name` only.
//! - Result order follows input order.

use crate::model::contact::Contact;

/// Returns contacts whose name contains `query`, ignoring case.
pub fn search_contacts(query: &str, within: &[Contact]) -> Vec<Contact> {
    if query.is_empty() {
        return within.to_vec();
    }

    let needle = query.to_lowercase();
    within
        .iter()
        .filter(|contact| contact.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
