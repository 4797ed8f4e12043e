//! Core contact store for the ContactBook app.
//! This crate is the single source of truth for contact invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::contact::{Contact, ContactId, ContactInput};
pub use model::photo::{apply_selection, encode_data_uri, PhotoSelection, PLACEHOLDER_PHOTO};
pub use model::validation::{
    validate_contact_input, ContactField, ContactValidationError, ValidationReport,
};
pub use repo::contact_repo::{
    ContactRepository, RepoError, RepoResult, SqliteContactRepository, WriteOutcome,
};
pub use search::filter::search_contacts;
pub use service::contact_service::ContactService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
