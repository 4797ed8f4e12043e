//! Contact use-case service.
//!
//! # Responsibility
//! - Provide the add/list/favourites/search/update/delete flows.
//! - Own favourite toggling (load, flip, write back).
//! - Emit metadata-only log events for every write.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Log lines carry ids and outcomes only, never names, numbers or photos.

use crate::model::contact::{Contact, ContactId, ContactInput};
use crate::repo::contact_repo::{ContactRepository, RepoError, RepoResult, WriteOutcome};
use log::{info, warn};

/// Use-case service wrapper for contact operations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new contact.
    ///
    /// # Errors
    /// - `RepoError::Validation` with every failing field; nothing is stored.
    /// - `RepoError::Db` when the insert fails.
    pub fn create_contact(&self, input: &ContactInput) -> RepoResult<ContactId> {
        match self.repo.create(input) {
            Ok(id) => {
                info!(
                    "event=contact_create module=service status=ok contact_id={id} favorite={}",
                    input.is_favorite
                );
                Ok(id)
            }
            Err(err) => {
                log_write_error("contact_create", &err);
                Err(err)
            }
        }
    }

    pub fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.repo.get(id)
    }

    /// All contacts in insertion order.
    pub fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        self.repo.list()
    }

    pub fn list_favorites(&self) -> RepoResult<Vec<Contact>> {
        self.repo.list_favorites()
    }

    /// Lists every contact and filters by name.
    pub fn search(&self, query: &str) -> RepoResult<Vec<Contact>> {
        let contacts = self.repo.list()?;
        Ok(self.repo.search(query, &contacts))
    }

    /// Replaces all mutable fields of an existing contact.
    ///
    /// Returns `WriteOutcome::NotFound` when the contact was deleted meanwhile.
    pub fn update_contact(&self, id: ContactId, input: &ContactInput) -> RepoResult<WriteOutcome> {
        let result = self.repo.update(id, input);
        log_write_result("contact_update", id, &result);
        result
    }

    pub fn delete_contact(&self, id: ContactId) -> RepoResult<WriteOutcome> {
        let result = self.repo.delete(id);
        log_write_result("contact_delete", id, &result);
        result
    }

    /// Sets the favourite flag, keeping every other field.
    pub fn set_favorite(&self, id: ContactId, is_favorite: bool) -> RepoResult<WriteOutcome> {
        let Some(contact) = self.repo.get(id)? else {
            warn!("event=contact_favorite module=service status=not_found contact_id={id}");
            return Ok(WriteOutcome::NotFound);
        };

        let input = contact.to_input().with_favorite(is_favorite);
        let result = self.repo.update(id, &input);
        log_write_result("contact_favorite", id, &result);
        result
    }

    /// Flips the favourite flag and returns the new state.
    ///
    /// Returns `None` when the contact does not exist.
    pub fn toggle_favorite(&self, id: ContactId) -> RepoResult<Option<bool>> {
        let Some(contact) = self.repo.get(id)? else {
            return Ok(None);
        };

        let next = !contact.is_favorite;
        match self.set_favorite(id, next)? {
            WriteOutcome::Applied => Ok(Some(next)),
            WriteOutcome::NotFound => Ok(None),
        }
    }
}

fn log_write_result(event: &str, id: ContactId, result: &RepoResult<WriteOutcome>) {
    match result {
        Ok(WriteOutcome::Applied) => {
            info!("event={event} module=service status=ok contact_id={id}");
        }
        Ok(WriteOutcome::NotFound) => {
            warn!("event={event} module=service status=not_found contact_id={id}");
        }
        Err(err) => log_write_error(event, err),
    }
}

fn log_write_error(event: &str, err: &RepoError) {
    let error_code = match err {
        RepoError::Validation(_) => "validation_failed",
        RepoError::Db(_) => "db_error",
        RepoError::InvalidId(_) => "invalid_id",
        RepoError::InvalidData(_) => "invalid_data",
    };
    // Field names only; DB error text may echo bound values.
    match err {
        RepoError::Validation(err) => warn!(
            "event={event} module=service status=error error_code={error_code} fields={}",
            err.report()
                .errors()
                .into_iter()
                .map(|(field, _)| field.as_str())
                .collect::<Vec<_>>()
                .join(",")
        ),
        _ => warn!("event={event} module=service status=error error_code={error_code}"),
    }
}
