//! Contact domain model.
//!
//! # Responsibility
//! - Define the record rendered by list/favourite screens (`Contact`).
//! - Define the mutable-field subset collected by add/update flows
//!   (`ContactInput`).
//!
//! # Invariants
//! - `id` is assigned by the store, never reused and never mutated.
//! - `photo` is `None` rather than an empty string when no image is set.

use crate::model::photo::{normalize_photo_ref, PLACEHOLDER_PHOTO};
use crate::model::validation::{validate_contact_input, ContactValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned contact identifier (SQLite `INTEGER PRIMARY KEY`).
pub type ContactId = i64;

/// Persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub mobile: String,
    /// Empty when no landline was given.
    pub landline: String,
    /// URI or `data:` reference; `None` renders the placeholder image.
    pub photo: Option<String>,
    pub is_favorite: bool,
}

impl Contact {
    /// Photo reference to render, falling back to the bundled placeholder.
    pub fn photo_or_placeholder(&self) -> &str {
        self.photo.as_deref().unwrap_or(PLACEHOLDER_PHOTO)
    }

    /// Copies the mutable fields into an input for the update flow.
    pub fn to_input(&self) -> ContactInput {
        ContactInput {
            name: self.name.clone(),
            mobile: self.mobile.clone(),
            landline: self.landline.clone(),
            photo: self.photo.clone(),
            is_favorite: self.is_favorite,
        }
    }
}

/// Caller-supplied fields for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInput {
    pub name: String,
    pub mobile: String,
    pub landline: String,
    pub photo: Option<String>,
    pub is_favorite: bool,
}

impl ContactInput {
    /// Creates an input with the two required fields set.
    pub fn new(name: impl Into<String>, mobile: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mobile: mobile.into(),
            ..Self::default()
        }
    }

    pub fn with_landline(mut self, landline: impl Into<String>) -> Self {
        self.landline = landline.into();
        self
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = normalize_photo_ref(Some(photo.into()));
        self
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Runs the full rule set; see [`validate_contact_input`].
    ///
    /// # Errors
    /// - Returns every failing field message at once.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        let report = validate_contact_input(self);
        if report.is_valid() {
            Ok(())
        } else {
            Err(ContactValidationError(report))
        }
    }

    /// Photo reference as it will be stored.
    pub fn stored_photo(&self) -> Option<&str> {
        self.photo
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }
}
