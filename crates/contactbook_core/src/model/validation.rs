//! Validation rule set for contact writes.
//!
//! # Responsibility
//! - Check every writable field of a `ContactInput` independently.
//! - Produce one user-facing message per failing field.
//!
//! # Invariants
//! - Validation is pure: no storage access, no logging of field values.
//! - All fields are checked even when an earlier one already failed.
//! - An empty landline is accepted; a non-empty one must be 10 digits.

use crate::model::contact::ContactInput;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NAME_REQUIRED_MESSAGE: &str = "Please enter the name";
pub const NAME_FORMAT_MESSAGE: &str = "Name must be maximum 50 characters long";
pub const MOBILE_MESSAGE: &str = "Please enter a valid 10-digit mobile number";
pub const LANDLINE_MESSAGE: &str = "Please enter a valid 10-digit landline number";

pub const NAME_MAX_CHARS: usize = 50;
pub const PHONE_DIGITS: usize = 10;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9!@#$%^&*]{1,50}$").expect("valid name regex"));

/// Field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Mobile,
    Landline,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Mobile => "mobile",
            Self::Landline => "landline",
        }
    }
}

/// Per-field outcome of [`validate_contact_input`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub name: Option<&'static str>,
    pub mobile: Option<&'static str>,
    pub landline: Option<&'static str>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.name.is_none() && self.mobile.is_none() && self.landline.is_none()
    }

    /// Failing fields in display order.
    pub fn errors(&self) -> Vec<(ContactField, &'static str)> {
        [
            (ContactField::Name, self.name),
            (ContactField::Mobile, self.mobile),
            (ContactField::Landline, self.landline),
        ]
        .into_iter()
        .filter_map(|(field, message)| message.map(|message| (field, message)))
        .collect()
    }
}

/// Rejected contact input, carrying every failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactValidationError(pub ValidationReport);

impl ContactValidationError {
    pub fn report(&self) -> &ValidationReport {
        &self.0
    }
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .0
            .errors()
            .into_iter()
            .map(|(field, message)| format!("{}: {message}", field.as_str()))
            .collect::<Vec<_>>();
        write!(f, "invalid contact input: {}", messages.join("; "))
    }
}

impl Error for ContactValidationError {}

/// Validates a candidate contact against the write rules.
pub fn validate_contact_input(input: &ContactInput) -> ValidationReport {
    ValidationReport {
        name: check_name(&input.name),
        mobile: check_mobile(&input.mobile),
        landline: check_landline(&input.landline),
    }
}

fn check_name(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some(NAME_REQUIRED_MESSAGE)
    } else if !NAME_RE.is_match(name) {
        Some(NAME_FORMAT_MESSAGE)
    } else {
        None
    }
}

fn check_mobile(mobile: &str) -> Option<&'static str> {
    (!is_phone_number(mobile)).then_some(MOBILE_MESSAGE)
}

fn check_landline(landline: &str) -> Option<&'static str> {
    if landline.is_empty() || is_phone_number(landline) {
        None
    } else {
        Some(LANDLINE_MESSAGE)
    }
}

fn is_phone_number(value: &str) -> bool {
    value.len() == PHONE_DIGITS && value.bytes().all(|byte| byte.is_ascii_digit())
}
