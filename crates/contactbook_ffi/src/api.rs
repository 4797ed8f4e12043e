//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the home, favourites, add and update screen flows to Dart via FRB.
//! - Translate core results into flat envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens its own connection; no connection is cached globally.
//! - The database path is fixed once per process and never defaults to a
//!   temporary directory.

use contactbook_core::db::open_db;
use contactbook_core::{
    apply_selection, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, Contact, ContactField, ContactId, ContactInput, ContactService,
    PhotoSelection, RepoError, SqliteContactRepository, WriteOutcome,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_PATH_ENV: &str = "CONTACTBOOK_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

const CREATED_MESSAGE: &str = "Contact created successfully!";
const UPDATED_MESSAGE: &str = "Contact updated successfully.";
const UPDATE_MISSING_MESSAGE: &str = "Update failed: contact no longer exists.";
const DELETED_MESSAGE: &str = "Contact deleted.";
const INVALID_ID_MESSAGE: &str = "Please insert a valid Contact Id";
const VALIDATION_MESSAGE: &str = "Please fix the highlighted fields.";
const DB_UNCONFIGURED_MESSAGE: &str =
    "db path not configured; call configure_db_path or set CONTACTBOOK_DB_PATH";

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by every later call.
///
/// Must run before the first contact call to take effect. Calling again
/// with the same path is a no-op; a different path is rejected.
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }

    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Resolves the photo to keep after a camera or gallery pick.
///
/// Input semantics:
/// - `cancelled`: user backed out of the picker.
/// - `error`: picker failure message.
/// - `mime` + `bytes`: picked image data, stored as an inline `data:` reference.
/// - `uri`: picker already produced a file or content URI.
///
/// Cancellation, failure or an empty pick keep `current`.
#[flutter_rust_bridge::frb(sync)]
pub fn photo_from_pick(
    current: Option<String>,
    cancelled: bool,
    error: Option<String>,
    mime: Option<String>,
    bytes: Option<Vec<u8>>,
    uri: Option<String>,
) -> Option<String> {
    let selection = if cancelled {
        PhotoSelection::Cancelled
    } else if let Some(reason) = error {
        PhotoSelection::Failed(reason)
    } else if let (Some(mime), Some(bytes)) = (mime, bytes) {
        PhotoSelection::Selected { mime, bytes }
    } else if let Some(uri) = uri {
        PhotoSelection::Uri(uri)
    } else {
        PhotoSelection::Cancelled
    };
    apply_selection(current, selection)
}

/// Contact row as rendered by list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub landline: String,
    /// Stored photo or the placeholder asset reference.
    pub photo: String,
    pub has_photo: bool,
    pub is_favorite: bool,
}

/// Editable fields collected by the add/update screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub mobile: String,
    pub landline: String,
    pub photo: Option<String>,
    pub is_favorite: bool,
}

/// Validation message bound to one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// `name|mobile|landline`.
    pub field: String,
    pub message: String,
}

/// List response envelope for home/favourites/search screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    pub items: Vec<ContactItem>,
    pub message: String,
}

/// Action response envelope for write flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    pub contact_id: Option<i64>,
    pub message: String,
    /// One entry per failing field; empty unless validation failed.
    pub field_errors: Vec<FieldError>,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: ContactId) -> Self {
        Self {
            ok: true,
            contact_id: Some(contact_id),
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    fn from_repo_error(operation: &str, err: RepoError) -> Self {
        match err {
            RepoError::Validation(err) => Self {
                ok: false,
                contact_id: None,
                message: VALIDATION_MESSAGE.to_string(),
                field_errors: err
                    .report()
                    .errors()
                    .into_iter()
                    .map(|(field, message)| to_field_error(field, message))
                    .collect(),
            },
            RepoError::InvalidId(_) => Self::failure(INVALID_ID_MESSAGE),
            other => Self::failure(format!("{operation} failed: {other}")),
        }
    }
}

/// Lists every contact in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list() -> ContactListResponse {
    list_response("contacts_list", |service| service.list_contacts())
}

/// Lists favourite contacts in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list_favorites() -> ContactListResponse {
    list_response("contacts_list_favorites", |service| service.list_favorites())
}

/// Case-insensitive name search; empty query lists everything.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_search(query: String) -> ContactListResponse {
    list_response("contacts_search", |service| service.search(&query))
}

/// Loads one contact to prefill the update screen.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_get(id: i64) -> ContactListResponse {
    match with_contact_service(|service| service.get_contact(id)) {
        Ok(Some(contact)) => ContactListResponse {
            ok: true,
            items: vec![to_contact_item(contact)],
            message: "Found 1 contact.".to_string(),
        },
        Ok(None) => list_failure(INVALID_ID_MESSAGE),
        Err(ServiceCallError::Repo(RepoError::InvalidId(_))) => list_failure(INVALID_ID_MESSAGE),
        Err(err) => list_failure(format!("contact_get failed: {err}")),
    }
}

/// Validates and stores a new contact.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_create(draft: ContactDraft) -> ContactActionResponse {
    let input = to_contact_input(draft);
    match with_contact_service(|service| service.create_contact(&input)) {
        Ok(id) => ContactActionResponse::success(CREATED_MESSAGE, id),
        Err(err) => err.into_action_response("contact_create"),
    }
}

/// Replaces every editable field of an existing contact.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_update(id: i64, draft: ContactDraft) -> ContactActionResponse {
    let input = to_contact_input(draft);
    match with_contact_service(|service| service.update_contact(id, &input)) {
        Ok(WriteOutcome::Applied) => ContactActionResponse::success(UPDATED_MESSAGE, id),
        Ok(WriteOutcome::NotFound) => ContactActionResponse::failure(UPDATE_MISSING_MESSAGE),
        Err(err) => err.into_action_response("contact_update"),
    }
}

/// Deletes a contact by id.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_delete(id: i64) -> ContactActionResponse {
    match with_contact_service(|service| service.delete_contact(id)) {
        Ok(WriteOutcome::Applied) => ContactActionResponse::success(DELETED_MESSAGE, id),
        Ok(WriteOutcome::NotFound) => ContactActionResponse::failure(INVALID_ID_MESSAGE),
        Err(err) => err.into_action_response("contact_delete"),
    }
}

/// Sets or clears the favourite flag.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_set_favorite(id: i64, is_favorite: bool) -> ContactActionResponse {
    match with_contact_service(|service| service.set_favorite(id, is_favorite)) {
        Ok(WriteOutcome::Applied) => {
            let message = if is_favorite {
                "Added to favourites."
            } else {
                "Removed from favourites."
            };
            ContactActionResponse::success(message, id)
        }
        Ok(WriteOutcome::NotFound) => ContactActionResponse::failure(INVALID_ID_MESSAGE),
        Err(err) => err.into_action_response("contact_set_favorite"),
    }
}

enum ServiceCallError {
    Open(String),
    Repo(RepoError),
}

impl std::fmt::Display for ServiceCallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(message) => f.write_str(message),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl ServiceCallError {
    fn into_action_response(self, operation: &str) -> ContactActionResponse {
        match self {
            Self::Open(message) => {
                ContactActionResponse::failure(format!("{operation} failed: {message}"))
            }
            Self::Repo(err) => ContactActionResponse::from_repo_error(operation, err),
        }
    }
}

fn list_response(
    operation: &str,
    f: impl FnOnce(
        &ContactService<SqliteContactRepository<'_>>,
    ) -> contactbook_core::RepoResult<Vec<Contact>>,
) -> ContactListResponse {
    match with_contact_service(f) {
        Ok(contacts) => {
            let items = contacts
                .into_iter()
                .map(to_contact_item)
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No contacts.".to_string()
            } else {
                format!("Found {} contact(s).", items.len())
            };
            ContactListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => {
            warn!("event={operation} module=ffi status=error");
            list_failure(format!("{operation} failed: {err}"))
        }
    }
}

fn list_failure(message: impl Into<String>) -> ContactListResponse {
    ContactListResponse {
        ok: false,
        items: Vec::new(),
        message: message.into(),
    }
}

fn resolve_db_path() -> Option<PathBuf> {
    if let Some(path) = DB_PATH.get() {
        return Some(path.clone());
    }
    let from_env = db_path_from_env(std::env::var(DB_PATH_ENV).ok())?;
    Some(DB_PATH.get_or_init(|| from_env).clone())
}

fn db_path_from_env(raw: Option<String>) -> Option<PathBuf> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn open_connection() -> Result<Connection, ServiceCallError> {
    let path = resolve_db_path()
        .ok_or_else(|| ServiceCallError::Open(DB_UNCONFIGURED_MESSAGE.to_string()))?;
    open_db(path).map_err(|err| ServiceCallError::Open(format!("contact DB open failed: {err}")))
}

fn with_contact_service<T>(
    f: impl FnOnce(&ContactService<SqliteContactRepository<'_>>) -> contactbook_core::RepoResult<T>,
) -> Result<T, ServiceCallError> {
    let conn = open_connection()?;
    let repo = SqliteContactRepository::try_new(&conn).map_err(ServiceCallError::Repo)?;
    let service = ContactService::new(repo);
    f(&service).map_err(ServiceCallError::Repo)
}

fn to_contact_input(draft: ContactDraft) -> ContactInput {
    let input = ContactInput::new(draft.name, draft.mobile)
        .with_landline(draft.landline)
        .with_favorite(draft.is_favorite);
    match draft.photo {
        Some(photo) => input.with_photo(photo),
        None => input,
    }
}

fn to_contact_item(contact: Contact) -> ContactItem {
    ContactItem {
        photo: contact.photo_or_placeholder().to_string(),
        has_photo: contact.photo.is_some(),
        id: contact.id,
        name: contact.name,
        mobile: contact.mobile,
        landline: contact.landline,
        is_favorite: contact.is_favorite,
    }
}

fn to_field_error(field: ContactField, message: &str) -> FieldError {
    FieldError {
        field: field.as_str().to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_db_path, contact_create, contact_delete, contact_get, contact_set_favorite,
        contact_update, contacts_list, contacts_list_favorites, contacts_search, core_version,
        db_path_from_env, init_logging, photo_from_pick, ping, ContactDraft, CREATED_MESSAGE,
        INVALID_ID_MESSAGE,
    };
    use contactbook_core::model::validation::MOBILE_MESSAGE;
    use contactbook_core::PLACEHOLDER_PHOTO;
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB: OnceLock<PathBuf> = OnceLock::new();

    fn use_test_db() {
        let path = TEST_DB.get_or_init(|| {
            let dir = tempfile::tempdir().unwrap().into_path();
            dir.join("Contact.db")
        });
        let error = configure_db_path(path.to_str().unwrap().to_string());
        assert!(error.is_empty(), "{error}");
    }

    fn unique_name(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{prefix}{nanos}")
    }

    fn draft(name: &str) -> ContactDraft {
        ContactDraft {
            name: name.to_string(),
            mobile: "9876543210".to_string(),
            ..ContactDraft::default()
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn configure_db_path_rejects_switching() {
        use_test_db();
        assert!(!configure_db_path("/somewhere/else.db".to_string()).is_empty());
        assert!(!configure_db_path("  ".to_string()).is_empty());
    }

    #[test]
    fn create_then_search_and_get() {
        use_test_db();
        let name = unique_name("Search");
        let created = contact_create(draft(&name));
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.message, CREATED_MESSAGE);
        let id = created.contact_id.unwrap();

        let hits = contacts_search(name.to_uppercase());
        assert!(hits.ok, "{}", hits.message);
        assert_eq!(hits.items.len(), 1);
        assert_eq!(hits.items[0].id, id);
        assert_eq!(hits.items[0].photo, PLACEHOLDER_PHOTO);
        assert!(!hits.items[0].has_photo);

        let loaded = contact_get(id);
        assert!(loaded.ok);
        assert_eq!(loaded.items[0].name, name);
        assert!(contacts_list().items.iter().any(|item| item.id == id));
    }

    #[test]
    fn create_reports_field_errors() {
        use_test_db();
        let mut invalid = draft("Bad Name");
        invalid.mobile = "12345".to_string();

        let response = contact_create(invalid);
        assert!(!response.ok);
        assert_eq!(response.contact_id, None);
        let fields = response
            .field_errors
            .iter()
            .map(|error| error.field.as_str())
            .collect::<Vec<_>>();
        assert_eq!(fields, vec!["name", "mobile"]);
        assert_eq!(response.field_errors[1].message, MOBILE_MESSAGE);
    }

    #[test]
    fn favourite_update_and_delete_flow() {
        use_test_db();
        let name = unique_name("Fav");
        let id = contact_create(draft(&name)).contact_id.unwrap();

        let favorite = contact_set_favorite(id, true);
        assert!(favorite.ok, "{}", favorite.message);
        assert!(contacts_list_favorites()
            .items
            .iter()
            .any(|item| item.id == id && item.is_favorite));

        let mut edited = draft(&name);
        edited.landline = "0201234567".to_string();
        edited.photo = Some("file:///fav.png".to_string());
        let updated = contact_update(id, edited);
        assert!(updated.ok, "{}", updated.message);
        let loaded = contact_get(id);
        assert_eq!(loaded.items[0].landline, "0201234567");
        assert!(loaded.items[0].has_photo);
        assert!(!loaded.items[0].is_favorite);

        assert!(contact_delete(id).ok);
        let second = contact_delete(id);
        assert!(!second.ok);
        assert_eq!(second.message, INVALID_ID_MESSAGE);
        assert!(!contact_update(id, draft(&name)).ok);
        assert!(!contact_get(id).ok);
    }

    #[test]
    fn malformed_id_is_reported_not_panicked() {
        use_test_db();
        let response = contact_delete(0);
        assert!(!response.ok);
        assert_eq!(response.message, INVALID_ID_MESSAGE);
    }

    #[test]
    fn db_path_requires_non_blank_env_value() {
        assert_eq!(db_path_from_env(None), None);
        assert_eq!(db_path_from_env(Some("   ".to_string())), None);
        assert_eq!(
            db_path_from_env(Some(" /data/Contact.db ".to_string())),
            Some(PathBuf::from("/data/Contact.db"))
        );
    }

    #[test]
    fn photo_from_pick_keeps_current_on_cancel_or_error() {
        let current = Some("file:///old.png".to_string());
        assert_eq!(
            photo_from_pick(current.clone(), true, None, None, None, None),
            current
        );
        assert_eq!(
            photo_from_pick(
                current.clone(),
                false,
                Some("camera unavailable".to_string()),
                Some("image/png".to_string()),
                Some(b"abc".to_vec()),
                None,
            ),
            current
        );
        assert_eq!(
            photo_from_pick(current.clone(), false, None, None, None, None),
            current
        );
    }

    #[test]
    fn photo_from_pick_encodes_bytes_and_passes_uris() {
        assert_eq!(
            photo_from_pick(
                None,
                false,
                None,
                Some("image/png".to_string()),
                Some(b"abc".to_vec()),
                None,
            )
            .as_deref(),
            Some("data:image/png;base64,YWJj")
        );
        assert_eq!(
            photo_from_pick(
                None,
                false,
                None,
                None,
                None,
                Some("content://media/1".to_string()),
            )
            .as_deref(),
            Some("content://media/1")
        );
    }

    #[test]
    fn picked_photo_is_stored_with_contact() {
        use_test_db();
        let photo = photo_from_pick(
            None,
            false,
            None,
            Some("image/jpeg".to_string()),
            Some(vec![0xff, 0xd8]),
            None,
        );
        let mut with_photo = draft(&unique_name("Pic"));
        with_photo.photo = photo.clone();
        let id = contact_create(with_photo).contact_id.unwrap();

        let loaded = contact_get(id);
        assert!(loaded.items[0].has_photo);
        assert_eq!(Some(loaded.items[0].photo.clone()), photo);
    }
}
