//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/get/update/delete over the `contacts` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `ContactInput::validate()` before SQL mutations.
//! - Every mutation is a single parameterized statement.
//! - `isFavorite` is stored as INTEGER `0`/`1`; other values are corrupt data.
//! - Lists are ordered by `id ASC` (insertion order).

use crate::db::migrations::apply_migrations;
use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, ContactInput};
use crate::model::photo::normalize_photo_ref;
use crate::model::validation::ContactValidationError;
use crate::search::filter::search_contacts;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    name,
    mobile,
    landline,
    photo,
    isFavorite
FROM contacts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    /// Caller passed an id the store can never have assigned.
    InvalidId(ContactId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidId(id) => write!(f, "invalid contact id: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidId(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of an update or delete targeting one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Exactly one row was affected.
    Applied,
    /// No row matched; the contact no longer exists.
    NotFound,
}

impl WriteOutcome {
    fn from_rows(changed: usize) -> Self {
        if changed == 0 {
            Self::NotFound
        } else {
            Self::Applied
        }
    }
}

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    /// Creates the schema when missing. Safe to call repeatedly.
    fn ensure_schema(&self) -> RepoResult<()>;
    fn create(&self, input: &ContactInput) -> RepoResult<ContactId>;
    fn list(&self) -> RepoResult<Vec<Contact>>;
    fn list_favorites(&self) -> RepoResult<Vec<Contact>>;
    fn get(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Replaces every mutable field of `id`.
    fn update(&self, id: ContactId, input: &ContactInput) -> RepoResult<WriteOutcome>;
    fn delete(&self, id: ContactId) -> RepoResult<WriteOutcome>;

    /// Case-insensitive name filter over an already loaded list.
    ///
    /// Pure and synchronous; never touches storage.
    fn search(&self, query: &str, within: &[Contact]) -> Vec<Contact> {
        search_contacts(query, within)
    }
}

/// SQLite-backed contact repository over a caller-owned connection.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Wraps a connection and ensures the schema exists.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let repo = Self { conn };
        repo.ensure_schema()?;
        Ok(repo)
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn ensure_schema(&self) -> RepoResult<()> {
        apply_migrations(self.conn)?;
        Ok(())
    }

    fn create(&self, input: &ContactInput) -> RepoResult<ContactId> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO contacts (
                name,
                mobile,
                landline,
                photo,
                isFavorite
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                input.name.as_str(),
                input.mobile.as_str(),
                input.landline.as_str(),
                input.stored_photo(),
                bool_to_int(input.is_favorite),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list(&self) -> RepoResult<Vec<Contact>> {
        self.query_contacts(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))
    }

    fn list_favorites(&self) -> RepoResult<Vec<Contact>> {
        self.query_contacts(&format!(
            "{CONTACT_SELECT_SQL} WHERE isFavorite = 1 ORDER BY id ASC;"
        ))
    }

    fn get(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        ensure_valid_id(id)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn update(&self, id: ContactId, input: &ContactInput) -> RepoResult<WriteOutcome> {
        ensure_valid_id(id)?;
        input.validate()?;

        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                name = ?1,
                mobile = ?2,
                landline = ?3,
                photo = ?4,
                isFavorite = ?5
             WHERE id = ?6;",
            params![
                input.name.as_str(),
                input.mobile.as_str(),
                input.landline.as_str(),
                input.stored_photo(),
                bool_to_int(input.is_favorite),
                id,
            ],
        )?;

        Ok(WriteOutcome::from_rows(changed))
    }

    fn delete(&self, id: ContactId) -> RepoResult<WriteOutcome> {
        ensure_valid_id(id)?;

        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id])?;

        Ok(WriteOutcome::from_rows(changed))
    }
}

impl SqliteContactRepository<'_> {
    fn query_contacts(&self, sql: &str) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id: ContactId = row.get("id")?;

    let is_favorite = match row.get::<_, i64>("isFavorite")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid isFavorite value `{other}` in contacts.isFavorite (id {id})"
            )));
        }
    };

    Ok(Contact {
        id,
        name: row.get("name")?,
        mobile: row.get("mobile")?,
        landline: row
            .get::<_, Option<String>>("landline")?
            .unwrap_or_default(),
        photo: normalize_photo_ref(row.get("photo")?),
        is_favorite,
    })
}

fn ensure_valid_id(id: ContactId) -> RepoResult<()> {
    if id <= 0 {
        return Err(RepoError::InvalidId(id));
    }
    Ok(())
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
