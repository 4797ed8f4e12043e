use contactbook_core::db::migrations::latest_version;
use contactbook_core::db::{open_db, open_db_in_memory, DbError};
use contactbook_core::{ContactInput, ContactRepository, SqliteContactRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "contacts");
}

#[test]
fn opening_same_database_twice_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Contact.db");

    let conn_first = open_db(&path).unwrap();
    let repo = SqliteContactRepository::try_new(&conn_first).unwrap();
    let id = repo
        .create(&ContactInput::new("Alex1", "9876543210"))
        .unwrap();
    drop(repo);
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqliteContactRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.get(id).unwrap().unwrap().name, "Alex1");
}

#[test]
fn repository_creates_schema_on_bare_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    assert_table_exists(&conn, "contacts");
    assert!(repo.list().unwrap().is_empty());

    repo.ensure_schema().unwrap();
    repo.ensure_schema().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn legacy_table_without_schema_version_is_adopted() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(20),
            mobile VARCHAR(10),
            landline VARCHAR(10),
            photo TEXT,
            isFavorite BOOLEAN DEFAULT 0
        );
        INSERT INTO contacts (name, mobile, landline, photo, isFavorite)
        VALUES ('Old1', '1111111111', NULL, '', 1);",
    )
    .unwrap();

    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let contacts = repo.list().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].landline, "");
    assert_eq!(contacts[0].photo, None);
    assert!(contacts[0].is_favorite);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
