use addressbook_core::{Contact, ContactRepository, SqliteContactStore, StoreError};
use std::path::PathBuf;
use tempfile::TempDir;

fn store_over_corrupted_file() -> (TempDir, SqliteContactStore) {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("book.db");
    let store = SqliteContactStore::open(path.to_str().unwrap()).unwrap();
    store.put_contacts(&[Contact::new("Ada", "Lovelace")]);

    std::fs::write(&path, "not a database ".repeat(128)).unwrap();
    (dir, store)
}

fn assert_connection_fault(err: &StoreError) {
    assert!(matches!(err, StoreError::Persistence(_)), "unexpected error: {err}");
    assert!(err.is_connection_fault(), "{err} should be a connection fault");
}

#[test]
fn update_on_unreadable_database_returns_persistence_error() {
    let (_dir, store) = store_over_corrupted_file();
    let mut contact = Contact::new("Augusta", "Lovelace");
    contact.id = 1;

    let err = store.update_contact(&contact).unwrap_err();
    assert_connection_fault(&err);
}

#[test]
fn delete_on_unreadable_database_returns_persistence_error() {
    let (_dir, store) = store_over_corrupted_file();

    let err = store.delete_contact_by_name("Ada", "Lovelace").unwrap_err();
    assert_connection_fault(&err);
}

#[test]
fn list_on_unreadable_database_returns_persistence_error() {
    let (_dir, store) = store_over_corrupted_file();

    let err = store.get_contacts().unwrap_err();
    assert_connection_fault(&err);
}

#[test]
fn reopening_unreadable_database_fails_schema_creation() {
    let (dir, _store) = store_over_corrupted_file();
    let path = dir.path().join("book.db");

    let err = SqliteContactStore::open(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, StoreError::SchemaCreation(_)));
}

#[test]
fn view_named_like_the_table_fails_schema_creation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch("CREATE VIEW AddressBook AS SELECT 1 AS id;")
        .unwrap();
    drop(conn);

    let err = SqliteContactStore::open(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, StoreError::SchemaCreation(_)));
}
