//! `AddressBook` table lifecycle.
//!
//! # Responsibility
//! - Create the backing table on first use.
//! - Tell "already exists" apart from real creation failures.
//!
//! # Invariants
//! - Creation never alters an existing table.
//! - Only the "already exists" failure is treated as success.

use crate::error::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;

pub const TABLE_NAME: &str = "AddressBook";

const CREATE_TABLE_SQL: &str = "CREATE TABLE AddressBook (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    firstName TEXT NOT NULL,
    lastName TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    zip INTEGER NOT NULL,
    state TEXT NOT NULL,
    phoneNumber INTEGER NOT NULL,
    email TEXT NOT NULL
);";

/// Result of a table-setup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Created,
    AlreadyExists,
}

/// Issues the `CREATE TABLE` statement and classifies its failure.
///
/// A failed `CREATE TABLE` counts as "already exists" only when
/// `sqlite_master` holds a *table* named `AddressBook`. A view, index or
/// trigger with that name is a creation failure.
///
/// # Errors
/// Returns `StoreError::SchemaCreation` when creation fails for any reason
/// other than the table already being present.
pub fn ensure_table(conn: &Connection) -> StoreResult<TableStatus> {
    match conn.execute_batch(CREATE_TABLE_SQL) {
        Ok(()) => {
            info!("event=table_ensure module=db status=ok table={TABLE_NAME} result=created");
            Ok(TableStatus::Created)
        }
        Err(_) if table_exists(conn) => {
            info!(
                "event=table_ensure module=db status=ok table={TABLE_NAME} result=already_exists"
            );
            Ok(TableStatus::AlreadyExists)
        }
        Err(err) => {
            error!(
                "event=table_ensure module=db status=error table={TABLE_NAME} \
                 error_code=schema_creation_failed error={err}"
            );
            Err(StoreError::SchemaCreation(err))
        }
    }
}

// A failing lookup means the database is unreadable, which is never
// "already exists".
fn table_exists(conn: &Connection) -> bool {
    conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1 COLLATE NOCASE
        );",
        [TABLE_NAME],
        |row| row.get::<_, i64>(0),
    )
    .map(|exists| exists == 1)
    .unwrap_or(false)
}
