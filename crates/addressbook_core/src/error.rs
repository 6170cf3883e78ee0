//! Store error taxonomy.
//!
//! # Responsibility
//! - Classify every failure the contact store can report.
//! - Separate connection-level faults from per-statement failures.
//!
//! # Invariants
//! - "table already exists" and "no matching row" are outcomes, never errors.
//! - Store operations surface failures as values and never panic.

use crate::model::contact::{ContactId, ContactValidationError};
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Connection descriptor is missing or malformed. Fatal at startup.
    Initialization(String),
    /// Table creation failed for a reason other than "already exists".
    SchemaCreation(rusqlite::Error),
    /// Contact rejected before any SQL was issued.
    Validation(ContactValidationError),
    /// Connection or statement execution failed.
    Persistence(rusqlite::Error),
    /// Stored value cannot be coerced to its numeric column type.
    DataCorruption {
        column: &'static str,
        row_id: Option<ContactId>,
        value: String,
    },
    /// Insert statement completed but affected no rows.
    NotInserted,
}

impl StoreError {
    /// Returns whether the error means the connection itself is unusable.
    ///
    /// Bulk insert stops at the first such error instead of moving on to
    /// the next contact.
    pub fn is_connection_fault(&self) -> bool {
        match self {
            Self::Persistence(err) | Self::SchemaCreation(err) => is_connection_fault(err),
            _ => false,
        }
    }

    /// Stable short code for logs and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Initialization(_) => "initialization_failed",
            Self::SchemaCreation(_) => "schema_creation_failed",
            Self::Validation(_) => "validation_failed",
            Self::Persistence(_) => "persistence_failed",
            Self::DataCorruption { .. } => "data_corruption",
            Self::NotInserted => "not_inserted",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialization(message) => write!(f, "store initialization failed: {message}"),
            Self::SchemaCreation(err) => write!(f, "could not create AddressBook table: {err}"),
            Self::Validation(err) => write!(f, "invalid contact: {err}"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::DataCorruption {
                column,
                row_id: Some(id),
                value,
            } => write!(
                f,
                "corrupt value `{value}` in AddressBook.{column} for row {id}"
            ),
            Self::DataCorruption {
                column,
                row_id: None,
                value,
            } => write!(f, "corrupt value `{value}` in AddressBook.{column}"),
            Self::NotInserted => write!(f, "insert affected no rows"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SchemaCreation(err) | Self::Persistence(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Initialization(_) | Self::DataCorruption { .. } | Self::NotInserted => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Persistence(value)
    }
}

impl From<ContactValidationError> for StoreError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Returns whether a driver error leaves the connection unusable.
pub(crate) fn is_connection_fault(err: &rusqlite::Error) -> bool {
    let failure = match err {
        rusqlite::Error::SqliteFailure(failure, _) => failure,
        rusqlite::Error::SqlInputError { error, .. } => error,
        _ => return false,
    };
    matches!(
        failure.code,
        ErrorCode::CannotOpen
        | ErrorCode::NotADatabase
        | ErrorCode::DatabaseCorrupt
        | ErrorCode::SystemIoFailure
        | ErrorCode::OutOfMemory
        | ErrorCode::PermissionDenied
    )
}
