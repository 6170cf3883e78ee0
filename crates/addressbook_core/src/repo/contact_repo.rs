//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the five address-book operations over the `AddressBook` table.
//! - Convert every driver failure into a classified outcome or error value.
//!
//! # Invariants
//! - Every operation opens exactly one connection and drops it before return.
//! - Insert never binds a caller-supplied `id`.
//! - Write paths call `Contact::validate()` before SQL mutations.
//! - Read paths reject non-numeric `id`/`zip`/`phoneNumber` values instead of
//!   masking them.

use crate::db::{ensure_table, ConnectionDescriptor, TableStatus};
use crate::error::{StoreError, StoreResult};
use crate::model::contact::{Contact, ContactId};
use log::{error, info, warn};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row, Statement};
use std::time::Instant;

const INSERT_SQL: &str = "INSERT INTO AddressBook (
    firstName,
    lastName,
    address,
    city,
    zip,
    state,
    phoneNumber,
    email
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);";

const UPDATE_SQL: &str = "UPDATE AddressBook
 SET
    firstName = ?1,
    lastName = ?2,
    address = ?3,
    city = ?4,
    zip = ?5,
    state = ?6,
    phoneNumber = ?7,
    email = ?8
 WHERE id = ?9;";

const DELETE_BY_NAME_SQL: &str = "DELETE FROM AddressBook
 WHERE firstName = ?1 AND lastName = ?2;";

const SELECT_ALL_SQL: &str = "SELECT
    id,
    firstName,
    lastName,
    address,
    city,
    zip,
    state,
    phoneNumber,
    email
FROM AddressBook
ORDER BY id ASC;";

/// Per-contact result of a bulk insert.
#[derive(Debug)]
pub enum InsertStatus {
    Inserted { id: ContactId },
    Failed(StoreError),
}

/// Outcome for one input contact, keyed by its position in the batch.
#[derive(Debug)]
pub struct InsertOutcome {
    pub index: usize,
    pub first_name: String,
    pub last_name: String,
    pub status: InsertStatus,
}

/// Connection-level failure that stopped a bulk insert.
///
/// Contacts from `at_index` onward were not persisted.
#[derive(Debug)]
pub struct BulkInsertAbort {
    pub at_index: usize,
    pub error: StoreError,
}

/// Aggregate report for `put_contacts`.
#[derive(Debug, Default)]
pub struct BulkInsertReport {
    pub outcomes: Vec<InsertOutcome>,
    pub aborted: Option<BulkInsertAbort>,
}

impl BulkInsertReport {
    pub fn inserted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, InsertStatus::Inserted { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.inserted_count()
    }

    /// Store-assigned ids in input order.
    pub fn inserted_ids(&self) -> Vec<ContactId> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome.status {
                InsertStatus::Inserted { id } => Some(id),
                InsertStatus::Failed(_) => None,
            })
            .collect()
    }

    /// True when every contact was attempted and none failed.
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && self.failed_count() == 0
    }
}

/// Result of `update_contact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
    /// More than one row matched a primary-key update; the table is malformed.
    MultipleRows(usize),
}

impl UpdateOutcome {
    fn from_changed_rows(changed: usize) -> Self {
        match changed {
            0 => Self::NotFound,
            1 => Self::Updated,
            n => Self::MultipleRows(n),
        }
    }
}

/// Result of `delete_contact_by_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(usize),
    NotFound,
}

/// Repository interface for address-book operations.
pub trait ContactRepository {
    /// Creates the backing table when missing.
    fn ensure_table(&self) -> StoreResult<TableStatus>;
    /// Inserts contacts one by one, tolerating per-contact failures.
    fn put_contacts(&self, contacts: &[Contact]) -> BulkInsertReport;
    /// Replaces every non-id field of the row with `contact.id`.
    fn update_contact(&self, contact: &Contact) -> StoreResult<UpdateOutcome>;
    /// Deletes every row matching the name pair.
    fn delete_contact_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<DeleteOutcome>;
    /// Lists all contacts ordered by id.
    fn get_contacts(&self) -> StoreResult<Vec<Contact>>;
}

/// SQLite-backed contact store.
///
/// Holds only the immutable descriptor; each call opens its own connection.
#[derive(Debug, Clone)]
pub struct SqliteContactStore {
    descriptor: ConnectionDescriptor,
}

impl SqliteContactStore {
    /// Parses `descriptor` and prepares the backing table.
    ///
    /// # Errors
    /// - `Initialization` when the descriptor is missing or malformed.
    /// - `SchemaCreation` when the table cannot be created.
    pub fn open(descriptor: &str) -> StoreResult<Self> {
        Self::with_descriptor(ConnectionDescriptor::parse(descriptor)?)
    }

    /// Builds a store from an already-parsed descriptor and prepares the table.
    pub fn with_descriptor(descriptor: ConnectionDescriptor) -> StoreResult<Self> {
        let store = Self { descriptor };
        store.ensure_table()?;
        Ok(store)
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    fn update_in_scope(&self, contact: &Contact) -> StoreResult<UpdateOutcome> {
        contact.validate()?;
        let conn = self.descriptor.connect()?;
        let changed = conn.execute(
            UPDATE_SQL,
            params![
                contact.first_name.as_str(),
                contact.last_name.as_str(),
                contact.address.as_str(),
                contact.city.as_str(),
                contact.zip,
                contact.state.as_str(),
                contact.phone_number,
                contact.email.as_str(),
                contact.id,
            ],
        )?;
        Ok(UpdateOutcome::from_changed_rows(changed))
    }

    fn delete_in_scope(&self, first_name: &str, last_name: &str) -> StoreResult<DeleteOutcome> {
        let conn = self.descriptor.connect()?;
        let changed = conn.execute(DELETE_BY_NAME_SQL, params![first_name, last_name])?;
        if changed == 0 {
            return Ok(DeleteOutcome::NotFound);
        }
        Ok(DeleteOutcome::Deleted(changed))
    }

    fn list_in_scope(&self) -> StoreResult<Vec<Contact>> {
        let conn = self.descriptor.connect()?;
        let mut stmt = conn.prepare(SELECT_ALL_SQL)?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }
}

impl ContactRepository for SqliteContactStore {
    fn ensure_table(&self) -> StoreResult<TableStatus> {
        let conn = self.descriptor.connect().map_err(|err| match err {
            StoreError::Persistence(inner) => StoreError::SchemaCreation(inner),
            other => other,
        })?;
        ensure_table(&conn)
    }

    fn put_contacts(&self, contacts: &[Contact]) -> BulkInsertReport {
        let started_at = Instant::now();
        info!(
            "event=contacts_put module=repo status=start count={}",
            contacts.len()
        );

        let mut report = BulkInsertReport::default();
        let conn = match self.descriptor.connect() {
            Ok(conn) => conn,
            Err(error) => {
                report.aborted = Some(BulkInsertAbort { at_index: 0, error });
                log_put_finished(&report, started_at);
                return report;
            }
        };
        let mut stmt = match conn.prepare(INSERT_SQL) {
            Ok(stmt) => stmt,
            Err(err) => {
                report.aborted = Some(BulkInsertAbort {
                    at_index: 0,
                    error: err.into(),
                });
                log_put_finished(&report, started_at);
                return report;
            }
        };

        insert_each(&mut report, contacts, |contact| {
            insert_one(&conn, &mut stmt, contact)
        });

        log_put_finished(&report, started_at);
        report
    }

    fn update_contact(&self, contact: &Contact) -> StoreResult<UpdateOutcome> {
        let result = self.update_in_scope(contact);
        match &result {
            Ok(UpdateOutcome::MultipleRows(rows)) => warn!(
                "event=contact_update module=repo status=anomaly contact_id={} \
                 rows_affected={rows}",
                contact.id
            ),
            Ok(outcome) => info!(
                "event=contact_update module=repo status=ok contact_id={} outcome={outcome:?}",
                contact.id
            ),
            Err(err) => error!(
                "event=contact_update module=repo status=error contact_id={} error_code={} \
                 error={err}",
                contact.id,
                err.code()
            ),
        }
        result
    }

    fn delete_contact_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<DeleteOutcome> {
        let result = self.delete_in_scope(first_name, last_name);
        match &result {
            Ok(outcome) => {
                info!("event=contact_delete module=repo status=ok outcome={outcome:?}")
            }
            Err(err) => error!(
                "event=contact_delete module=repo status=error error_code={} error={err}",
                err.code()
            ),
        }
        result
    }

    fn get_contacts(&self) -> StoreResult<Vec<Contact>> {
        let started_at = Instant::now();
        let result = self.list_in_scope();
        match &result {
            Ok(contacts) => info!(
                "event=contacts_list module=repo status=ok count={} duration_ms={}",
                contacts.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=contacts_list module=repo status=error duration_ms={} error_code={} \
                 error={err}",
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }
}

// Stops at the first connection fault; the faulting contact gets no outcome.
fn insert_each<F>(report: &mut BulkInsertReport, contacts: &[Contact], mut insert: F)
where
    F: FnMut(&Contact) -> StoreResult<ContactId>,
{
    for (index, contact) in contacts.iter().enumerate() {
        let status = match insert(contact) {
            Ok(id) => InsertStatus::Inserted { id },
            Err(error) if error.is_connection_fault() => {
                report.aborted = Some(BulkInsertAbort {
                    at_index: index,
                    error,
                });
                return;
            }
            Err(error) => {
                warn!(
                    "event=contact_insert module=repo status=error index={index} error_code={} \
                     error={error}",
                    error.code()
                );
                InsertStatus::Failed(error)
            }
        };
        report.outcomes.push(InsertOutcome {
            index,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            status,
        });
    }
}

fn insert_one(
    conn: &Connection,
    stmt: &mut Statement<'_>,
    contact: &Contact,
) -> StoreResult<ContactId> {
    contact.validate()?;

    let changed = stmt.execute(params![
        contact.first_name.as_str(),
        contact.last_name.as_str(),
        contact.address.as_str(),
        contact.city.as_str(),
        contact.zip,
        contact.state.as_str(),
        contact.phone_number,
        contact.email.as_str(),
    ])?;
    if changed == 0 {
        return Err(StoreError::NotInserted);
    }

    Ok(conn.last_insert_rowid())
}

fn log_put_finished(report: &BulkInsertReport, started_at: Instant) {
    match &report.aborted {
        None => info!(
            "event=contacts_put module=repo status=ok inserted={} failed={} duration_ms={}",
            report.inserted_count(),
            report.failed_count(),
            started_at.elapsed().as_millis()
        ),
        Some(abort) => error!(
            "event=contacts_put module=repo status=error inserted={} failed={} aborted_at={} \
             duration_ms={} error_code={} error={}",
            report.inserted_count(),
            report.failed_count(),
            abort.at_index,
            started_at.elapsed().as_millis(),
            abort.error.code(),
            abort.error
        ),
    }
}

fn parse_contact_row(row: &Row<'_>) -> StoreResult<Contact> {
    let id = read_integer(row, "id", None)?;
    let row_id = Some(id);

    Ok(Contact {
        id,
        first_name: read_text(row, "firstName", row_id)?,
        last_name: read_text(row, "lastName", row_id)?,
        address: read_text(row, "address", row_id)?,
        city: read_text(row, "city", row_id)?,
        state: read_text(row, "state", row_id)?,
        zip: read_integer(row, "zip", row_id)?,
        phone_number: read_integer(row, "phoneNumber", row_id)?,
        email: read_text(row, "email", row_id)?,
    })
}

fn read_integer(
    row: &Row<'_>,
    column: &'static str,
    row_id: Option<ContactId>,
) -> StoreResult<i64> {
    let corrupt = |value: String| StoreError::DataCorruption {
        column,
        row_id,
        value,
    };

    match row.get_ref(column)? {
        ValueRef::Integer(value) => Ok(value),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            text.trim()
                .parse::<i64>()
                .map_err(|_| corrupt(text.into_owned()))
        }
        ValueRef::Null => Err(corrupt("NULL".to_string())),
        ValueRef::Real(value) => Err(corrupt(value.to_string())),
        ValueRef::Blob(bytes) => Err(corrupt(format!("<{} byte blob>", bytes.len()))),
    }
}

// Legacy rows may carry NULL or numbers in text columns; both render as text.
fn read_text(
    row: &Row<'_>,
    column: &'static str,
    row_id: Option<ContactId>,
) -> StoreResult<String> {
    match row.get_ref(column)? {
        ValueRef::Text(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Null => Ok(String::new()),
        ValueRef::Integer(value) => Ok(value.to_string()),
        ValueRef::Real(value) => Ok(value.to_string()),
        ValueRef::Blob(bytes) => Err(StoreError::DataCorruption {
            column,
            row_id,
            value: format!("<{} byte blob>", bytes.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{insert_each, BulkInsertReport, InsertOutcome, InsertStatus, UpdateOutcome};
    use crate::error::StoreError;
    use crate::model::contact::Contact;
    use rusqlite::ffi;

    fn io_failure() -> StoreError {
        StoreError::Persistence(rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_IOERR),
            None,
        ))
    }

    #[test]
    fn changed_rows_map_to_update_outcomes() {
        assert_eq!(UpdateOutcome::from_changed_rows(0), UpdateOutcome::NotFound);
        assert_eq!(UpdateOutcome::from_changed_rows(1), UpdateOutcome::Updated);
        assert_eq!(
            UpdateOutcome::from_changed_rows(3),
            UpdateOutcome::MultipleRows(3)
        );
    }

    #[test]
    fn report_counts_split_inserted_and_failed() {
        let report = BulkInsertReport {
            outcomes: vec![
                InsertOutcome {
                    index: 0,
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    status: InsertStatus::Inserted { id: 4 },
                },
                InsertOutcome {
                    index: 1,
                    first_name: "Alan".to_string(),
                    last_name: "Turing".to_string(),
                    status: InsertStatus::Failed(StoreError::NotInserted),
                },
            ],
            aborted: None,
        };

        assert_eq!(report.inserted_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.inserted_ids(), vec![4]);
        assert!(!report.is_complete());
    }

    #[test]
    fn empty_report_is_complete() {
        assert!(BulkInsertReport::default().is_complete());
    }

    #[test]
    fn connection_fault_mid_batch_stops_remaining_contacts() {
        let contacts: Vec<Contact> = (0..5)
            .map(|n| Contact::new(format!("First{n}"), "Batch"))
            .collect();
        let mut attempted = Vec::new();
        let mut report = BulkInsertReport::default();

        insert_each(&mut report, &contacts, |contact| {
            attempted.push(contact.first_name.clone());
            match attempted.len() {
                2 => Err(StoreError::NotInserted),
                3 => Err(io_failure()),
                n => Ok(n as i64),
            }
        });

        assert_eq!(attempted, vec!["First0", "First1", "First2"]);
        let abort = report.aborted.as_ref().unwrap();
        assert_eq!(abort.at_index, 2);
        assert!(abort.error.is_connection_fault());
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.inserted_ids(), vec![1]);
        assert!(matches!(
            report.outcomes[1].status,
            InsertStatus::Failed(StoreError::NotInserted)
        ));
    }

    #[test]
    fn statement_failures_do_not_stop_the_batch() {
        let contacts: Vec<Contact> = (0..3).map(|n| Contact::new(format!("F{n}"), "L")).collect();
        let mut report = BulkInsertReport::default();

        insert_each(&mut report, &contacts, |contact| {
            if contact.first_name == "F1" {
                Err(StoreError::NotInserted)
            } else {
                Ok(7)
            }
        });

        assert!(report.aborted.is_none());
        assert_eq!(report.inserted_count(), 2);
        assert_eq!(report.failed_count(), 1);
    }
}
