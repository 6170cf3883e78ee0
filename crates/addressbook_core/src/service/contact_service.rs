//! Contact use-case service.
//!
//! # Responsibility
//! - Provide stable address-book entry points for front ends.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::db::TableStatus;
use crate::error::{StoreError, StoreResult};
use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{
    BulkInsertReport, ContactRepository, DeleteOutcome, InsertStatus, UpdateOutcome,
};

/// Use-case service wrapper for address-book operations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn ensure_table(&self) -> StoreResult<TableStatus> {
        self.repo.ensure_table()
    }

    /// Inserts one contact and returns its store-assigned id.
    ///
    /// # Contract
    /// - Any `contact.id` value is ignored.
    /// - The single per-item failure (or connection abort) becomes `Err`.
    pub fn add_contact(&self, contact: &Contact) -> StoreResult<ContactId> {
        let report = self.repo.put_contacts(std::slice::from_ref(contact));
        if let Some(abort) = report.aborted {
            return Err(abort.error);
        }

        match report.outcomes.into_iter().next().map(|outcome| outcome.status) {
            Some(InsertStatus::Inserted { id }) => Ok(id),
            Some(InsertStatus::Failed(err)) => Err(err),
            None => Err(StoreError::NotInserted),
        }
    }

    /// Inserts contacts with per-contact outcomes.
    pub fn add_contacts(&self, contacts: &[Contact]) -> BulkInsertReport {
        self.repo.put_contacts(contacts)
    }

    /// Replaces all non-id fields of an existing contact.
    pub fn update_contact(&self, contact: &Contact) -> StoreResult<UpdateOutcome> {
        self.repo.update_contact(contact)
    }

    /// Deletes every contact with the given name pair.
    pub fn delete_contact(&self, first_name: &str, last_name: &str) -> StoreResult<DeleteOutcome> {
        self.repo.delete_contact_by_name(first_name, last_name)
    }

    /// Lists all contacts ordered by id.
    pub fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        self.repo.get_contacts()
    }
}
