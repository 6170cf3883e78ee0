//! Address-book domain model.
//!
//! # Responsibility
//! - Define the contact record exchanged between store and callers.
//!
//! # Invariants
//! - A contact is identified by its store-assigned `ContactId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod contact;
