//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the address-book data access contract.
//! - Keep SQL statements and row coercion out of callers.
//!
//! # Invariants
//! - Repository writes enforce `Contact::validate()` before persistence.
//! - "Not found" is reported as an outcome, distinct from driver errors.

pub mod contact_repo;
