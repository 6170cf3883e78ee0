//! SQLite connection bootstrap and table setup.
//!
//! # Responsibility
//! - Parse connection descriptors into openable connection settings.
//! - Create the `AddressBook` table when it is missing.
//!
//! # Invariants
//! - Connections are opened per call and closed on drop.
//! - No schema migration is ever attempted on an existing table.

mod descriptor;
pub mod schema;

pub use descriptor::{ConnectionDescriptor, OpenMode};
pub use schema::{ensure_table, TableStatus, TABLE_NAME};
