//! Address-book contact store.
//! This crate owns the `AddressBook` table and every rule about contacts.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppSettings, ConfigError, DEFAULT_CONNECTION_NAME};
pub use db::{ConnectionDescriptor, OpenMode, TableStatus};
pub use error::{StoreError, StoreResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::contact::{Contact, ContactId, ContactValidationError};
pub use repo::contact_repo::{
    BulkInsertAbort, BulkInsertReport, ContactRepository, DeleteOutcome, InsertOutcome,
    InsertStatus, SqliteContactStore, UpdateOutcome,
};
pub use service::contact_service::ContactService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
