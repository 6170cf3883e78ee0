//! Contact domain model.
//!
//! # Responsibility
//! - Define the single address-book record shared by store and callers.
//! - Enforce the persisted column limits before any write reaches SQL.
//!
//! # Invariants
//! - `id` is assigned by the store; callers never choose it on insert.
//! - Text fields are always present. Empty text is a valid value.
//! - `zip` and `phone_number` are non-negative 64-bit integers.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned contact identifier (`AddressBook.id`).
pub type ContactId = i64;

/// Max length for name, city and state columns.
pub const SHORT_TEXT_MAX_CHARS: usize = 50;
/// Max length for address and email columns.
pub const LONG_TEXT_MAX_CHARS: usize = 255;

/// One address-book record.
///
/// Serialized with the persisted column names (`firstName`, `phoneNumber`,
/// ...). `id` defaults to `0` so import files may omit it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Store-assigned identity. Ignored on insert, used as the update key.
    #[serde(default)]
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: i64,
    /// Numeric phone representation; leading zeros are not preserved.
    pub phone_number: i64,
    pub email: String,
}

impl Contact {
    /// Creates an unsaved contact with the given name and empty details.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// Returns `"<first> <last>"` for status rendering.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Validates column limits and numeric ranges.
    ///
    /// # Errors
    /// - `FieldTooLong` when a text field exceeds its column width.
    /// - `NegativeNumber` when `zip` or `phone_number` is below zero.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        let text_fields = [
            ("firstName", self.first_name.as_str(), SHORT_TEXT_MAX_CHARS),
            ("lastName", self.last_name.as_str(), SHORT_TEXT_MAX_CHARS),
            ("address", self.address.as_str(), LONG_TEXT_MAX_CHARS),
            ("city", self.city.as_str(), SHORT_TEXT_MAX_CHARS),
            ("state", self.state.as_str(), SHORT_TEXT_MAX_CHARS),
            ("email", self.email.as_str(), LONG_TEXT_MAX_CHARS),
        ];
        for (field, value, max_chars) in text_fields {
            let actual_chars = value.chars().count();
            if actual_chars > max_chars {
                return Err(ContactValidationError::FieldTooLong {
                    field,
                    max_chars,
                    actual_chars,
                });
            }
        }

        for (field, value) in [("zip", self.zip), ("phoneNumber", self.phone_number)] {
            if value < 0 {
                return Err(ContactValidationError::NegativeNumber { field, value });
            }
        }

        Ok(())
    }
}

/// A contact that cannot be persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    NegativeNumber {
        field: &'static str,
        value: i64,
    },
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "field `{field}` is {actual_chars} characters long; limit is {max_chars}"
            ),
            Self::NegativeNumber { field, value } => {
                write!(f, "field `{field}` must not be negative, got {value}")
            }
        }
    }
}

impl Error for ContactValidationError {}
