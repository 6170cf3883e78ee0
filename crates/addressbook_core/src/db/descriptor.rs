//! Connection descriptor parsing and per-call connection opening.
//!
//! # Responsibility
//! - Turn a configuration string into a validated `ConnectionDescriptor`.
//! - Open one configured SQLite connection per store operation.
//!
//! # Invariants
//! - A descriptor always names an on-disk database.
//! - Opened connections carry the descriptor's busy timeout.

use crate::error::{StoreError, StoreResult};
use log::{debug, error};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// How the database file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Read/write, creating the file when missing.
    #[default]
    ReadWriteCreate,
    /// Read/write on an existing file.
    ReadWrite,
    /// Read only on an existing file.
    ReadOnly,
}

impl OpenMode {
    fn flags(self) -> OpenFlags {
        let common = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        match self {
            Self::ReadWriteCreate => {
                common | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
            Self::ReadWrite => common | OpenFlags::SQLITE_OPEN_READ_WRITE,
            Self::ReadOnly => common | OpenFlags::SQLITE_OPEN_READ_ONLY,
        }
    }
}

impl FromStr for OpenMode {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_key(value).as_str() {
            "readwritecreate" => Ok(Self::ReadWriteCreate),
            "readwrite" => Ok(Self::ReadWrite),
            "readonly" => Ok(Self::ReadOnly),
            _ => Err(StoreError::Initialization(format!(
                "unsupported mode `{}`; expected ReadWriteCreate|ReadWrite|ReadOnly",
                value.trim()
            ))),
        }
    }
}

/// Validated description of how to reach the contact database.
///
/// Accepts a bare path (`contacts.db`, `file:contacts.db?cache=private`) or
/// a `key=value;` list:
///
/// ```text
/// Data Source=/var/lib/addressbook/contacts.db; Mode=ReadWrite; Busy Timeout=2000
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    data_source: PathBuf,
    mode: OpenMode,
    busy_timeout: Duration,
}

impl ConnectionDescriptor {
    /// Builds a read/write-create descriptor for a database file.
    pub fn for_path(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_source = path.into();
        ensure_persistent(&data_source.to_string_lossy())?;
        Ok(Self {
            data_source,
            mode: OpenMode::default(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        })
    }

    /// Parses a connection string.
    ///
    /// # Errors
    /// Returns `StoreError::Initialization` for empty input, missing data
    /// source, unknown keys, malformed pairs, bad values, or in-memory
    /// databases.
    pub fn parse(raw: &str) -> StoreResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StoreError::Initialization(
                "connection descriptor is empty".to_string(),
            ));
        }

        if !trimmed.contains('=') || trimmed.starts_with("file:") {
            return Self::for_path(trimmed);
        }

        let mut data_source = None;
        let mut mode = OpenMode::default();
        let mut busy_timeout = Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS);

        for pair in trimmed.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                StoreError::Initialization(format!("malformed descriptor entry `{pair}`"))
            })?;
            let value = value.trim();
            match normalize_key(key).as_str() {
                "datasource" | "filename" => data_source = Some(value.to_string()),
                "mode" => mode = value.parse()?,
                "busytimeout" => {
                    let millis = value.parse::<u64>().map_err(|_| {
                        StoreError::Initialization(format!(
                            "busy timeout must be milliseconds, got `{value}`"
                        ))
                    })?;
                    busy_timeout = Duration::from_millis(millis);
                }
                _ => {
                    return Err(StoreError::Initialization(format!(
                        "unknown descriptor key `{}`",
                        key.trim()
                    )))
                }
            }
        }

        let data_source = data_source.ok_or_else(|| {
            StoreError::Initialization("descriptor has no `Data Source`".to_string())
        })?;
        ensure_persistent(&data_source)?;

        Ok(Self {
            data_source: PathBuf::from(data_source),
            mode,
            busy_timeout,
        })
    }

    pub fn data_source(&self) -> &Path {
        &self.data_source
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }

    /// Opens a fresh connection owned by the caller.
    ///
    /// Dropping the returned connection closes it.
    pub(crate) fn connect(&self) -> StoreResult<Connection> {
        let started_at = Instant::now();

        let conn = Connection::open_with_flags(&self.data_source, self.mode.flags())
            .and_then(|conn| {
                conn.busy_timeout(self.busy_timeout)?;
                Ok(conn)
            })
            .map_err(|err| {
                error!(
                    "event=db_connect module=db status=error duration_ms={} \
                     error_code=db_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                StoreError::Persistence(err)
            })?;

        debug!(
            "event=db_connect module=db status=ok mode={:?} duration_ms={}",
            self.mode,
            started_at.elapsed().as_millis()
        );
        Ok(conn)
    }
}

impl FromStr for ConnectionDescriptor {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

// Each store call opens its own connection, so an in-memory database would be
// empty on every call.
fn ensure_persistent(data_source: &str) -> StoreResult<()> {
    let trimmed = data_source.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Initialization(
            "data source cannot be empty".to_string(),
        ));
    }
    let lowered = trimmed.to_ascii_lowercase();
    if lowered == ":memory:"
        || lowered.starts_with("file::memory:")
        || lowered.contains("mode=memory")
    {
        return Err(StoreError::Initialization(format!(
            "in-memory data source `{trimmed}` cannot back a per-call connection store"
        )));
    }
    Ok(())
}
