//! SQLite storage adapter for the `pets` table.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply schema migrations in deterministic order.
//! - Hand out one lazily opened, cached connection per adapter.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No record is read or written before migrations succeed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod helper;
pub mod migrations;
mod open;

pub use helper::PetDbHelper;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Spelling of the in-memory target in configuration files.
pub const IN_MEMORY_TARGET: &str = ":memory:";

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Where the adapter opens its connection.
///
/// Serialized as a plain string: a file path, or `:memory:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

impl DbTarget {
    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

impl From<String> for DbTarget {
    fn from(value: String) -> Self {
        if value.trim() == IN_MEMORY_TARGET {
            Self::Memory
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl From<DbTarget> for String {
    fn from(value: DbTarget) -> Self {
        match value {
            DbTarget::File(path) => path.to_string_lossy().into_owned(),
            DbTarget::Memory => IN_MEMORY_TARGET.to_string(),
        }
    }
}
