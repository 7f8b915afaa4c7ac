//! Lazily opened connection shared by every provider call.

use super::open::open_target;
use super::{DbResult, DbTarget};
use log::debug;
use once_cell::unsync::OnceCell;
use rusqlite::Connection;

/// Owns the single connection behind a provider.
///
/// The connection is opened on the first `readable()`/`writable()` call and
/// cached until the helper is dropped. A failed open leaves the cell empty so
/// the next call tries again.
pub struct PetDbHelper {
    target: DbTarget,
    conn: OnceCell<Connection>,
}

impl PetDbHelper {
    pub fn new(target: DbTarget) -> Self {
        Self {
            target,
            conn: OnceCell::new(),
        }
    }

    /// Wraps an already opened and migrated connection.
    pub fn from_connection(target: DbTarget, conn: Connection) -> Self {
        Self {
            target,
            conn: OnceCell::from(conn),
        }
    }

    pub fn target(&self) -> &DbTarget {
        &self.target
    }

    /// Returns whether the connection has been opened yet.
    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Handle for read paths.
    pub fn readable(&self) -> DbResult<&Connection> {
        self.connection("read")
    }

    /// Handle for write paths. Same connection as `readable()`.
    pub fn writable(&self) -> DbResult<&Connection> {
        self.connection("write")
    }

    fn connection(&self, access: &str) -> DbResult<&Connection> {
        self.conn.get_or_try_init(|| {
            debug!(
                "event=db_lazy_open module=db access={} mode={}",
                access,
                self.target.mode()
            );
            open_target(&self.target)
        })
    }
}
