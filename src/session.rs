//! Owned SQLite session with ensure-usable semantics.
//!
//! Dump and restore operations take an explicit session rather than reaching
//! for ambient connection state. Before each operation the session is pinged
//! and, if the connection has gone away, reopened from the configured path.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::ConnectorError;

/// A database session bound to an on-disk SQLite file.
pub struct Session {
    path: PathBuf,
    conn: Option<Connection>,
}

impl Session {
    /// Open a session against the database at `path`, connecting eagerly.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        let path = path.as_ref().to_path_buf();
        let conn = Self::connect(&path)?;
        Ok(Self {
            path,
            conn: Some(conn),
        })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(path: &Path) -> Result<Connection, ConnectorError> {
        let conn = Connection::open(path).map_err(|e| ConnectorError::Connection {
            path: path.to_path_buf(),
            source: e,
        })?;

        conn.execute_batch("PRAGMA busy_timeout = 5000;")
            .map_err(|e| ConnectorError::Connection {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(conn)
    }

    fn ping(conn: &Connection) -> bool {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }

    /// Return a usable connection, reconnecting if the current one fails a
    /// ping.
    pub fn ensure_usable(&mut self) -> Result<&Connection, ConnectorError> {
        let alive = self.conn.as_ref().is_some_and(Self::ping);
        if !alive {
            self.conn = Some(Self::connect(&self.path)?);
        }
        Ok(self
            .conn
            .as_ref()
            .expect("BUG: session connection missing after connect"))
    }
}
