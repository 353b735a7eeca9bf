//! Error taxonomy for dump and restore operations.
//!
//! Three failure classes exist, matching the connector contract:
//! connection problems are resolved internally by reconnecting and only
//! surface when the reconnect itself fails; catalog and query errors during
//! dump creation are fatal and propagate; per-statement failures during a
//! restore are split into recoverable kinds (recorded and skipped) and
//! everything else (aborts the restore).

use std::path::PathBuf;

use rusqlite::ffi::ErrorCode;
use thiserror::Error;

/// Errors surfaced by the dump/restore connectors.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Opening or re-opening the database failed.
    #[error("failed to open database at '{}': {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Querying the `sqlite_master` catalog failed.
    #[error("catalog query failed: {source}")]
    Catalog {
        #[source]
        source: rusqlite::Error,
    },

    /// Reading rows or schema for a table during dump creation failed.
    #[error("dump of table '{table}' failed: {source}")]
    Dump {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A restore hit a non-recoverable statement failure and aborted.
    #[error("restore aborted at line {line}: {source}")]
    Restore {
        line: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// Reading from or writing to a dump stream failed.
    #[error("dump I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether a statement failure is tolerated during restore.
///
/// Two kinds are recoverable, mirroring the replay policy: integrity
/// failures (constraint violations from re-inserting existing rows) and
/// operational failures (object already exists, malformed statement, busy
/// database). Anything else aborts the restore.
pub(crate) fn is_recoverable(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.code,
            ErrorCode::ConstraintViolation
                | ErrorCode::Unknown
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
        ),
        // Prepare-time syntax errors, e.g. a multi-line CREATE statement
        // split by the line-oriented replay.
        rusqlite::Error::SqlInputError { .. } => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_are_recoverable() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: ErrorCode::ConstraintViolation,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            Some("UNIQUE constraint failed".into()),
        );
        assert!(is_recoverable(&err));
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = rusqlite::Error::InvalidColumnIndex(3);
        assert!(!is_recoverable(&err));
    }
}
