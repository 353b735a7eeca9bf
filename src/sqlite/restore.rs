//! Line-by-line replay of a logical dump.
//!
//! Each non-empty line is executed as one statement. Recoverable failures
//! (constraint violations, operational errors such as an object that already
//! exists) are logged and recorded in the report, and the replay continues;
//! anything else aborts. There is no transaction around the replay, so a
//! restore with bad statements completes with partial data rather than
//! rolling back.

use std::io::{BufRead, BufReader, Read};

use rusqlite::Connection;
use tracing::warn;

use crate::error::{self, ConnectorError};
use crate::report::RestoreReport;

pub(crate) fn replay(
    conn: &Connection,
    dump: &mut dyn Read,
) -> Result<RestoreReport, ConnectorError> {
    let reader = BufReader::new(dump);
    let mut report = RestoreReport::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let statement = line.trim();
        if statement.is_empty() {
            continue;
        }

        match conn.execute_batch(statement) {
            Ok(()) => report.record_executed(),
            Err(err) if error::is_recoverable(&err) => {
                warn!(line = idx + 1, error = %err, "error in db restore, statement skipped");
                report.record_skipped(idx + 1, statement, &err);
            }
            Err(err) => {
                return Err(ConnectorError::Restore {
                    line: idx + 1,
                    source: err,
                });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn test_conn() -> (tempfile::TempDir, Connection) {
        let dir = tempdir().unwrap();
        let conn = Connection::open(dir.path().join("restore.db")).unwrap();
        (dir, conn)
    }

    #[test]
    fn replay_executes_each_line() {
        let (_dir, conn) = test_conn();
        let mut dump = Cursor::new(
            "CREATE TABLE IF NOT EXISTS t (a INTEGER);\nINSERT INTO \"t\" VALUES(1);\n",
        );

        let report = replay(&conn, &mut dump).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.executed, 2);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn constraint_violation_is_skipped_not_fatal() {
        let (_dir, conn) = test_conn();
        conn.execute_batch("CREATE TABLE t (a INTEGER PRIMARY KEY); INSERT INTO t VALUES(1);")
            .unwrap();

        let mut dump = Cursor::new("INSERT INTO \"t\" VALUES(1);\nINSERT INTO \"t\" VALUES(2);\n");
        let report = replay(&conn, &mut dump).unwrap();

        assert_eq!(report.executed, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 1);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn malformed_statement_is_skipped() {
        let (_dir, conn) = test_conn();
        let mut dump = Cursor::new("NOT REALLY SQL;\nCREATE TABLE t (a INTEGER);\n");

        let report = replay(&conn, &mut dump).unwrap();
        assert_eq!(report.executed, 1);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let (_dir, conn) = test_conn();
        let mut dump = Cursor::new("\n\nCREATE TABLE t (a INTEGER);\n\n");

        let report = replay(&conn, &mut dump).unwrap();
        assert_eq!(report.executed, 1);
        assert!(report.is_clean());
    }
}
