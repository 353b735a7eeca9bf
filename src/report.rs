//! Per-statement restore outcome, accumulated into a report.
//!
//! A restore is not atomic: recoverable statement failures are skipped and
//! the replay continues. Instead of only logging them, every skipped line is
//! recorded here so callers can inspect what a partial restore left behind.

use serde::Serialize;

/// Outcome of replaying a logical dump.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RestoreReport {
    /// Number of statements executed successfully.
    pub executed: usize,
    /// Statements skipped after a recoverable failure, in replay order.
    pub skipped: Vec<SkippedStatement>,
}

/// A single statement the restore skipped, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedStatement {
    /// 1-based line number within the dump stream.
    pub line: usize,
    /// The statement text as read from the dump.
    pub statement: String,
    /// Database error that caused the skip.
    pub reason: String,
}

impl RestoreReport {
    /// True when every statement executed without being skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub(crate) fn record_executed(&mut self) {
        self.executed += 1;
    }

    pub(crate) fn record_skipped(&mut self, line: usize, statement: &str, reason: &rusqlite::Error) {
        self.skipped.push(SkippedStatement {
            line,
            statement: statement.to_string(),
            reason: reason.to_string(),
        });
    }
}
