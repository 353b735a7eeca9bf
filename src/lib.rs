//! # Litedump
//!
//! Dump/restore connectors for SQLite databases.
//!
//! Two strategies share one contract ([`Connector`]):
//!
//! - **[`SqliteConnector`]**: a logical dumper that reads the catalog and
//!   emits portable SQL text, replayable line by line with a
//!   warning-and-continue policy for recoverable statement failures.
//! - **[`SqliteFileConnector`]**: a physical copier that treats the database
//!   file as an opaque blob.
//!
//! ## Example
//!
//! ```rust,no_run
//! use litedump::{Connector, SqliteConnector};
//!
//! # fn main() -> Result<(), litedump::ConnectorError> {
//! let mut connector = SqliteConnector::new("app.db")?.with_exclude(["audit_log"]);
//!
//! let mut dump = connector.create_dump()?;
//! let report = connector.restore_dump(&mut dump)?;
//! assert!(report.is_clean());
//! # Ok(())
//! # }
//! ```

mod connector;
mod error;
mod report;
mod session;
mod spool;
pub mod sqlite;

pub use connector::{Connector, Dump, DumpFormat};
pub use error::ConnectorError;
pub use report::{RestoreReport, SkippedStatement};
pub use session::Session;
pub use spool::{DEFAULT_SPOOL_THRESHOLD, SpooledBuffer};
pub use sqlite::{SqliteConnector, SqliteFileConnector};
