//! SQLite connectors: logical SQL dump and physical file copy.
//!
//! Two independent strategies behind the same [`Connector`] contract:
//!
//! - [`SqliteConnector`] introspects the catalog and emits replayable SQL
//!   text with `IF NOT EXISTS` guards, buffered through a spool that spills
//!   to temp storage for large databases.
//! - [`SqliteFileConnector`] copies the database file's raw bytes, bypassing
//!   the SQL layer entirely.

use std::io::Read;
use std::path::Path;

use crate::connector::{Connector, Dump, DumpFormat};
use crate::error::ConnectorError;
use crate::report::RestoreReport;
use crate::session::Session;
use crate::spool::{DEFAULT_SPOOL_THRESHOLD, SpooledBuffer};

mod copy;
mod dump;
mod restore;
pub mod schema;

pub use copy::SqliteFileConnector;
pub use schema::{ObjectKind, SchemaObject};

/// Logical dump/restore connector for a SQLite database.
pub struct SqliteConnector {
    session: Session,
    exclude: Vec<String>,
    spool_threshold: u64,
}

impl SqliteConnector {
    /// Open a connector for the database at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        Ok(Self {
            session: Session::open(path)?,
            exclude: Vec::new(),
            spool_threshold: DEFAULT_SPOOL_THRESHOLD,
        })
    }

    /// Exclude tables from the dump: their CREATE and INSERT statements, and
    /// any indexes or triggers they own, are omitted.
    pub fn with_exclude<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Override the size at which dump output spills from memory to a temp
    /// file.
    pub fn with_spool_threshold(mut self, bytes: u64) -> Self {
        self.spool_threshold = bytes;
        self
    }

    /// The session backing this connector.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn write_dump(&mut self, out: &mut SpooledBuffer) -> Result<(), ConnectorError> {
        let conn = self.session.ensure_usable()?;
        dump::write_dump(conn, &self.exclude, out)
    }
}

impl Connector for SqliteConnector {
    fn create_dump(&mut self) -> Result<Dump, ConnectorError> {
        let mut spool = SpooledBuffer::with_threshold(self.spool_threshold);
        self.write_dump(&mut spool)?;
        Ok(Dump::new(DumpFormat::Sql, spool)?)
    }

    fn restore_dump(&mut self, dump: &mut dyn Read) -> Result<RestoreReport, ConnectorError> {
        let conn = self.session.ensure_usable()?;
        restore::replay(conn, dump)
    }
}
