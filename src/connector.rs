//! Connector contract shared by the logical and physical strategies.

use std::io::{self, Read, Seek, SeekFrom};
use std::time::SystemTime;

use crate::error::ConnectorError;
use crate::report::RestoreReport;
use crate::spool::SpooledBuffer;

/// A dump/restore strategy for one database.
///
/// Both strategies expose the same two operations: `create_dump` produces a
/// readable, seekable byte stream positioned at its start, and
/// `restore_dump` consumes such a stream to put the data back.
pub trait Connector {
    /// Produce a dump of the database as a byte stream.
    fn create_dump(&mut self) -> Result<Dump, ConnectorError>;

    /// Restore the database from a previously created dump stream.
    fn restore_dump(&mut self, dump: &mut dyn Read) -> Result<RestoreReport, ConnectorError>;
}

/// Dump content format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// Textual SQL statements, replayable line by line.
    Sql,
    /// Raw bytes of the database file.
    Raw,
}

/// Handle for a completed dump: metadata plus the byte stream itself.
pub struct Dump {
    id: String,
    format: DumpFormat,
    created_at: SystemTime,
    size_bytes: u64,
    data: SpooledBuffer,
}

impl Dump {
    pub(crate) fn new(format: DumpFormat, mut data: SpooledBuffer) -> io::Result<Self> {
        data.rewind()?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            format,
            created_at: SystemTime::now(),
            size_bytes: data.len(),
            data,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn format(&self) -> DumpFormat {
        self.format
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

impl Read for Dump {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl Seek for Dump {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.data.seek(pos)
    }
}
