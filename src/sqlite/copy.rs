//! Physical file-copy connector.
//!
//! Treats the database file as an opaque blob: dump streams its bytes out,
//! restore truncates the file and streams them back. No schema awareness;
//! the engine must be offline or quiesced for the copy to be consistent,
//! which is the caller's responsibility.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::connector::{Connector, Dump, DumpFormat};
use crate::error::ConnectorError;
use crate::report::RestoreReport;
use crate::spool::SpooledBuffer;

/// Byte-level dump/restore of a SQLite database file.
pub struct SqliteFileConnector {
    path: PathBuf,
}

impl SqliteFileConnector {
    /// Create a connector for the database file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the database file being copied.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for SqliteFileConnector {
    fn create_dump(&mut self) -> Result<Dump, ConnectorError> {
        let mut db_file = File::open(&self.path)?;
        let mut spool = SpooledBuffer::new();
        io::copy(&mut db_file, &mut spool)?;
        Ok(Dump::new(DumpFormat::Raw, spool)?)
    }

    fn restore_dump(&mut self, dump: &mut dyn Read) -> Result<RestoreReport, ConnectorError> {
        let mut db_file = File::create(&self.path)?;
        io::copy(dump, &mut db_file)?;
        // A raw copy replays no statements.
        Ok(RestoreReport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};
    use tempfile::tempdir;

    #[test]
    fn create_dump_reads_file_bytes() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("raw.db");
        std::fs::write(&db_path, b"foo").unwrap();

        let mut connector = SqliteFileConnector::new(&db_path);
        let mut dump = connector.create_dump().unwrap();

        assert_eq!(dump.format(), DumpFormat::Raw);
        assert_eq!(dump.size_bytes(), 3);

        let mut content = Vec::new();
        dump.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"foo");
    }

    #[test]
    fn restore_dump_writes_bytes_back() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("raw.db");
        std::fs::write(&db_path, b"foo").unwrap();

        let mut connector = SqliteFileConnector::new(&db_path);
        let mut dump = connector.create_dump().unwrap();

        // Clobber the file, then restore from the dump.
        std::fs::write(&db_path, b"scrambled").unwrap();
        connector.restore_dump(&mut dump).unwrap();

        assert_eq!(std::fs::read(&db_path).unwrap(), b"foo");
    }

    #[test]
    fn restore_truncates_longer_existing_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("raw.db");
        std::fs::write(&db_path, b"much longer original content").unwrap();

        let mut connector = SqliteFileConnector::new(&db_path);
        let mut replacement = SpooledBuffer::new();
        replacement.write_all(b"foo").unwrap();
        replacement.seek(SeekFrom::Start(0)).unwrap();

        connector.restore_dump(&mut replacement).unwrap();
        assert_eq!(std::fs::read(&db_path).unwrap(), b"foo");
    }
}
