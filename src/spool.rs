//! Spooled dump buffer: memory-backed until a size threshold, then spilled
//! to an unnamed temporary file.
//!
//! Dump streams are usually small enough to hold in memory. Past the
//! threshold the accumulated bytes move to a [`tempfile::tempfile`], which
//! the OS reclaims when the handle drops, so large databases never pin their
//! whole dump in RAM.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// Size at which a dump spills from memory to temporary storage (10 MiB).
pub const DEFAULT_SPOOL_THRESHOLD: u64 = 10 * 1024 * 1024;

enum Backing {
    Memory(Cursor<Vec<u8>>),
    File(File),
}

/// Growable byte buffer that transparently spills to a temp file.
pub struct SpooledBuffer {
    backing: Backing,
    threshold: u64,
    len: u64,
}

impl SpooledBuffer {
    /// Create a buffer with the default 10 MiB spill threshold.
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_SPOOL_THRESHOLD)
    }

    /// Create a buffer that spills once more than `threshold` bytes are
    /// written.
    pub fn with_threshold(threshold: u64) -> Self {
        Self {
            backing: Backing::Memory(Cursor::new(Vec::new())),
            threshold,
            len: 0,
        }
    }

    /// Total number of bytes written so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the contents have spilled to a temp file.
    pub fn is_spilled(&self) -> bool {
        matches!(self.backing, Backing::File(_))
    }

    /// Reposition the buffer at its start.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    fn spill(&mut self) -> io::Result<()> {
        if let Backing::Memory(cursor) = &mut self.backing {
            let pos = cursor.position();
            let mut file = tempfile::tempfile()?;
            file.write_all(cursor.get_ref())?;
            file.seek(SeekFrom::Start(pos))?;
            self.backing = Backing::File(file);
        }
        Ok(())
    }
}

impl Default for SpooledBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for SpooledBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.is_spilled() && self.len + buf.len() as u64 > self.threshold {
            self.spill()?;
        }
        let written = match &mut self.backing {
            Backing::Memory(cursor) => cursor.write(buf)?,
            Backing::File(file) => file.write(buf)?,
        };
        self.len = self.len.max(self.stream_position()?);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.backing {
            Backing::Memory(_) => Ok(()),
            Backing::File(file) => file.flush(),
        }
    }
}

impl Read for SpooledBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.backing {
            Backing::Memory(cursor) => cursor.read(buf),
            Backing::File(file) => file.read(buf),
        }
    }
}

impl Seek for SpooledBuffer {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.backing {
            Backing::Memory(cursor) => cursor.seek(pos),
            Backing::File(file) => file.seek(pos),
        }
    }
}
