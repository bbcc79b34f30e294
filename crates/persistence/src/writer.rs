//! Append-only event log writer.
//!
//! An event is durable once `append` returns: the frame is written with a
//! single `write_all` and the file is `sync_all`'d. A failed append truncates
//! the file back to its previous length so a later append never lands behind
//! half a frame.

use ballot_kernel::event::LedgerEvent;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::format::{self, EventLogHeader, HEADER_LEN};

pub struct EventLogWriter {
    path: PathBuf,
    file: File,
    event_count: u64,
    len: u64,
}

impl EventLogWriter {
    /// Opens or creates an event log.
    ///
    /// A new file gets a header (fsync'd). An existing file is validated and
    /// scanned; an incomplete final frame is cut off before any append.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        if file.metadata()?.len() == 0 {
            file.write_all(&EventLogHeader::new().to_bytes())?;
            file.sync_all()?;
            return Ok(Self {
                path,
                file,
                event_count: 0,
                len: HEADER_LEN as u64,
            });
        }

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let scan = format::scan(&bytes)?;

        if scan.torn_bytes > 0 {
            tracing::warn!(
                path = %path.display(),
                offset = scan.valid_len,
                bytes = scan.torn_bytes,
                "Truncating incomplete event at end of log"
            );
            file.set_len(scan.valid_len)?;
            file.sync_all()?;
        }

        Ok(Self {
            path,
            file,
            event_count: scan.events.len() as u64,
            len: scan.valid_len,
        })
    }

    /// Appends `event` and returns the offset of its frame.
    ///
    /// Only returns `Ok` after the write is durable.
    pub fn append(&mut self, event: &LedgerEvent) -> Result<u64> {
        let frame = format::encode_entry(event)?;
        let offset = self.len;

        if let Err(e) = self.write_frame(&frame) {
            self.rollback(offset);
            return Err(e);
        }

        self.len += frame.len() as u64;
        self.event_count += 1;
        Ok(offset)
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.file.write_all(frame)?;
        self.file.sync_all()?;
        Ok(())
    }

    fn rollback(&mut self, len: u64) {
        if let Err(e) = self.file.set_len(len).and_then(|_| self.file.sync_all()) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to roll back partial append");
        }
    }

    /// Number of events in the log.
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Committed length of the file in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
