//! Reading the event log back for recovery and offline inspection.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::format::{self, EventLogHeader, LoggedEvent};

/// Committed content of an event log file.
#[derive(Debug, Clone)]
pub struct EventLog {
    pub header: EventLogHeader,
    /// Events in commit order.
    pub events: Vec<LoggedEvent>,
    /// Length of the committed prefix.
    pub valid_len: u64,
    /// Bytes of an incomplete final frame, ignored.
    pub torn_bytes: u64,
}

impl EventLog {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Reads and decodes a whole event log.
///
/// # Errors
/// - `InvalidHeader` if the file is not a ledger event log
/// - `Corrupted` if a complete frame does not decode
pub fn read_event_log(path: impl AsRef<Path>) -> Result<EventLog> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;

    let header = EventLogHeader::parse(&bytes)?;
    let scan = format::scan(&bytes)?;

    if scan.torn_bytes > 0 {
        tracing::warn!(
            path = %path.display(),
            offset = scan.valid_len,
            bytes = scan.torn_bytes,
            "Ignoring incomplete event at end of log"
        );
    }

    Ok(EventLog {
        header,
        events: scan.events,
        valid_len: scan.valid_len,
        torn_bytes: scan.torn_bytes,
    })
}
