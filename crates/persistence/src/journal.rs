//! File-backed `Journal` for the election ledger.

use ballot_kernel::error::{LedgerError, Result as LedgerResult};
use ballot_kernel::event::LedgerEvent;
use ballot_kernel::Journal;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::writer::EventLogWriter;

/// Serializes appends from every request onto one `EventLogWriter`.
pub struct FileJournal {
    path: PathBuf,
    writer: Mutex<EventLogWriter>,
}

impl FileJournal {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let writer = EventLogWriter::open(path)?;
        Ok(Self {
            path: writer.path().to_path_buf(),
            writer: Mutex::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn event_count(&self) -> u64 {
        self.writer.lock().event_count()
    }
}

impl Journal for FileJournal {
    fn record(&self, event: &LedgerEvent) -> LedgerResult<()> {
        self.writer
            .lock()
            .append(event)
            .map(|_| ())
            .map_err(|e| LedgerError::StorageUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_event_log;
    use ballot_kernel::error::ErrorKind;
    use ballot_kernel::lifecycle::NewElection;
    use ballot_kernel::ElectionLedger;
    use tempfile::tempdir;

    #[test]
    fn test_ledger_events_reach_disk_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.log");

        let service = ElectionLedger::new(FileJournal::open(&path).unwrap());
        let id = service
            .create_election(NewElection {
                name: "Union Parishad".into(),
                candidates: vec!["Boat".into(), "Sheaf of Paddy".into()],
                ..Default::default()
            })
            .unwrap()
            .id;
        service.advance(id).unwrap();
        service.register_voter("0xA1", "1234567890").unwrap();
        service.cast_vote(id, "0xA1", "Boat").unwrap();

        let types: Vec<&str> = read_event_log(&path)
            .unwrap()
            .events
            .iter()
            .map(|e| e.event.event_type())
            .collect();
        assert_eq!(types, ["ElectionCreated", "StatusChanged", "VoterRegistered", "VoteCommitted"]);
        assert_eq!(service.journal().event_count(), 4);
    }

    #[test]
    fn test_rejected_request_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.log");

        let service = ElectionLedger::new(FileJournal::open(&path).unwrap());
        service.register_voter("0xA1", "1234567890").unwrap();
        let err = service.register_voter("0xA1", "1234567890").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);

        assert_eq!(read_event_log(&path).unwrap().len(), 1);
    }
}
