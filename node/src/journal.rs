// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Node-side journal: the durable event log plus commit metrics.

use std::path::Path;
use std::time::Instant;

use ballot_kernel::error::LedgerResult;
use ballot_kernel::event::LedgerEvent;
use ballot_kernel::Journal;
use ballot_persistence::{EventLogError, FileJournal};

pub struct NodeJournal {
    file: Option<FileJournal>,
}

impl NodeJournal {
    /// Events are kept nowhere; state lives and dies with the process.
    pub fn in_memory() -> Self {
        Self { file: None }
    }

    pub fn open(path: &Path) -> Result<Self, EventLogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: Some(FileJournal::open(path)?),
        })
    }

    pub fn is_persistent(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path())
    }
}

impl Journal for NodeJournal {
    fn record(&self, event: &LedgerEvent) -> LedgerResult<()> {
        let Some(file) = &self.file else {
            metrics::counter!("ballot_events_committed_total", 1);
            return Ok(());
        };

        let start = Instant::now();
        match file.record(event) {
            Ok(()) => {
                metrics::counter!("ballot_events_committed_total", 1);
                metrics::histogram!("ballot_event_commit_duration_seconds", start.elapsed().as_secs_f64());
                Ok(())
            }
            Err(e) => {
                tracing::error!(event = event.event_type(), error = %e, "Event commit failed");
                Err(e)
            }
        }
    }
}
