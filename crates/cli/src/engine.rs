use anyhow::{Context, Result};
use std::path::Path;

use ballot_kernel::{ElectionLedger, MemoryJournal};
use ballot_persistence::{read_event_log, EventLog};

/// Offline replica of a ledger, rebuilt from its event log.
pub struct ForensicEngine {
    pub log: EventLog,
    pub ledger: ElectionLedger<MemoryJournal>,
    /// Events applied so far, in log order.
    pub applied: usize,
}

impl ForensicEngine {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let log = read_event_log(path)
            .with_context(|| format!("Failed to read event log {}", path.display()))?;

        Ok(Self {
            log,
            ledger: ElectionLedger::new(MemoryJournal::new()),
            applied: 0,
        })
    }

    /// Applies the remaining events. Stops at the first one the ledger refuses.
    pub fn replay_all(&mut self) -> Result<usize> {
        let start = self.applied;
        for logged in &self.log.events[start..] {
            self.ledger
                .apply_committed(&logged.event)
                .with_context(|| {
                    format!(
                        "{} at offset {} rejected",
                        logged.event.event_type(),
                        logged.offset
                    )
                })?;
            self.applied += 1;
        }
        Ok(self.applied - start)
    }

    /// Replays the whole log into a fresh ledger.
    pub fn replayed(path: impl AsRef<Path>) -> Result<Self> {
        let mut engine = Self::open(path)?;
        engine.replay_all()?;
        Ok(engine)
    }
}
