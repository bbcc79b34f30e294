// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Crash Recovery
//!
//! The event log is the only source of truth. On start-up every committed
//! event is replayed, in order, into an empty ledger.
//!
//! # Invariants
//! - A frame that does not decode -> fail closed
//! - An event the ledger refuses (a block that does not link, a duplicate
//!   registration, a backward status change) -> fail closed
//! - An incomplete final frame is an uncommitted write and is dropped

use std::path::Path;
use std::time::Instant;
use thiserror::Error;

use ballot_kernel::error::LedgerError;
use ballot_kernel::{ElectionLedger, Journal};
use ballot_persistence::{read_event_log, EventLogError};

#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("Event log error: {0}")]
    Log(#[from] EventLogError),

    #[error("Event at offset {offset} rejected during replay: {source}")]
    Replay { offset: u64, source: LedgerError },

    #[error("Replayed ledger failed verification: {0}")]
    Corrupt(LedgerError),

    #[error("Failed to seed default election: {0}")]
    Seed(LedgerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryReport {
    pub events: usize,
    pub elections: usize,
    pub voters: usize,
    pub blocks: u64,
}

/// Replays the log at `path` into `ledger`, which must be empty.
pub fn recover<J: Journal>(ledger: &ElectionLedger<J>, path: &Path) -> Result<RecoveryReport, RecoveryError> {
    let start = Instant::now();
    let log = read_event_log(path)?;

    for logged in &log.events {
        ledger
            .apply_committed(&logged.event)
            .map_err(|source| RecoveryError::Replay {
                offset: logged.offset,
                source,
            })?;
    }
    ledger.ensure_valid().map_err(RecoveryError::Corrupt)?;

    metrics::histogram!("ballot_replay_duration_seconds", start.elapsed().as_secs_f64());

    Ok(RecoveryReport {
        events: log.events.len(),
        elections: ledger.elections().len(),
        voters: ledger.registered_voters(),
        blocks: ledger.total_blocks(),
    })
}
