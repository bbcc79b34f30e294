// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! ballot-kernel: voter eligibility, exactly-once vote casting, hash-chained
//! vote ledger and deterministic tallies. No I/O; durability is injected
//! through [`service::Journal`].

pub mod error;
pub mod types;
pub mod identity;
pub mod lifecycle;
pub mod ledger;
pub mod ballot_box;
pub mod tally;
pub mod event;
pub mod service;

pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use service::{ElectionLedger, Journal, MemoryJournal};

#[cfg(test)]
pub mod tests;
