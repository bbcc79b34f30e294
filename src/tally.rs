// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Tally Engine. Results are always recomputed from the chain.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{LedgerError, Result};
use crate::ledger::{ChainEntry, Ledger};
use crate::lifecycle::{Election, LifecycleController};
use crate::types::enums::ElectionStatus;
use crate::types::id::{BlockNumber, ElectionId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub election_id: ElectionId,
    pub status: ElectionStatus,
    /// Candidate -> votes, in ballot order. Zero-vote candidates included.
    pub results: IndexMap<String, u64>,
    pub total_votes: u64,
    /// Chain height the tally was computed at.
    pub height: BlockNumber,
}

/// Counts `entries` for `election`.
///
/// A vote for a name that is not on the ballot can only come from a damaged
/// chain and is reported as `LedgerCorrupt`.
pub fn count_votes<'a, I>(election: &Election, entries: I) -> Result<(IndexMap<String, u64>, BlockNumber)>
where
    I: IntoIterator<Item = &'a ChainEntry>,
{
    let mut results: IndexMap<String, u64> =
        election.candidates.iter().map(|c| (c.clone(), 0)).collect();
    let mut height = BlockNumber::GENESIS;

    for entry in entries {
        let corrupt = || LedgerError::LedgerCorrupt {
            election: election.id,
            block: entry.block.block_number,
        };
        if entry.record.election_id != election.id {
            return Err(corrupt());
        }
        let count = results
            .get_mut(entry.record.candidate_name.as_str())
            .ok_or_else(corrupt)?;
        *count += 1;
        height = entry.block.block_number;
    }

    Ok((results, height))
}

pub fn tally(lifecycle: &LifecycleController, ledger: &Ledger, election: ElectionId) -> Result<Tally> {
    let entry = lifecycle.get(election)?;
    let snapshot = ledger.entries(election)?;

    let (results, height) = count_votes(entry.definition(), snapshot.iter().map(|e| e.as_ref()))?;
    let total_votes: u64 = results.values().sum();

    Ok(Tally {
        election_id: election,
        status: entry.status(),
        results,
        total_votes,
        height,
    })
}
