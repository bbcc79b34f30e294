// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ballot Box: at most one accepted vote per voter per election.
//!
//! # Lock order
//! ```text
//! election status (shared)
//! ↓
//! voter state (exclusive, one mutex per wallet address)
//! ↓
//! chain tail (exclusive, one per election)
//! ```
//! Voters on different addresses never contend below the status guard; the
//! chain tail is the single point where their blocks get ordered.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{LedgerError, Result};
use crate::ledger::{Block, ChainEntry, Ledger, VoteRecord};
use crate::lifecycle::LifecycleController;
use crate::types::id::{ElectionId, WalletAddress};
use crate::types::unix_millis;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterState {
    pub wallet_address: WalletAddress,
    pub registered: bool,
    voted_in: BTreeSet<ElectionId>,
}

impl VoterState {
    fn new(wallet_address: WalletAddress) -> Self {
        Self {
            wallet_address,
            registered: true,
            voted_in: BTreeSet::new(),
        }
    }

    pub fn voted(&self, election: ElectionId) -> bool {
        self.voted_in.contains(&election)
    }
}

/// Answer to the idempotent status lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VoterStatus {
    pub registered: bool,
    pub voted: bool,
}

/// A committed vote and the block that carries it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VoteReceipt {
    pub record: VoteRecord,
    pub block: Block,
}

#[derive(Default)]
pub struct BallotBox {
    voters: DashMap<WalletAddress, Arc<Mutex<VoterState>>>,
}

impl BallotBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the voter's state (registered, not voted). Existing state is kept.
    pub fn enroll(&self, address: &WalletAddress) {
        self.voters
            .entry(address.clone())
            .or_insert_with(|| Arc::new(Mutex::new(VoterState::new(address.clone()))));
    }

    pub fn status(&self, address: &WalletAddress, election: ElectionId) -> VoterStatus {
        match self.voter(address) {
            Some(voter) => {
                let state = voter.lock();
                VoterStatus {
                    registered: state.registered,
                    voted: state.voted(election),
                }
            }
            None => VoterStatus::default(),
        }
    }

    fn voter(&self, address: &WalletAddress) -> Option<Arc<Mutex<VoterState>>> {
        // Clone the handle so the map shard is released before locking the voter.
        self.voters.get(address).map(|v| v.value().clone())
    }

    /// Casts a vote.
    ///
    /// Preconditions are checked in this order, each with its own failure:
    /// 1. election exists and lists `candidate` (`UnknownCandidate`)
    /// 2. election is Active (`ElectionNotActive`)
    /// 3. voter is registered (`NotRegistered`); a malformed address can
    ///    never have been registered and fails the same way
    /// 4. voter has not voted in this election (`AlreadyVoted`)
    ///
    /// The ledger append (including `commit`) and the voted flag flip happen
    /// under the voter's lock. If the append fails the flag stays unset.
    pub fn cast_vote<F>(
        &self,
        lifecycle: &LifecycleController,
        ledger: &Ledger,
        election: ElectionId,
        wallet_address: &str,
        candidate: &str,
        commit: F,
    ) -> Result<VoteReceipt>
    where
        F: FnOnce(&ChainEntry) -> Result<()>,
    {
        let unknown = || LedgerError::UnknownCandidate {
            election,
            candidate: candidate.to_string(),
        };

        let entry = lifecycle.get(election).map_err(|_| unknown())?;
        if !entry.definition().has_candidate(candidate) {
            return Err(unknown());
        }

        let status = entry.status_guard();
        if !status.accepts_votes() {
            return Err(LedgerError::ElectionNotActive(election));
        }

        let address = WalletAddress::parse(wallet_address).map_err(|_| LedgerError::NotRegistered)?;
        let voter = self.voter(&address).ok_or(LedgerError::NotRegistered)?;
        let mut state = voter.lock();
        if !state.registered {
            return Err(LedgerError::NotRegistered);
        }
        if state.voted(election) {
            return Err(LedgerError::AlreadyVoted(election));
        }

        let record = VoteRecord {
            election_id: election,
            wallet_address: address,
            candidate_name: candidate.to_string(),
            timestamp: unix_millis(),
        };
        let block = ledger.append(record.clone(), commit)?;
        state.voted_in.insert(election);

        drop(state);
        drop(status);
        Ok(VoteReceipt { record, block })
    }

    /// Marks a vote read back from storage.
    pub fn restore_vote(&self, address: &WalletAddress, election: ElectionId) -> Result<()> {
        let voter = self.voter(address).ok_or(LedgerError::NotRegistered)?;
        let mut state = voter.lock();
        if !state.voted_in.insert(election) {
            return Err(LedgerError::AlreadyVoted(election));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }
}
