// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Election Ledger Service: the composition root of the kernel.
//!
//! # Commit protocol
//! ```text
//! request
//! ↓
//! 1. validate + reserve (registry keys / status guard / voter lock / chain tail)
//! ↓
//! 2. Journal::record(event)   <- durability point
//! ↓
//! 3. publish in memory
//! ```
//! A journal failure at step 2 surfaces as `StorageUnavailable` and nothing
//! from step 3 happens. Because the journal runs while the reservations are
//! held, the journal order per chain equals block order, and a registration
//! is always journaled before any vote of the same address.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::ballot_box::{BallotBox, VoteReceipt, VoterStatus};
use crate::error::{LedgerError, Result};
use crate::event::LedgerEvent;
use crate::identity::{IdentityRegistry, VoterIdentity};
use crate::ledger::{ChainEntry, ChainReport, Ledger};
use crate::lifecycle::{Election, ElectionView, LifecycleController, NewElection};
use crate::tally::{self, Tally};
use crate::types::enums::ElectionStatus;
use crate::types::id::{BlockNumber, ElectionId, IdentityHash, WalletAddress};
use crate::types::unix_millis;

/// Durable sink for committed events.
///
/// `record` must not return until the event survives a process crash.
pub trait Journal: Send + Sync {
    fn record(&self, event: &LedgerEvent) -> Result<()>;
}

/// Keeps events in memory only. Used when no log file is configured.
#[derive(Default)]
pub struct MemoryJournal {
    events: Mutex<Vec<LedgerEvent>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Journal for MemoryJournal {
    fn record(&self, event: &LedgerEvent) -> Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

impl<J: Journal + ?Sized> Journal for Arc<J> {
    fn record(&self, event: &LedgerEvent) -> Result<()> {
        (**self).record(event)
    }
}

pub struct ElectionLedger<J: Journal> {
    registry: IdentityRegistry,
    ballot_box: BallotBox,
    lifecycle: LifecycleController,
    ledger: Ledger,
    journal: J,
}

impl<J: Journal> ElectionLedger<J> {
    pub fn new(journal: J) -> Self {
        Self {
            registry: IdentityRegistry::new(),
            ballot_box: BallotBox::new(),
            lifecycle: LifecycleController::new(),
            ledger: Ledger::new(),
            journal,
        }
    }

    pub fn journal(&self) -> &J {
        &self.journal
    }

    // --- Elections ---

    pub fn create_election(&self, request: NewElection) -> Result<Election> {
        self.lifecycle.create(request, unix_millis(), |election| {
            self.journal.record(&LedgerEvent::ElectionCreated {
                election: election.clone(),
            })?;
            self.ledger.open_chain(election.id);
            Ok(())
        })
    }

    pub fn election(&self, id: ElectionId) -> Result<ElectionView> {
        let entry = self.lifecycle.get(id)?;
        Ok(ElectionView {
            election: entry.definition().clone(),
            status: entry.status(),
        })
    }

    pub fn elections(&self) -> Vec<ElectionView> {
        self.lifecycle.list()
    }

    pub fn current_status(&self, id: ElectionId) -> Result<ElectionStatus> {
        self.lifecycle.current_status(id)
    }

    pub fn advance(&self, id: ElectionId) -> Result<ElectionStatus> {
        self.lifecycle.advance(id, |status| self.record_status(id, status))
    }

    pub fn transition(&self, id: ElectionId, target: ElectionStatus) -> Result<ElectionStatus> {
        self.lifecycle.transition(id, target, |status| self.record_status(id, status))
    }

    fn record_status(&self, election: ElectionId, status: ElectionStatus) -> Result<()> {
        self.journal.record(&LedgerEvent::StatusChanged {
            election,
            status,
            at: unix_millis(),
        })
    }

    /// Applies every scheduled boundary that has passed at `now_secs`.
    pub fn apply_due_transitions(&self, now_secs: u64) -> Vec<(ElectionId, Result<ElectionStatus>)> {
        self.lifecycle
            .due_transitions(now_secs)
            .into_iter()
            .map(|(id, target)| (id, self.transition(id, target)))
            .collect()
    }

    // --- Voters ---

    pub fn register_voter(&self, wallet_address: &str, national_id: &str) -> Result<VoterIdentity> {
        let wallet_address = WalletAddress::parse(wallet_address)?;
        let identity_hash = IdentityHash::derive(national_id)?;

        let identity = VoterIdentity {
            identity_hash,
            wallet_address,
            registered_at: unix_millis(),
        };

        self.registry.register(identity, |identity| {
            self.journal.record(&LedgerEvent::VoterRegistered {
                identity: identity.clone(),
            })?;
            self.ballot_box.enroll(&identity.wallet_address);
            Ok(())
        })
    }

    pub fn voter_status(&self, wallet_address: &str, election: ElectionId) -> Result<VoterStatus> {
        let wallet_address = WalletAddress::parse(wallet_address)?;
        Ok(self.ballot_box.status(&wallet_address, election))
    }

    pub fn registered_voters(&self) -> usize {
        self.registry.len()
    }

    // --- Votes ---

    pub fn cast_vote(&self, election: ElectionId, wallet_address: &str, candidate: &str) -> Result<VoteReceipt> {
        self.ballot_box.cast_vote(
            &self.lifecycle,
            &self.ledger,
            election,
            wallet_address,
            candidate,
            |entry| {
                self.journal.record(&LedgerEvent::VoteCommitted {
                    record: entry.record.clone(),
                    block: entry.block.clone(),
                })
            },
        )
    }

    // --- Ledger queries ---

    pub fn tally(&self, election: ElectionId) -> Result<Tally> {
        tally::tally(&self.lifecycle, &self.ledger, election)
    }

    pub fn latest_block_number(&self, election: ElectionId) -> Result<BlockNumber> {
        self.ledger.height(election)
    }

    pub fn blocks(&self, election: ElectionId) -> Result<Vec<Arc<ChainEntry>>> {
        self.ledger.entries(election)
    }

    pub fn total_blocks(&self) -> u64 {
        self.ledger.total_blocks()
    }

    pub fn verify(&self) -> bool {
        self.ledger.verify()
    }

    pub fn verify_report(&self) -> Vec<ChainReport> {
        self.ledger.verify_report()
    }

    /// Fails with `LedgerCorrupt` naming the first broken chain.
    pub fn ensure_valid(&self) -> Result<()> {
        match self.verify_report().into_iter().find(|r| !r.valid) {
            Some(bad) => Err(LedgerError::LedgerCorrupt {
                election: bad.election_id,
                block: bad.first_invalid_block.unwrap_or(BlockNumber::GENESIS),
            }),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    pub(crate) fn tamper<F: FnOnce(&mut ChainEntry)>(&self, election: ElectionId, index: usize, f: F) {
        self.ledger.tamper(election, index, f);
    }

    // --- Recovery ---

    /// Re-applies an already committed event without journaling it again.
    pub fn apply_committed(&self, event: &LedgerEvent) -> Result<()> {
        match event {
            LedgerEvent::ElectionCreated { election } => {
                self.lifecycle.restore(election.clone(), ElectionStatus::Upcoming)?;
                self.ledger.open_chain(election.id);
            }
            LedgerEvent::VoterRegistered { identity } => {
                self.registry.register(identity.clone(), |identity| {
                    self.ballot_box.enroll(&identity.wallet_address);
                    Ok(())
                })?;
            }
            LedgerEvent::StatusChanged { election, status, .. } => {
                self.lifecycle.transition(*election, *status, |_| Ok(()))?;
            }
            LedgerEvent::VoteCommitted { record, block } => {
                // A committed vote must have been acceptable when it was cast.
                let corrupt = || LedgerError::LedgerCorrupt {
                    election: record.election_id,
                    block: block.block_number,
                };
                let entry = self.lifecycle.get(record.election_id).map_err(|_| corrupt())?;
                if !entry.status().accepts_votes() || !entry.definition().has_candidate(&record.candidate_name) {
                    return Err(corrupt());
                }

                self.ledger.restore(ChainEntry {
                    block: block.clone(),
                    record: record.clone(),
                })?;
                self.ballot_box
                    .restore_vote(&record.wallet_address, record.election_id)?;
            }
        }
        Ok(())
    }
}
