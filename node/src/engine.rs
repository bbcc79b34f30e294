// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Engine: the election ledger as hosted by the node.
//!
//! Wraps `ElectionLedger` with start-up recovery, the default election,
//! request metrics and the audit proof. All methods take `&self`; the ledger
//! does its own fine-grained locking, so the engine is shared as a plain `Arc`.

use std::sync::Arc;

use ballot_kernel::ballot_box::{VoteReceipt, VoterStatus};
use ballot_kernel::error::LedgerError;
use ballot_kernel::identity::VoterIdentity;
use ballot_kernel::ledger::{ChainEntry, ChainReport};
use ballot_kernel::lifecycle::{Election, ElectionView, NewElection};
use ballot_kernel::tally::Tally;
use ballot_kernel::types::enums::ElectionStatus;
use ballot_kernel::types::id::{BlockNumber, ElectionId};
use ballot_kernel::ElectionLedger;
use ballot_persistence::{EventLogError, EventLogProof};

use crate::config::NodeConfig;
use crate::journal::NodeJournal;
use crate::recovery::{self, RecoveryError};

pub type SharedEngine = Arc<Engine>;

pub const DEFAULT_ELECTION_NAME: &str = "Bangladesh General Election 2025";

pub const DEFAULT_CANDIDATES: [&str; 5] = [
    "National Citizen Party",
    "Bangladesh Nationalist Party",
    "Bangladesh Jamate Islam",
    "Jatiya Party",
    "Independent Candidates",
];

pub fn default_election() -> NewElection {
    NewElection {
        name: DEFAULT_ELECTION_NAME.to_string(),
        candidates: DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

pub struct Engine {
    ledger: ElectionLedger<NodeJournal>,
    default_election: ElectionId,
}

impl Engine {
    /// Opens the event log (if configured), replays it and seeds the default
    /// election on an empty ledger.
    pub fn open(cfg: &NodeConfig) -> Result<Self, RecoveryError> {
        let journal = match &cfg.event_log_path {
            Some(path) => NodeJournal::open(path)?,
            None => {
                tracing::warn!("No event log configured; ledger is in-memory only");
                NodeJournal::in_memory()
            }
        };
        let ledger = ElectionLedger::new(journal);

        if let Some(path) = &cfg.event_log_path {
            tracing::info!("Replaying event log {:?}", path);
            let report = recovery::recover(&ledger, path)?;
            tracing::info!(
                events = report.events,
                elections = report.elections,
                voters = report.voters,
                blocks = report.blocks,
                "Event log replayed"
            );
        }

        let engine = Self {
            ledger,
            default_election: cfg.default_election_id,
        };

        if cfg.seed_default_election && engine.ledger.elections().is_empty() {
            let election = engine
                .ledger
                .create_election(default_election())
                .map_err(RecoveryError::Seed)?;
            tracing::info!(election = %election.id, "Seeded {:?}", election.name);
        }

        Ok(engine)
    }

    pub fn ledger(&self) -> &ElectionLedger<NodeJournal> {
        &self.ledger
    }

    pub fn default_election(&self) -> ElectionId {
        self.default_election
    }

    pub fn is_persistent(&self) -> bool {
        self.ledger.journal().is_persistent()
    }

    pub fn register_voter(&self, wallet_address: &str, national_id: &str) -> Result<VoterIdentity, LedgerError> {
        match self.ledger.register_voter(wallet_address, national_id) {
            Ok(identity) => {
                metrics::counter!("ballot_registrations_total", 1);
                tracing::info!(wallet = %identity.wallet_address, "Voter registered");
                Ok(identity)
            }
            Err(e) => {
                tracing::debug!(kind = e.kind().as_str(), "Registration rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn cast_vote(&self, election: ElectionId, wallet_address: &str, candidate: &str) -> Result<VoteReceipt, LedgerError> {
        match self.ledger.cast_vote(election, wallet_address, candidate) {
            Ok(receipt) => {
                metrics::counter!("ballot_votes_accepted_total", 1);
                tracing::info!(
                    election = %election,
                    block = %receipt.block.block_number,
                    "Vote committed"
                );
                Ok(receipt)
            }
            Err(e) => {
                metrics::counter!("ballot_votes_rejected_total", 1, "kind" => e.kind().as_str());
                tracing::debug!(election = %election, kind = e.kind().as_str(), "Vote rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn voter_status(&self, wallet_address: &str, election: ElectionId) -> Result<VoterStatus, LedgerError> {
        self.ledger.voter_status(wallet_address, election)
    }

    pub fn tally(&self, election: ElectionId) -> Result<Tally, LedgerError> {
        self.ledger.tally(election)
    }

    pub fn latest_block_number(&self, election: ElectionId) -> Result<BlockNumber, LedgerError> {
        self.ledger.latest_block_number(election)
    }

    pub fn blocks(&self, election: ElectionId) -> Result<Vec<Arc<ChainEntry>>, LedgerError> {
        self.ledger.blocks(election)
    }

    pub fn chain_reports(&self) -> Vec<ChainReport> {
        self.ledger.verify_report()
    }

    pub fn elections(&self) -> Vec<ElectionView> {
        self.ledger.elections()
    }

    pub fn election(&self, id: ElectionId) -> Result<ElectionView, LedgerError> {
        self.ledger.election(id)
    }

    pub fn create_election(&self, request: NewElection) -> Result<Election, LedgerError> {
        let election = self.ledger.create_election(request)?;
        tracing::info!(election = %election.id, "Election {:?} created", election.name);
        Ok(election)
    }

    pub fn advance(&self, id: ElectionId) -> Result<ElectionStatus, LedgerError> {
        let status = self.ledger.advance(id)?;
        tracing::info!(election = %id, status = %status, "Election advanced");
        Ok(status)
    }

    pub fn transition(&self, id: ElectionId, target: ElectionStatus) -> Result<ElectionStatus, LedgerError> {
        let status = self.ledger.transition(id, target)?;
        tracing::info!(election = %id, status = %status, "Election transitioned");
        Ok(status)
    }

    /// Applies scheduled boundaries; returns how many elections changed.
    pub fn apply_due_transitions(&self, now_secs: u64) -> usize {
        let mut applied = 0;
        for (id, result) in self.ledger.apply_due_transitions(now_secs) {
            match result {
                Ok(status) => {
                    applied += 1;
                    tracing::info!(election = %id, status = %status, "Scheduled transition applied");
                }
                Err(e) => tracing::error!(election = %id, "Scheduled transition failed: {}", e),
            }
        }
        applied
    }

    /// Proof over the committed event log. `None` when running in memory.
    pub fn event_log_proof(&self) -> Option<Result<EventLogProof, EventLogError>> {
        self.ledger.journal().path().map(EventLogProof::generate)
    }
}
