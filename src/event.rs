// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger Events
//!
//! Every durable state change of the service is expressed as a `LedgerEvent`.
//! Replaying the committed events in order into an empty `ElectionLedger`
//! rebuilds the voter table, the election statuses and every chain exactly.
//!
//! # Invariants
//! - Events are immutable once committed
//! - A `VoteCommitted` block must link onto the chain rebuilt so far
//! - Registrations precede the votes of the same address

use serde::{Deserialize, Serialize};

use crate::identity::VoterIdentity;
use crate::ledger::{Block, VoteRecord};
use crate::lifecycle::Election;
use crate::types::enums::ElectionStatus;
use crate::types::id::ElectionId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerEvent {
    ElectionCreated {
        election: Election,
    },

    VoterRegistered {
        identity: VoterIdentity,
    },

    StatusChanged {
        election: ElectionId,
        status: ElectionStatus,
        at: u64,
    },

    VoteCommitted {
        record: VoteRecord,
        block: Block,
    },
}

impl LedgerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::ElectionCreated { .. } => "ElectionCreated",
            LedgerEvent::VoterRegistered { .. } => "VoterRegistered",
            LedgerEvent::StatusChanged { .. } => "StatusChanged",
            LedgerEvent::VoteCommitted { .. } => "VoteCommitted",
        }
    }

    /// Wall-clock time carried by the event, in unix milliseconds.
    pub fn timestamp(&self) -> u64 {
        match self {
            LedgerEvent::ElectionCreated { election } => election.created_at,
            LedgerEvent::VoterRegistered { identity } => identity.registered_at,
            LedgerEvent::StatusChanged { at, .. } => *at,
            LedgerEvent::VoteCommitted { block, .. } => block.timestamp,
        }
    }

    pub fn election(&self) -> Option<ElectionId> {
        match self {
            LedgerEvent::ElectionCreated { election } => Some(election.id),
            LedgerEvent::VoterRegistered { .. } => None,
            LedgerEvent::StatusChanged { election, .. } => Some(*election),
            LedgerEvent::VoteCommitted { record, .. } => Some(record.election_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::GENESIS_HASH;
    use crate::types::id::{BlockNumber, WalletAddress};

    fn vote_event() -> LedgerEvent {
        let record = VoteRecord {
            election_id: ElectionId(1),
            wallet_address: WalletAddress::parse("0xa1").unwrap(),
            candidate_name: "National Citizen Party".into(),
            timestamp: 5,
        };
        let block = Block {
            block_number: BlockNumber(1),
            previous_hash: GENESIS_HASH,
            payload_hash: record.payload_hash(),
            timestamp: 6,
        };
        LedgerEvent::VoteCommitted { record, block }
    }

    #[test]
    fn test_event_serialization_determinism() {
        let event = vote_event();
        let bytes1 = bincode::serde::encode_to_vec(&event, bincode::config::standard()).unwrap();
        let bytes2 = bincode::serde::encode_to_vec(&event, bincode::config::standard()).unwrap();
        assert_eq!(bytes1, bytes2, "Event serialization must be deterministic");
    }

    #[test]
    fn test_event_accessors() {
        let event = vote_event();
        assert_eq!(event.event_type(), "VoteCommitted");
        assert_eq!(event.timestamp(), 6);
        assert_eq!(event.election(), Some(ElectionId(1)));
    }
}
