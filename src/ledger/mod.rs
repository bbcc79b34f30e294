// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-only, hash-chained vote ledger.
//!
//! Every election owns an independent chain with its own genesis and block
//! numbering. Chains are created when the election is created and are never
//! dropped.

pub mod block;
pub mod chain;

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{LedgerError, Result};
use crate::types::id::{BlockNumber, ElectionId};
use crate::types::unix_millis;

pub use block::{Block, ChainEntry, VoteRecord, GENESIS_HASH};
pub use chain::Chain;

/// Verification outcome for one chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    pub election_id: ElectionId,
    pub height: BlockNumber,
    pub head_hash: String,
    pub valid: bool,
    pub first_invalid_block: Option<BlockNumber>,
}

#[derive(Default)]
pub struct Ledger {
    chains: DashMap<ElectionId, Arc<Chain>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the chain for `election` if it does not exist yet.
    pub fn open_chain(&self, election: ElectionId) -> Arc<Chain> {
        self.chains
            .entry(election)
            .or_insert_with(|| Arc::new(Chain::new(election)))
            .value()
            .clone()
    }

    pub fn chain(&self, election: ElectionId) -> Result<Arc<Chain>> {
        self.chains
            .get(&election)
            .map(|c| c.value().clone())
            .ok_or(LedgerError::UnknownElection(election))
    }

    /// Commits `record` to its election's chain. `commit` is the durability
    /// hook; the block only becomes visible once it returns `Ok`.
    pub fn append<F>(&self, record: VoteRecord, commit: F) -> Result<Block>
    where
        F: FnOnce(&ChainEntry) -> Result<()>,
    {
        let chain = self.chain(record.election_id)?;
        chain.append(record, unix_millis(), commit)
    }

    pub fn restore(&self, entry: ChainEntry) -> Result<()> {
        let chain = self.chain(entry.record.election_id)?;
        chain.restore(entry)
    }

    pub fn height(&self, election: ElectionId) -> Result<BlockNumber> {
        Ok(self.chain(election)?.height())
    }

    pub fn entries(&self, election: ElectionId) -> Result<Vec<Arc<ChainEntry>>> {
        Ok(self.chain(election)?.snapshot())
    }

    /// Total committed blocks across every chain.
    pub fn total_blocks(&self) -> u64 {
        self.chains.iter().map(|c| c.value().height().0).sum()
    }

    /// True iff every chain verifies from genesis.
    pub fn verify(&self) -> bool {
        self.verify_report().iter().all(|r| r.valid)
    }

    pub fn verify_report(&self) -> Vec<ChainReport> {
        // Collect handles first so no map shard stays locked during the scans.
        let mut chains: Vec<Arc<Chain>> = self.chains.iter().map(|c| c.value().clone()).collect();
        chains.sort_by_key(|c| c.election());

        chains
            .iter()
            .map(|chain| {
                let entries = chain.snapshot();
                let outcome = chain::verify_entries(chain.election(), &entries);
                let (height, head_hash) = match entries.last() {
                    Some(tail) => (tail.block.block_number, tail.block.hash_hex()),
                    None => (BlockNumber::GENESIS, hex::encode(GENESIS_HASH)),
                };
                ChainReport {
                    election_id: chain.election(),
                    height,
                    head_hash,
                    valid: outcome.is_ok(),
                    first_invalid_block: outcome.err(),
                }
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn tamper<F: FnOnce(&mut ChainEntry)>(&self, election: ElectionId, index: usize, f: F) {
        if let Some(chain) = self.chains.get(&election) {
            chain.tamper(index, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::WalletAddress;

    fn vote(election: u64, addr: &str) -> VoteRecord {
        VoteRecord {
            election_id: ElectionId(election),
            wallet_address: WalletAddress::parse(addr).unwrap(),
            candidate_name: "Jatiya Party".into(),
            timestamp: unix_millis(),
        }
    }

    #[test]
    fn test_chains_are_independent() {
        let ledger = Ledger::new();
        ledger.open_chain(ElectionId(1));
        ledger.open_chain(ElectionId(2));

        ledger.append(vote(1, "0x01"), |_| Ok(())).unwrap();
        ledger.append(vote(1, "0x02"), |_| Ok(())).unwrap();
        let b = ledger.append(vote(2, "0x01"), |_| Ok(())).unwrap();

        assert_eq!(b.block_number, BlockNumber(1));
        assert_eq!(b.previous_hash, GENESIS_HASH);
        assert_eq!(ledger.height(ElectionId(1)).unwrap(), BlockNumber(2));
        assert_eq!(ledger.total_blocks(), 3);
        assert!(ledger.verify());
    }

    #[test]
    fn test_append_to_unknown_chain() {
        let ledger = Ledger::new();
        let res = ledger.append(vote(9, "0x01"), |_| Ok(()));
        assert_eq!(res, Err(LedgerError::UnknownElection(ElectionId(9))));
    }

    #[test]
    fn test_report_pinpoints_tampered_chain() {
        let ledger = Ledger::new();
        ledger.open_chain(ElectionId(1));
        ledger.open_chain(ElectionId(2));
        ledger.append(vote(1, "0x01"), |_| Ok(())).unwrap();
        ledger.append(vote(2, "0x01"), |_| Ok(())).unwrap();

        ledger.tamper(ElectionId(2), 0, |e| e.block.previous_hash[5] = 9);

        let report = ledger.verify_report();
        assert!(report[0].valid);
        assert!(!report[1].valid);
        assert_eq!(report[1].first_invalid_block, Some(BlockNumber(1)));
        assert!(!ledger.verify());
    }
}
