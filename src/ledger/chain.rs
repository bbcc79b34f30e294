// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! One election's hash chain.
//!
//! The tail (last block) is the only serialization point: appends take the
//! write lock, compute the next block against the current tail, run the
//! durability hook and only then publish the entry. Readers clone the
//! `Arc` list under a short read lock and scan without holding it, so a scan
//! sees each block either fully or not at all.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{LedgerError, Result};
use crate::ledger::block::{Block, ChainEntry, VoteRecord, GENESIS_HASH};
use crate::types::id::{BlockNumber, ElectionId};
use crate::types::Digest;

pub struct Chain {
    election: ElectionId,
    entries: RwLock<Vec<Arc<ChainEntry>>>,
}

impl Chain {
    pub fn new(election: ElectionId) -> Self {
        Self {
            election,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn election(&self) -> ElectionId {
        self.election
    }

    /// Appends `record` as the next block.
    ///
    /// `commit` runs under the tail lock with the fully built block; if it
    /// fails nothing is published and the tail is unchanged.
    pub fn append<F>(&self, record: VoteRecord, timestamp: u64, commit: F) -> Result<Block>
    where
        F: FnOnce(&ChainEntry) -> Result<()>,
    {
        let mut entries = self.entries.write();

        let (previous_hash, block_number) = tail_of(&entries);
        let block = Block {
            block_number: block_number.next(),
            previous_hash,
            payload_hash: record.payload_hash(),
            timestamp,
        };
        let entry = ChainEntry { block, record };

        commit(&entry)?;

        let block = entry.block.clone();
        entries.push(Arc::new(entry));
        Ok(block)
    }

    /// Re-attaches a block read back from durable storage.
    ///
    /// The stored block must be exactly what `append` would have produced at
    /// this height; anything else is corruption.
    pub fn restore(&self, entry: ChainEntry) -> Result<()> {
        let mut entries = self.entries.write();
        let (previous_hash, block_number) = tail_of(&entries);
        let expected_number = block_number.next();

        let linked = entry.block.block_number == expected_number
            && entry.block.previous_hash == previous_hash
            && entry.block.payload_hash == entry.record.payload_hash()
            && entry.record.election_id == self.election;

        if !linked {
            return Err(LedgerError::LedgerCorrupt {
                election: self.election,
                block: entry.block.block_number,
            });
        }

        entries.push(Arc::new(entry));
        Ok(())
    }

    /// Consistent point-in-time view of the chain.
    pub fn snapshot(&self) -> Vec<Arc<ChainEntry>> {
        self.entries.read().clone()
    }

    pub fn height(&self) -> BlockNumber {
        let entries = self.entries.read();
        entries
            .last()
            .map(|e| e.block.block_number)
            .unwrap_or(BlockNumber::GENESIS)
    }

    pub fn head_hash(&self) -> Digest {
        tail_of(&self.entries.read()).0
    }

    /// Walks from genesis; returns the first block whose links do not hold.
    pub fn verify(&self) -> core::result::Result<(), BlockNumber> {
        verify_entries(self.election, &self.snapshot())
    }

    #[cfg(test)]
    pub(crate) fn tamper<F: FnOnce(&mut ChainEntry)>(&self, index: usize, f: F) {
        let mut entries = self.entries.write();
        let mut entry = (*entries[index]).clone();
        f(&mut entry);
        entries[index] = Arc::new(entry);
    }
}

fn tail_of(entries: &[Arc<ChainEntry>]) -> (Digest, BlockNumber) {
    match entries.last() {
        Some(tail) => (tail.block.digest(), tail.block.block_number),
        None => (GENESIS_HASH, BlockNumber::GENESIS),
    }
}

/// Recomputes every link of `entries` as a chain for `election`.
pub fn verify_entries(
    election: ElectionId,
    entries: &[Arc<ChainEntry>],
) -> core::result::Result<(), BlockNumber> {
    let mut expected_previous = GENESIS_HASH;
    let mut expected_number = BlockNumber::GENESIS;

    for entry in entries {
        expected_number = expected_number.next();
        let block = &entry.block;

        if block.block_number != expected_number
            || block.previous_hash != expected_previous
            || block.payload_hash != entry.record.payload_hash()
            || entry.record.election_id != election
        {
            return Err(expected_number);
        }
        expected_previous = block.digest();
    }
    Ok(())
}
