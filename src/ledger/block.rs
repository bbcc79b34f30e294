// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Vote records and blocks, with their canonical digests.

use serde::{Deserialize, Serialize};

use crate::types::id::{BlockNumber, ElectionId, WalletAddress};
use crate::types::Digest;

/// previous_hash of block 1 in every chain.
pub const GENESIS_HASH: Digest = [0u8; 32];

/// One accepted vote. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub election_id: ElectionId,
    pub wallet_address: WalletAddress,
    pub candidate_name: String,
    pub timestamp: u64,
}

impl VoteRecord {
    /// BLAKE3 over the canonical field encoding.
    ///
    /// # Hash Input Structure
    /// ```text
    /// election_id (u64 LE)
    /// wallet_address length (u32 LE) ‖ bytes
    /// candidate_name length (u32 LE) ‖ bytes
    /// timestamp (u64 LE)
    /// ```
    /// Length prefixes keep ("ab", "c") and ("a", "bc") apart.
    pub fn payload_hash(&self) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.election_id.0.to_le_bytes());

        let address = self.wallet_address.as_str().as_bytes();
        hasher.update(&(address.len() as u32).to_le_bytes());
        hasher.update(address);

        let candidate = self.candidate_name.as_bytes();
        hasher.update(&(candidate.len() as u32).to_le_bytes());
        hasher.update(candidate);

        hasher.update(&self.timestamp.to_le_bytes());
        *hasher.finalize().as_bytes()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub block_number: BlockNumber,
    pub previous_hash: Digest,
    pub payload_hash: Digest,
    pub timestamp: u64,
}

impl Block {
    /// Digest of the whole block; the next block's `previous_hash`.
    pub fn digest(&self) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.block_number.0.to_le_bytes());
        hasher.update(&self.previous_hash);
        hasher.update(&self.payload_hash);
        hasher.update(&self.timestamp.to_le_bytes());
        *hasher.finalize().as_bytes()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

/// A committed block together with the vote it commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub block: Block,
    pub record: VoteRecord,
}
