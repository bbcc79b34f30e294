// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity Registry: who is eligible to vote.
//!
//! A registration is keyed twice, by wallet address and by identity hash,
//! and both keys must be free. Both map entries are held while the
//! registration commits, so two racing requests for the same address or the
//! same national ID resolve to exactly one winner. Entries are always taken
//! address first, then identity.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::types::id::{IdentityHash, WalletAddress};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterIdentity {
    pub identity_hash: IdentityHash,
    pub wallet_address: WalletAddress,
    pub registered_at: u64,
}

#[derive(Default)]
pub struct IdentityRegistry {
    by_address: DashMap<WalletAddress, VoterIdentity>,
    by_identity: DashMap<IdentityHash, WalletAddress>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `identity` if neither of its keys is taken.
    ///
    /// `commit` runs while both keys are reserved; an error from it aborts the
    /// registration and leaves the registry unchanged.
    pub fn register<F>(&self, identity: VoterIdentity, commit: F) -> Result<VoterIdentity>
    where
        F: FnOnce(&VoterIdentity) -> Result<()>,
    {
        let address_slot = match self.by_address.entry(identity.wallet_address.clone()) {
            Entry::Occupied(_) => return Err(LedgerError::AlreadyRegistered),
            Entry::Vacant(slot) => slot,
        };
        let identity_slot = match self.by_identity.entry(identity.identity_hash) {
            Entry::Occupied(_) => return Err(LedgerError::AlreadyRegistered),
            Entry::Vacant(slot) => slot,
        };

        commit(&identity)?;

        identity_slot.insert(identity.wallet_address.clone());
        address_slot.insert(identity.clone());
        Ok(identity)
    }

    pub fn lookup(&self, address: &WalletAddress) -> Option<VoterIdentity> {
        self.by_address.get(address).map(|r| r.value().clone())
    }

    pub fn is_identity_registered(&self, hash: &IdentityHash) -> bool {
        self.by_identity.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}
