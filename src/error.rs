// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::{BlockNumber, ElectionId};

/// Machine-readable failure kind carried across the service boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidIdentity,
    AlreadyRegistered,
    NotRegistered,
    AlreadyVoted,
    UnknownCandidate,
    ElectionNotActive,
    InvalidTransition,
    UnknownElection,
    InvalidElection,
    LedgerCorrupt,
    StorageUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidIdentity => "INVALID_IDENTITY",
            ErrorKind::AlreadyRegistered => "ALREADY_REGISTERED",
            ErrorKind::NotRegistered => "NOT_REGISTERED",
            ErrorKind::AlreadyVoted => "ALREADY_VOTED",
            ErrorKind::UnknownCandidate => "UNKNOWN_CANDIDATE",
            ErrorKind::ElectionNotActive => "ELECTION_NOT_ACTIVE",
            ErrorKind::InvalidTransition => "INVALID_TRANSITION",
            ErrorKind::UnknownElection => "UNKNOWN_ELECTION",
            ErrorKind::InvalidElection => "INVALID_ELECTION",
            ErrorKind::LedgerCorrupt => "LEDGER_CORRUPT",
            ErrorKind::StorageUnavailable => "STORAGE_UNAVAILABLE",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("voter already registered")]
    AlreadyRegistered,

    #[error("voter not registered")]
    NotRegistered,

    #[error("voter has already voted in election {0}")]
    AlreadyVoted(ElectionId),

    #[error("candidate {candidate:?} is not on the ballot of election {election}")]
    UnknownCandidate { election: ElectionId, candidate: String },

    #[error("election {0} is not accepting votes")]
    ElectionNotActive(ElectionId),

    #[error("election {election} cannot move from {from} back to {to}")]
    InvalidTransition {
        election: ElectionId,
        from: crate::types::enums::ElectionStatus,
        to: crate::types::enums::ElectionStatus,
    },

    #[error("election {0} not found")]
    UnknownElection(ElectionId),

    #[error("invalid election definition: {0}")]
    InvalidElection(String),

    #[error("ledger corrupt: election {election} at block {block}")]
    LedgerCorrupt { election: ElectionId, block: BlockNumber },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidIdentity(_) => ErrorKind::InvalidIdentity,
            LedgerError::AlreadyRegistered => ErrorKind::AlreadyRegistered,
            LedgerError::NotRegistered => ErrorKind::NotRegistered,
            LedgerError::AlreadyVoted(_) => ErrorKind::AlreadyVoted,
            LedgerError::UnknownCandidate { .. } => ErrorKind::UnknownCandidate,
            LedgerError::ElectionNotActive(_) => ErrorKind::ElectionNotActive,
            LedgerError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            LedgerError::UnknownElection(_) => ErrorKind::UnknownElection,
            LedgerError::InvalidElection(_) => ErrorKind::InvalidElection,
            LedgerError::LedgerCorrupt { .. } => ErrorKind::LedgerCorrupt,
            LedgerError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    /// System-health failures, as opposed to a rejected request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LedgerError::LedgerCorrupt { .. } | LedgerError::StorageUnavailable(_)
        )
    }
}

pub type LedgerResult<T> = core::result::Result<T, LedgerError>;
pub type Result<T> = LedgerResult<T>;
