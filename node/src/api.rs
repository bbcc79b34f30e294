// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Wire types of the HTTP API.
//!
//! Requests accept camelCase names and the older snake_case ones
//! (`voter_address`, `nid`, `election_id`, `candidate_name`).

use serde::{Deserialize, Serialize};

use ballot_kernel::ledger::{ChainEntry, ChainReport};
use ballot_kernel::lifecycle::NewElection;
use ballot_kernel::tally::Tally;
use ballot_kernel::types::enums::ElectionStatus;
use ballot_kernel::types::id::ElectionId;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVoterRequest {
    #[serde(default, alias = "voter_address")]
    pub wallet_address: String,
    #[serde(default, alias = "nid")]
    pub national_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVoterResponse {
    pub success: bool,
    pub wallet_address: String,
    pub message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    #[serde(default, alias = "voter_address")]
    pub wallet_address: String,
    #[serde(default, alias = "election_id")]
    pub election_id: Option<ElectionId>,
    #[serde(default, alias = "candidate_name")]
    pub candidate_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteResponse {
    pub success: bool,
    pub election_id: ElectionId,
    pub candidate_name: String,
    pub block_number: u64,
    pub block_hash: String,
}

#[derive(Deserialize)]
pub struct ElectionQuery {
    #[serde(default, alias = "electionId")]
    pub election_id: Option<ElectionId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterStatusResponse {
    pub wallet_address: String,
    pub election_id: ElectionId,
    pub registered: bool,
    pub voted: bool,
}

#[derive(Serialize)]
pub struct ElectionResultsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub tally: Tally,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainInfoResponse {
    pub election_id: ElectionId,
    pub latest_block_number: u64,
    pub chain_valid: bool,
    pub total_blocks: u64,
    pub chains: Vec<ChainReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub election_id: ElectionId,
    pub latest_block_number: u64,
    pub ledger_persistent: bool,
}

/// Public view of a block. The vote it carries is not exposed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockView {
    pub block_number: u64,
    pub hash: String,
    pub previous_hash: String,
    pub payload_hash: String,
    pub timestamp: u64,
}

impl From<&ChainEntry> for BlockView {
    fn from(entry: &ChainEntry) -> Self {
        let block = &entry.block;
        Self {
            block_number: block.block_number.0,
            hash: block.hash_hex(),
            previous_hash: hex::encode(block.previous_hash),
            payload_hash: hex::encode(block.payload_hash),
            timestamp: block.timestamp,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksResponse {
    pub election_id: ElectionId,
    pub blocks: Vec<BlockView>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateElectionRequest {
    pub name: String,
    pub candidates: Vec<String>,
    #[serde(default, alias = "opens_at")]
    pub opens_at: Option<u64>,
    #[serde(default, alias = "closes_at")]
    pub closes_at: Option<u64>,
}

impl From<CreateElectionRequest> for NewElection {
    fn from(req: CreateElectionRequest) -> Self {
        NewElection {
            name: req.name,
            candidates: req.candidates,
            opens_at: req.opens_at,
            closes_at: req.closes_at,
        }
    }
}

#[derive(Deserialize)]
pub struct TransitionRequest {
    pub status: ElectionStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    pub success: bool,
    pub election_id: ElectionId,
    pub status: ElectionStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLogProofResponse {
    pub persistent: bool,
    pub format_version: Option<u32>,
    pub event_log_hash: Option<String>,
    pub event_count: Option<u64>,
    pub log_len: Option<u64>,
    pub chains: Vec<ChainReport>,
}
