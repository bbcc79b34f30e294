//! Deterministic demo ledgers for tests and demos.

use anyhow::{Context, Result};
use ballot_kernel::lifecycle::NewElection;
use ballot_kernel::types::enums::ElectionStatus;
use ballot_kernel::types::id::ElectionId;
use ballot_kernel::ElectionLedger;
use std::fs;
use std::path::{Path, PathBuf};

use crate::journal::FileJournal;

pub const DEMO_CANDIDATES: [&str; 5] = [
    "National Citizen Party",
    "Bangladesh Nationalist Party",
    "Bangladesh Jamate Islam",
    "Jatiya Party",
    "Independent Candidates",
];

pub struct DemoLedger {
    pub path: PathBuf,
    pub election: ElectionId,
    /// Candidate index chosen by each demo voter, in cast order.
    pub votes: Vec<usize>,
}

/// Writes `ledger.log` in `dir`: one election, ten registered voters, a vote
/// from each of the first `vote_count` of them, then the election is closed.
pub fn generate_demo_ledger(dir: &Path, vote_count: usize) -> Result<DemoLedger> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join("ledger.log");
    let journal = FileJournal::open(&path).context("open demo log")?;
    let service = ElectionLedger::new(journal);

    let election = service
        .create_election(NewElection {
            name: "Bangladesh General Election 2025".into(),
            candidates: DEMO_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        })?
        .id;
    service.transition(election, ElectionStatus::Active)?;

    let mut votes = Vec::new();
    for i in 0..10usize {
        let address = format!("0x{:04x}", 0xA100 + i);
        service.register_voter(&address, &format!("{:010}", 1_234_567_890 + i))?;
        if i < vote_count {
            let choice = (i * 7 + 3) % DEMO_CANDIDATES.len();
            service.cast_vote(election, &address, DEMO_CANDIDATES[choice])?;
            votes.push(choice);
        }
    }
    service.transition(election, ElectionStatus::Closed)?;

    Ok(DemoLedger { path, election, votes })
}
