use std::fs;
use tempfile::tempdir;

use ballot_cli::commands::{inspect, tally, timeline, verify};
use ballot_cli::engine::ForensicEngine;
use ballot_persistence::fixtures::{self, DEMO_CANDIDATES};

#[test]
fn test_integration_workflow() {
    let dir = tempdir().unwrap();
    let demo = fixtures::generate_demo_ledger(dir.path(), 8).unwrap();

    assert!(inspect::run(&demo.path).is_ok());
    assert!(verify::run(&demo.path).is_ok(), "Verification should succeed on a clean log");
    assert!(timeline::run(&demo.path, None).is_ok());
    assert!(timeline::run(&demo.path, Some(3)).is_ok());
    assert!(tally::run(&demo.path, demo.election.0, false).is_ok());
    assert!(tally::run(&demo.path, demo.election.0, true).is_ok());

    // Unknown election is an error, not an empty table.
    assert!(tally::run(&demo.path, 99, false).is_err());
}

#[test]
fn test_offline_tally_matches_cast_votes() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let demo = fixtures::generate_demo_ledger(dir.path(), 10)?;

    let engine = ForensicEngine::replayed(&demo.path)?;
    let tally = engine.ledger.tally(demo.election)?;

    assert_eq!(tally.total_votes, 10);
    for (i, candidate) in DEMO_CANDIDATES.iter().enumerate() {
        let expected = demo.votes.iter().filter(|&&c| c == i).count() as u64;
        assert_eq!(tally.results[*candidate], expected, "{}", candidate);
    }
    Ok(())
}

#[test]
fn test_verify_fails_on_tampered_vote() {
    let dir = tempdir().unwrap();
    let demo = fixtures::generate_demo_ledger(dir.path(), 4).unwrap();

    // Rewrite the candidate inside the last committed vote.
    let mut bytes = fs::read(&demo.path).unwrap();
    let last_choice = *demo.votes.last().unwrap();
    let name = DEMO_CANDIDATES[last_choice].as_bytes();
    let at = bytes.windows(name.len()).rposition(|w| w == name).unwrap();
    bytes[at] = bytes[at].to_ascii_lowercase();
    fs::write(&demo.path, bytes).unwrap();

    assert!(verify::run(&demo.path).is_err());
    // The log still decodes; inspection works on damaged ledgers.
    assert!(inspect::run(&demo.path).is_ok());
}

#[test]
fn test_verify_rejects_foreign_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("not-a-ledger.log");
    fs::write(&path, b"hello, this is not an event log").unwrap();

    assert!(verify::run(&path).is_err());
    assert!(inspect::run(&path).is_err());
}
