use std::fs;
use tempfile::tempdir;

use ballot_kernel::error::ErrorKind;
use ballot_kernel::types::enums::ElectionStatus;
use ballot_kernel::types::id::{BlockNumber, ElectionId};
use ballot_node::config::NodeConfig;
use ballot_node::engine::{Engine, DEFAULT_CANDIDATES};
use ballot_node::recovery::RecoveryError;

fn persistent_config(path: &std::path::Path) -> NodeConfig {
    NodeConfig {
        event_log_path: Some(path.to_path_buf()),
        scheduler_interval_secs: None,
        ..NodeConfig::default()
    }
}

#[test]
fn test_state_survives_restart() {
    let dir = tempdir().unwrap();
    let cfg = persistent_config(&dir.path().join("data/ledger.log"));
    let id = ElectionId(1);

    let (tally_before, head_before) = {
        let engine = Engine::open(&cfg).unwrap();
        assert!(engine.is_persistent());
        engine.advance(id).unwrap();
        for i in 0..4u64 {
            let addr = format!("0x{:x}", 0xa0 + i);
            engine.register_voter(&addr, &format!("{:013}", 1_000_000_000_000u64 + i)).unwrap();
            engine.cast_vote(id, &addr, DEFAULT_CANDIDATES[(i % 2) as usize]).unwrap();
        }
        (engine.tally(id).unwrap(), engine.chain_reports())
    };

    let engine = Engine::open(&cfg).unwrap();
    assert_eq!(engine.elections().len(), 1, "seed must not run twice");
    assert_eq!(engine.tally(id).unwrap(), tally_before);
    assert_eq!(engine.chain_reports(), head_before);
    assert_eq!(engine.latest_block_number(id).unwrap(), BlockNumber(4));
    assert_eq!(engine.ledger().current_status(id).unwrap(), ElectionStatus::Active);

    let again = engine.cast_vote(id, "0xa0", DEFAULT_CANDIDATES[2]).unwrap_err();
    assert_eq!(again.kind(), ErrorKind::AlreadyVoted);
    let again = engine.register_voter("0xff", "1000000000000").unwrap_err();
    assert_eq!(again.kind(), ErrorKind::AlreadyRegistered);

    // New blocks keep linking onto the recovered chain.
    engine.register_voter("0xff", "9999999999").unwrap();
    let receipt = engine.cast_vote(id, "0xff", DEFAULT_CANDIDATES[4]).unwrap();
    assert_eq!(receipt.block.block_number, BlockNumber(5));
    assert!(engine.ledger().verify());
}

#[test]
fn test_torn_tail_is_dropped_on_start() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.log");
    let cfg = persistent_config(&path);

    {
        let engine = Engine::open(&cfg).unwrap();
        engine.advance(ElectionId(1)).unwrap();
        engine.register_voter("0xa1", "1234567890").unwrap();
    }
    let committed = fs::metadata(&path).unwrap().len();

    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(&200u32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 17]);
    fs::write(&path, bytes).unwrap();

    let engine = Engine::open(&cfg).unwrap();
    assert!(engine.voter_status("0xa1", ElectionId(1)).unwrap().registered);
    assert_eq!(fs::metadata(&path).unwrap().len(), committed);
}

#[test]
fn test_corrupted_log_refuses_to_start() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.log");
    let cfg = persistent_config(&path);

    {
        let engine = Engine::open(&cfg).unwrap();
        engine.advance(ElectionId(1)).unwrap();
        engine.register_voter("0xa1", "1234567890").unwrap();
        engine.cast_vote(ElectionId(1), "0xa1", DEFAULT_CANDIDATES[0]).unwrap();
    }

    // Flip one byte inside the last frame: the vote's candidate name.
    let mut bytes = fs::read(&path).unwrap();
    let name = DEFAULT_CANDIDATES[0].as_bytes();
    let at = bytes
        .windows(name.len())
        .rposition(|w| w == name)
        .unwrap();
    bytes[at] = b'M';
    fs::write(&path, bytes).unwrap();

    match Engine::open(&cfg) {
        Err(RecoveryError::Replay { source, .. }) => assert_eq!(source.kind(), ErrorKind::LedgerCorrupt),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("corrupted ledger must not start"),
    }
}

#[test]
fn test_event_log_proof_is_stable_across_restart() {
    let dir = tempdir().unwrap();
    let cfg = persistent_config(&dir.path().join("ledger.log"));

    let before = {
        let engine = Engine::open(&cfg).unwrap();
        engine.advance(ElectionId(1)).unwrap();
        engine.event_log_proof().unwrap().unwrap()
    };

    let engine = Engine::open(&cfg).unwrap();
    let after = engine.event_log_proof().unwrap().unwrap();
    assert_eq!(before, after);
    assert_eq!(after.event_count, 2);
}

#[test]
fn test_scheduled_boundaries() {
    let engine = Engine::open(&NodeConfig {
        seed_default_election: false,
        ..NodeConfig::default()
    })
    .unwrap();

    let id = engine
        .create_election(ballot_kernel::lifecycle::NewElection {
            name: "Upazila".into(),
            candidates: vec!["Boat".into(), "Eagle".into()],
            opens_at: Some(10),
            closes_at: Some(20),
        })
        .unwrap()
        .id;

    assert_eq!(engine.apply_due_transitions(5), 0);
    assert_eq!(engine.apply_due_transitions(10), 1);
    assert_eq!(engine.ledger().current_status(id).unwrap(), ElectionStatus::Active);
    assert_eq!(engine.apply_due_transitions(25), 1);
    assert_eq!(engine.ledger().current_status(id).unwrap(), ElectionStatus::Closed);
}
