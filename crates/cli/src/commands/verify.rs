use anyhow::bail;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

use ballot_persistence::EventLogProof;

use crate::engine::ForensicEngine;

/// Replays the log and re-walks every chain. Any failure is an error so the
/// process exits non-zero.
pub fn run(log_path: &Path) -> anyhow::Result<()> {
    let proof = EventLogProof::generate(log_path)?;

    let mut engine = ForensicEngine::open(log_path)?;
    if let Err(e) = engine.replay_all() {
        println!("\n❌ CORRUPTED\n");
        println!("Replayed:  {} of {} events", engine.applied, engine.log.len());
        println!("Reason:    {:#}\n", e);
        return Err(e);
    }

    let reports = engine.ledger.verify_report();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Election", "Height", "Head Hash", "Status"]);
    for r in &reports {
        let status = match r.first_invalid_block {
            None => "OK".to_string(),
            Some(block) => format!("BROKEN at block {}", block),
        };
        table.add_row(vec![
            r.election_id.to_string(),
            r.height.to_string(),
            r.head_hash.clone(),
            status,
        ]);
    }

    let broken: Vec<_> = reports.iter().filter(|r| !r.valid).collect();
    if !broken.is_empty() {
        println!("\n❌ CORRUPTED\n");
        println!("{table}\n");
        bail!("{} chain(s) failed verification", broken.len());
    }

    println!("\n✅ VERIFIED\n");
    println!("{table}");
    println!("Events:        {}", proof.event_count);
    println!("Log Hash:      {}", proof.hash_hex());
    println!("Confidence:    STRONG (BLAKE3 hash chain)\n");
    Ok(())
}
