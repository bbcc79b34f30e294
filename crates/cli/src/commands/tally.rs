use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

use ballot_kernel::types::id::ElectionId;

use crate::engine::ForensicEngine;

pub fn run(log_path: &Path, election: u64, json: bool) -> anyhow::Result<()> {
    let engine = ForensicEngine::replayed(log_path)?;
    let tally = engine.ledger.tally(ElectionId(election))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tally)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Candidate", "Votes"]);
    for (candidate, votes) in &tally.results {
        table.add_row(vec![candidate.clone(), votes.to_string()]);
    }
    table.add_row(vec!["Total".to_string(), tally.total_votes.to_string()]);

    println!("\nElection {} ({}) at block {}\n", tally.election_id, tally.status, tally.height);
    println!("{table}\n");

    Ok(())
}
