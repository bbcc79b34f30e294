use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

use ballot_kernel::event::LedgerEvent;
use ballot_persistence::read_event_log;

use super::format_millis;

pub fn run(log_path: &Path, limit: Option<usize>) -> anyhow::Result<()> {
    let log = read_event_log(log_path)?;
    let shown = limit.unwrap_or(log.len()).min(log.len());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Offset", "Timestamp", "Event", "Election", "Detail"]);

    for (i, logged) in log.events.iter().take(shown).enumerate() {
        let event = &logged.event;
        table.add_row(vec![
            (i + 1).to_string(),
            logged.offset.to_string(),
            format_millis(event.timestamp()),
            event.event_type().to_string(),
            event.election().map(|e| e.to_string()).unwrap_or_default(),
            detail(event),
        ]);
    }

    println!("\nEvent Timeline\n");
    println!("{table}");
    if shown < log.len() {
        println!("... {} more event(s)", log.len() - shown);
    }
    println!();

    Ok(())
}

// Vote contents stay out of the timeline; only the block is shown.
fn detail(event: &LedgerEvent) -> String {
    match event {
        LedgerEvent::ElectionCreated { election } => {
            format!("{} ({} candidates)", election.name, election.candidates.len())
        }
        LedgerEvent::VoterRegistered { identity } => identity.wallet_address.to_string(),
        LedgerEvent::StatusChanged { status, .. } => format!("-> {}", status),
        LedgerEvent::VoteCommitted { block, .. } => {
            let hash = block.hash_hex();
            format!("block {} {}..", block.block_number, &hash[..12])
        }
    }
}
