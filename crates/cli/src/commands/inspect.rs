use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use indexmap::IndexMap;
use std::path::Path;

use ballot_kernel::event::LedgerEvent;
use ballot_persistence::read_event_log;

use super::format_millis;

pub fn run(log_path: &Path) -> anyhow::Result<()> {
    let log = read_event_log(log_path)?;

    println!("\nLedger Event Log Report");
    println!("-----------------------");
    println!("File:     {}", log_path.display());
    println!(
        "Header:   {:?} v{}",
        std::str::from_utf8(&log.header.magic).unwrap_or("BAD"),
        log.header.version
    );
    println!("Events:   {} ({} bytes committed)", log.len(), log.valid_len);
    if log.torn_bytes > 0 {
        println!("Torn:     {} trailing bytes (uncommitted write)", log.torn_bytes);
    }

    let mut by_type: IndexMap<&'static str, usize> = IndexMap::new();
    for name in ["ElectionCreated", "VoterRegistered", "StatusChanged", "VoteCommitted"] {
        by_type.insert(name, 0);
    }
    for logged in &log.events {
        *by_type.entry(logged.event.event_type()).or_default() += 1;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Event", "Count"]);
    for (name, count) in &by_type {
        table.add_row(vec![name.to_string(), count.to_string()]);
    }
    println!("\n{table}");

    // Per election: name, last status and height as recorded in the log.
    let mut elections: IndexMap<u64, (String, String, u64, u64)> = IndexMap::new();
    for logged in &log.events {
        match &logged.event {
            LedgerEvent::ElectionCreated { election } => {
                elections.insert(
                    election.id.0,
                    (election.name.clone(), "Upcoming".to_string(), 0, election.created_at),
                );
            }
            LedgerEvent::StatusChanged { election, status, .. } => {
                if let Some(row) = elections.get_mut(&election.0) {
                    row.1 = status.to_string();
                }
            }
            LedgerEvent::VoteCommitted { record, block } => {
                if let Some(row) = elections.get_mut(&record.election_id.0) {
                    row.2 = row.2.max(block.block_number.0);
                }
            }
            LedgerEvent::VoterRegistered { .. } => {}
        }
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Election", "Name", "Status", "Height", "Created"]);
    for (id, (name, status, height, created_at)) in &elections {
        table.add_row(vec![
            id.to_string(),
            name.clone(),
            status.clone(),
            height.to_string(),
            format_millis(*created_at),
        ]);
    }
    println!("{table}\n");

    Ok(())
}
