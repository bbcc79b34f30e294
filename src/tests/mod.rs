
use crate::lifecycle::NewElection;
use crate::service::{ElectionLedger, MemoryJournal};
use crate::types::enums::ElectionStatus;
use crate::types::id::ElectionId;

pub(crate) const CANDIDATES: [&str; 5] = [
    "National Citizen Party",
    "Bangladesh Nationalist Party",
    "Bangladesh Jamate Islam",
    "Jatiya Party",
    "Independent Candidates",
];

pub(crate) fn general_election() -> NewElection {
    NewElection {
        name: "Bangladesh General Election 2025".into(),
        candidates: CANDIDATES.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

/// Service with one election already Active.
pub(crate) fn active_service() -> (ElectionLedger<MemoryJournal>, ElectionId) {
    let service = ElectionLedger::new(MemoryJournal::new());
    let id = service.create_election(general_election()).unwrap().id;
    service.transition(id, ElectionStatus::Active).unwrap();
    (service, id)
}

/// Ten-digit national ID unique to `n`.
pub(crate) fn nid(n: u64) -> String {
    format!("{:010}", 1_000_000_000 + n)
}
