// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Election Lifecycle Controller.
//!
//! Owns each election's definition and status. Status only moves forward:
//! Upcoming -> Active -> Closed. Vote casting holds a shared guard on the
//! status for the whole cast, so once a transition to Closed returns, no vote
//! can still be landing in that election.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{LedgerError, Result};
use crate::types::enums::ElectionStatus;
use crate::types::id::ElectionId;

/// Election definition. Fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    pub id: ElectionId,
    pub name: String,
    pub candidates: Vec<String>,
    /// Unix seconds at which the scheduler opens the election.
    pub opens_at: Option<u64>,
    /// Unix seconds at which the scheduler closes the election.
    pub closes_at: Option<u64>,
    pub created_at: u64,
}

impl Election {
    pub fn has_candidate(&self, name: &str) -> bool {
        self.candidates.iter().any(|c| c == name)
    }
}

/// Request to create an election; the id is assigned by the controller.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewElection {
    pub name: String,
    pub candidates: Vec<String>,
    #[serde(default)]
    pub opens_at: Option<u64>,
    #[serde(default)]
    pub closes_at: Option<u64>,
}

impl NewElection {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::InvalidElection("name is empty".into()));
        }
        if self.candidates.is_empty() {
            return Err(LedgerError::InvalidElection("candidate list is empty".into()));
        }
        for (i, c) in self.candidates.iter().enumerate() {
            if c.trim().is_empty() {
                return Err(LedgerError::InvalidElection(format!("candidate #{} has no name", i + 1)));
            }
            if self.candidates[..i].contains(c) {
                return Err(LedgerError::InvalidElection(format!("duplicate candidate {:?}", c)));
            }
        }
        if let (Some(open), Some(close)) = (self.opens_at, self.closes_at) {
            if close <= open {
                return Err(LedgerError::InvalidElection("closes_at must be after opens_at".into()));
            }
        }
        Ok(())
    }
}

pub struct ElectionEntry {
    definition: Election,
    status: RwLock<ElectionStatus>,
}

impl ElectionEntry {
    pub fn definition(&self) -> &Election {
        &self.definition
    }

    pub fn status(&self) -> ElectionStatus {
        *self.status.read()
    }

    /// Shared hold on the status; transitions wait until it is released.
    pub fn status_guard(&self) -> RwLockReadGuard<'_, ElectionStatus> {
        self.status.read()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ElectionView {
    #[serde(flatten)]
    pub election: Election,
    pub status: ElectionStatus,
}

pub struct LifecycleController {
    elections: DashMap<ElectionId, Arc<ElectionEntry>>,
    next_id: AtomicU64,
    create_lock: Mutex<()>,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self {
            elections: DashMap::new(),
            next_id: AtomicU64::new(1),
            create_lock: Mutex::new(()),
        }
    }
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an election in `Upcoming`. Ids are dense and assigned in
    /// commit order.
    pub fn create<F>(&self, request: NewElection, created_at: u64, commit: F) -> Result<Election>
    where
        F: FnOnce(&Election) -> Result<()>,
    {
        request.validate()?;
        let _serial = self.create_lock.lock();

        let election = Election {
            id: ElectionId(self.next_id.load(Ordering::SeqCst)),
            name: request.name.trim().to_string(),
            candidates: request.candidates,
            opens_at: request.opens_at,
            closes_at: request.closes_at,
            created_at,
        };

        commit(&election)?;

        self.next_id.fetch_add(1, Ordering::SeqCst);
        self.insert(election.clone(), ElectionStatus::Upcoming);
        Ok(election)
    }

    /// Installs an election read back from storage.
    pub fn restore(&self, election: Election, status: ElectionStatus) -> Result<()> {
        let _serial = self.create_lock.lock();
        if self.elections.contains_key(&election.id) {
            return Err(LedgerError::LedgerCorrupt {
                election: election.id,
                block: crate::types::id::BlockNumber::GENESIS,
            });
        }
        self.next_id.fetch_max(election.id.0 + 1, Ordering::SeqCst);
        self.insert(election, status);
        Ok(())
    }

    fn insert(&self, election: Election, status: ElectionStatus) {
        let entry = Arc::new(ElectionEntry {
            definition: election,
            status: RwLock::new(status),
        });
        self.elections.insert(entry.definition.id, entry);
    }

    pub fn get(&self, id: ElectionId) -> Result<Arc<ElectionEntry>> {
        self.elections
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(LedgerError::UnknownElection(id))
    }

    pub fn current_status(&self, id: ElectionId) -> Result<ElectionStatus> {
        Ok(self.get(id)?.status())
    }

    pub fn list(&self) -> Vec<ElectionView> {
        let mut views: Vec<ElectionView> = self
            .elections
            .iter()
            .map(|e| ElectionView {
                election: e.definition.clone(),
                status: e.status(),
            })
            .collect();
        views.sort_by_key(|v| v.election.id);
        views
    }

    /// Moves `id` to `target`.
    ///
    /// Same state is a no-op and does not call `commit`. Any earlier state is
    /// `InvalidTransition`. Later states may skip (Upcoming -> Closed).
    pub fn transition<F>(&self, id: ElectionId, target: ElectionStatus, commit: F) -> Result<ElectionStatus>
    where
        F: FnOnce(ElectionStatus) -> Result<()>,
    {
        let entry = self.get(id)?;
        let mut status = entry.status.write();

        if target == *status {
            return Ok(*status);
        }
        if target < *status {
            return Err(LedgerError::InvalidTransition {
                election: id,
                from: *status,
                to: target,
            });
        }

        commit(target)?;
        *status = target;
        Ok(target)
    }

    /// One step forward. Idempotent once Closed.
    pub fn advance<F>(&self, id: ElectionId, commit: F) -> Result<ElectionStatus>
    where
        F: FnOnce(ElectionStatus) -> Result<()>,
    {
        let entry = self.get(id)?;
        let mut status = entry.status.write();

        match status.successor() {
            Some(next) => {
                commit(next)?;
                *status = next;
                Ok(next)
            }
            None => Ok(*status),
        }
    }

    /// Status changes whose scheduled boundary is at or before `now_secs`.
    pub fn due_transitions(&self, now_secs: u64) -> Vec<(ElectionId, ElectionStatus)> {
        let mut due = Vec::new();
        for e in self.elections.iter() {
            let status = e.status();
            let def = &e.definition;
            if status < ElectionStatus::Closed && def.closes_at.map_or(false, |t| t <= now_secs) {
                due.push((def.id, ElectionStatus::Closed));
            } else if status == ElectionStatus::Upcoming && def.opens_at.map_or(false, |t| t <= now_secs) {
                due.push((def.id, ElectionStatus::Active));
            }
        }
        due.sort_by_key(|(id, _)| *id);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewElection {
        NewElection {
            name: "Bangladesh General Election 2025".into(),
            candidates: vec!["National Citizen Party".into(), "Jatiya Party".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_assigns_dense_ids() {
        let lc = LifecycleController::new();
        let a = lc.create(request(), 0, |_| Ok(())).unwrap();
        let b = lc.create(request(), 0, |_| Ok(())).unwrap();
        assert_eq!(a.id, ElectionId(1));
        assert_eq!(b.id, ElectionId(2));
        assert_eq!(lc.current_status(a.id).unwrap(), ElectionStatus::Upcoming);
    }

    #[test]
    fn test_failed_create_does_not_burn_id() {
        let lc = LifecycleController::new();
        let res = lc.create(request(), 0, |_| Err(LedgerError::StorageUnavailable("io".into())));
        assert!(res.is_err());
        assert_eq!(lc.create(request(), 0, |_| Ok(())).unwrap().id, ElectionId(1));
    }

    #[test]
    fn test_create_validation() {
        let lc = LifecycleController::new();
        let mut r = request();
        r.candidates.push("Jatiya Party".into());
        assert!(matches!(lc.create(r, 0, |_| Ok(())), Err(LedgerError::InvalidElection(_))));

        let mut r = request();
        r.candidates.clear();
        assert!(matches!(lc.create(r, 0, |_| Ok(())), Err(LedgerError::InvalidElection(_))));
    }

    #[test]
    fn test_advance_is_monotonic_and_idempotent_at_closed() {
        let lc = LifecycleController::new();
        let id = lc.create(request(), 0, |_| Ok(())).unwrap().id;

        assert_eq!(lc.advance(id, |_| Ok(())).unwrap(), ElectionStatus::Active);
        assert_eq!(lc.advance(id, |_| Ok(())).unwrap(), ElectionStatus::Closed);
        assert_eq!(
            lc.advance(id, |_| panic!("no commit expected at Closed")).unwrap(),
            ElectionStatus::Closed
        );
    }

    #[test]
    fn test_transition_rules() {
        let lc = LifecycleController::new();
        let id = lc.create(request(), 0, |_| Ok(())).unwrap().id;

        lc.transition(id, ElectionStatus::Active, |_| Ok(())).unwrap();
        // Same state: no-op, no commit.
        let same = lc.transition(id, ElectionStatus::Active, |_| panic!("unexpected commit"));
        assert_eq!(same.unwrap(), ElectionStatus::Active);

        let back = lc.transition(id, ElectionStatus::Upcoming, |_| Ok(()));
        assert!(matches!(back, Err(LedgerError::InvalidTransition { .. })));
        assert_eq!(lc.current_status(id).unwrap(), ElectionStatus::Active);
    }

    #[test]
    fn test_unknown_election() {
        let lc = LifecycleController::new();
        assert_eq!(lc.current_status(ElectionId(3)), Err(LedgerError::UnknownElection(ElectionId(3))));
    }

    #[test]
    fn test_due_transitions() {
        let lc = LifecycleController::new();
        let mut r = request();
        r.opens_at = Some(100);
        r.closes_at = Some(200);
        let id = lc.create(r, 0, |_| Ok(())).unwrap().id;

        assert!(lc.due_transitions(99).is_empty());
        assert_eq!(lc.due_transitions(100), vec![(id, ElectionStatus::Active)]);
        // Past both boundaries at once: close directly.
        assert_eq!(lc.due_transitions(250), vec![(id, ElectionStatus::Closed)]);
    }
}
