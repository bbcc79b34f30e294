// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Lifecycle scheduler: opens and closes elections at their scheduled times.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use ballot_kernel::types::unix_millis;

use crate::engine::SharedEngine;

pub fn spawn_scheduler(engine: SharedEngine, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let applied = engine.apply_due_transitions(unix_millis() / 1000);
            if applied > 0 {
                tracing::debug!("Scheduler applied {} transition(s)", applied);
            }
        }
    })
}
