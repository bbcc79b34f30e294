// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Election lifecycle enums.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Temporal state of an election. Ordering follows the only legal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ElectionStatus {
    Upcoming = 0,
    Active = 1,
    Closed = 2,
}

impl ElectionStatus {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(ElectionStatus::Upcoming),
            1 => Some(ElectionStatus::Active),
            2 => Some(ElectionStatus::Closed),
            _ => None,
        }
    }

    /// The next state, or `None` once closed.
    pub fn successor(self) -> Option<Self> {
        match self {
            ElectionStatus::Upcoming => Some(ElectionStatus::Active),
            ElectionStatus::Active => Some(ElectionStatus::Closed),
            ElectionStatus::Closed => None,
        }
    }

    pub fn accepts_votes(self) -> bool {
        self == ElectionStatus::Active
    }
}

impl Default for ElectionStatus {
    fn default() -> Self {
        ElectionStatus::Upcoming
    }
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElectionStatus::Upcoming => "Upcoming",
            ElectionStatus::Active => "Active",
            ElectionStatus::Closed => "Closed",
        };
        f.write_str(s)
    }
}
