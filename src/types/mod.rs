// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod id;
pub mod enums;

use std::time::{SystemTime, UNIX_EPOCH};

/// 32-byte BLAKE3 digest.
pub type Digest = [u8; 32];

/// Wall-clock milliseconds since the Unix epoch. Clamps to 0 on a pre-epoch clock.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
