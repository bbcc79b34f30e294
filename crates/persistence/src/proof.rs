//! Event log proof for audits.
//!
//! Same committed events -> same proof, on any machine.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::format::FORMAT_VERSION;
use crate::reader::read_event_log;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLogProof {
    pub format_version: u32,
    /// BLAKE3 of the committed prefix (header + complete frames).
    pub event_log_hash: [u8; 32],
    pub event_count: u64,
    pub log_len: u64,
}

impl EventLogProof {
    pub fn generate(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let log = read_event_log(path)?;
        let event_log_hash = hash_prefix(path, log.valid_len)?;

        Ok(Self {
            format_version: FORMAT_VERSION,
            event_log_hash,
            event_count: log.events.len() as u64,
            log_len: log.valid_len,
        })
    }

    pub fn hash_hex(&self) -> String {
        blake3::Hash::from(self.event_log_hash).to_hex().to_string()
    }

    pub fn matches(&self, other: &EventLogProof) -> bool {
        self.event_log_hash == other.event_log_hash && self.event_count == other.event_count
    }
}

/// BLAKE3 of the entire file, header included.
pub fn compute_event_log_hash(path: impl AsRef<Path>) -> std::io::Result<[u8; 32]> {
    hash_prefix(path.as_ref(), u64::MAX)
}

fn hash_prefix(path: &Path, limit: u64) -> std::io::Result<[u8; 32]> {
    let file = File::open(path)?;
    let mut reader = file.take(limit);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(*hasher.finalize().as_bytes())
}
