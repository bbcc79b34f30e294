//! On-disk layout of the ledger event log.
//!
//! ```text
//! [Header: 16 bytes][len: u32 LE][bincode LedgerEvent][len][event]...
//! ```
//!
//! Header:
//! - magic: b"BLLT"
//! - version: u32 (1)
//! - reserved: u64 (0)

use ballot_kernel::event::LedgerEvent;

use crate::error::{EventLogError, Result};

pub const HEADER_LEN: usize = 16;
pub const FORMAT_VERSION: u32 = 1;

/// Upper bound on one encoded event. A larger length prefix is never written,
/// so reading one means the prefix itself is damaged.
pub const MAX_ENTRY_LEN: u32 = 1 << 20;

const LEN_PREFIX: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLogHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub reserved: u64,
}

impl EventLogHeader {
    pub const MAGIC: [u8; 4] = *b"BLLT";

    pub fn new() -> Self {
        Self {
            magic: Self::MAGIC,
            version: FORMAT_VERSION,
            reserved: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&self.magic);
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..16].copy_from_slice(&self.reserved.to_le_bytes());
        buf
    }

    /// Parses and validates the header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(EventLogError::InvalidHeader);
        }
        let header = Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            reserved: u64::from_le_bytes([
                bytes[8], bytes[9], bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
            ]),
        };
        if header.magic != Self::MAGIC || header.version != FORMAT_VERSION {
            return Err(EventLogError::InvalidHeader);
        }
        Ok(header)
    }
}

impl Default for EventLogHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Length-prefixed frame for one event.
pub fn encode_entry(event: &LedgerEvent) -> Result<Vec<u8>> {
    let body = bincode::serde::encode_to_vec(event, bincode::config::standard())
        .map_err(|e| EventLogError::Serialization(e.to_string()))?;

    let len = u32::try_from(body.len())
        .ok()
        .filter(|len| *len <= MAX_ENTRY_LEN)
        .ok_or_else(|| EventLogError::Serialization(format!("event too large: {} bytes", body.len())))?;

    let mut frame = Vec::with_capacity(LEN_PREFIX + body.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// An event together with the file offset of its frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent {
    pub offset: u64,
    pub event: LedgerEvent,
}

/// Result of scanning a whole log image.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub events: Vec<LoggedEvent>,
    /// Length of the prefix made of the header and complete frames.
    pub valid_len: u64,
    /// Bytes after `valid_len` belonging to an incomplete final frame.
    pub torn_bytes: u64,
}

/// Decodes every frame of a log image (header included).
///
/// A frame cut short by the end of the image is an uncommitted write and
/// ends the scan. A frame that is complete but does not decode is
/// `Corrupted`.
pub fn scan(bytes: &[u8]) -> Result<Scan> {
    EventLogHeader::parse(bytes)?;

    let mut events = Vec::new();
    let mut offset = HEADER_LEN;

    while offset < bytes.len() {
        let rest = &bytes[offset..];
        if rest.len() < LEN_PREFIX {
            break;
        }

        let len = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
        if len == 0 || len > MAX_ENTRY_LEN {
            return Err(EventLogError::Corrupted { offset: offset as u64 });
        }
        let end = LEN_PREFIX + len as usize;
        if rest.len() < end {
            break;
        }

        let body = &rest[LEN_PREFIX..end];
        let (event, read) = bincode::serde::decode_from_slice::<LedgerEvent, _>(body, bincode::config::standard())
            .map_err(|_| EventLogError::Corrupted { offset: offset as u64 })?;
        if read != body.len() {
            return Err(EventLogError::Corrupted { offset: offset as u64 });
        }

        events.push(LoggedEvent {
            offset: offset as u64,
            event,
        });
        offset += end;
    }

    Ok(Scan {
        events,
        valid_len: offset as u64,
        torn_bytes: (bytes.len() - offset) as u64,
    })
}
