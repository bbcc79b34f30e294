use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid event log header")]
    InvalidHeader,
    #[error("Event log corrupted at offset {offset}")]
    Corrupted { offset: u64 },
}

pub type Result<T> = std::result::Result<T, EventLogError>;
