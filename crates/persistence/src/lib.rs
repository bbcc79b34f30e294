pub mod error;
pub mod format;
pub mod writer;
pub mod reader;
pub mod journal;
pub mod proof;
pub mod fixtures;

pub use error::{EventLogError, Result};
pub use format::LoggedEvent;
pub use journal::FileJournal;
pub use proof::{compute_event_log_hash, EventLogProof};
pub use reader::{read_event_log, EventLog};
pub use writer::EventLogWriter;
