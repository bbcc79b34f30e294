pub mod inspect;
pub mod tally;
pub mod timeline;
pub mod verify;

/// Event timestamps are unix milliseconds.
pub(crate) fn format_millis(ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
