// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use ballot_kernel::types::id::ElectionId;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid value {value:?} for {var}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Event log file. `None` keeps the ledger in memory only.
    pub event_log_path: Option<PathBuf>,
    /// Bearer token for admin routes. `None` leaves them open.
    pub auth_token: Option<String>,
    /// Create the general election on a node with no elections.
    pub seed_default_election: bool,
    /// Election used when a request does not name one.
    pub default_election_id: ElectionId,
    /// Period of the lifecycle scheduler. `None` disables it.
    pub scheduler_interval_secs: Option<u64>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            event_log_path: None,
            auth_token: None,
            seed_default_election: true,
            default_election_id: ElectionId(1),
            scheduler_interval_secs: Some(5),
        }
    }
}

impl NodeConfig {
    /// Defaults overlaid with the `BALLOT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("BALLOT_BIND_ADDR") {
            cfg.bind_addr = parse("BALLOT_BIND_ADDR", &v)?;
        }
        if let Some(v) = lookup("BALLOT_EVENT_LOG").filter(|v| !v.trim().is_empty()) {
            cfg.event_log_path = Some(PathBuf::from(v.trim()));
        }
        if let Some(v) = lookup("BALLOT_AUTH_TOKEN").filter(|v| !v.trim().is_empty()) {
            cfg.auth_token = Some(v.trim().to_string());
        }
        if let Some(v) = lookup("BALLOT_SEED_ELECTION") {
            cfg.seed_default_election = parse_flag("BALLOT_SEED_ELECTION", &v)?;
        }
        if let Some(v) = lookup("BALLOT_DEFAULT_ELECTION") {
            cfg.default_election_id = ElectionId(parse("BALLOT_DEFAULT_ELECTION", &v)?);
        }
        if let Some(v) = lookup("BALLOT_SCHEDULER_SECS") {
            let secs: u64 = parse("BALLOT_SCHEDULER_SECS", &v)?;
            cfg.scheduler_interval_secs = (secs > 0).then_some(secs);
        }

        Ok(cfg)
    }
}

fn parse<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        var,
        value: value.to_string(),
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            var,
            value: value.to_string(),
        }),
    }
}
