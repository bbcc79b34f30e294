// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use ballot_node::config::NodeConfig;
use ballot_node::engine::{Engine, SharedEngine};
use ballot_node::scheduler::spawn_scheduler;
use ballot_node::server::build_router;
use ballot_node::telemetry::init_telemetry;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    init_telemetry();

    let cfg = match NodeConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Initializing Ballot Node with config: {:?}", cfg);

    // Recovery fails closed: a ledger that does not replay cleanly is never served.
    let engine: SharedEngine = match Engine::open(&cfg) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::error!("Refusing to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(secs) = cfg.scheduler_interval_secs {
        spawn_scheduler(engine.clone(), Duration::from_secs(secs));
    }

    let app = build_router(engine, cfg.auth_token.clone());

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
