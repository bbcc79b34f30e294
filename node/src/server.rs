// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    extract::{Path, Query, Request as AxumRequest, State},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::header::AUTHORIZATION,
    http::StatusCode,
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ballot_kernel::types::id::ElectionId;
use ballot_kernel::lifecycle::{Election, ElectionView};

use crate::api::*;
use crate::engine::SharedEngine;
use crate::errors::ServiceError;

async fn auth_guard(
    State(token): State<Arc<String>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "));

    match provided {
        Some(provided) if provided == token.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn build_router(state: SharedEngine, auth_token: Option<String>) -> Router {
    let mut admin = Router::new()
        .route("/api/elections", post(create_election))
        .route("/api/elections/:id/advance", post(advance_election))
        .route("/api/elections/:id/transition", post(transition_election));

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required for admin routes");
        admin = admin.route_layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: admin routes are open");
    }

    Router::new()
        .route("/api/health", get(health))
        .route("/api/register-voter", post(register_voter))
        .route("/api/cast-vote", post(cast_vote))
        .route("/api/voter-status/:wallet_address", get(voter_status))
        .route("/api/election-results/:election_id", get(election_results))
        .route("/api/blockchain-info", get(blockchain_info))
        .route("/api/blocks/:election_id", get(blocks))
        .route("/api/elections", get(list_elections))
        .route("/api/elections/:id", get(get_election))
        .route("/api/proof/event-log", get(event_log_proof))
        .merge(admin)
        // Observability
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| ServiceError::InvalidInput(rejection.body_text()))
}

fn path<T>(param: Result<Path<T>, PathRejection>) -> Result<T, ServiceError> {
    param
        .map(|Path(v)| v)
        .map_err(|rejection| ServiceError::InvalidInput(rejection.body_text()))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ServiceError> {
    params
        .map(|Query(v)| v)
        .map_err(|rejection| ServiceError::InvalidInput(rejection.body_text()))
}

async fn health(State(engine): State<SharedEngine>) -> Json<HealthResponse> {
    let election_id = engine.default_election();
    let latest_block_number = engine
        .latest_block_number(election_id)
        .map(|n| n.0)
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        election_id,
        latest_block_number,
        ledger_persistent: engine.is_persistent(),
    })
}

async fn register_voter(
    State(engine): State<SharedEngine>,
    payload: Result<Json<RegisterVoterRequest>, JsonRejection>,
) -> Result<Json<RegisterVoterResponse>, ServiceError> {
    let req = body(payload)?;
    let identity = engine.register_voter(&req.wallet_address, &req.national_id)?;

    Ok(Json(RegisterVoterResponse {
        success: true,
        wallet_address: identity.wallet_address.to_string(),
        message: "Voter registered successfully".to_string(),
    }))
}

async fn cast_vote(
    State(engine): State<SharedEngine>,
    payload: Result<Json<CastVoteRequest>, JsonRejection>,
) -> Result<Json<CastVoteResponse>, ServiceError> {
    let req = body(payload)?;
    let election = req.election_id.unwrap_or_else(|| engine.default_election());
    let receipt = engine.cast_vote(election, &req.wallet_address, &req.candidate_name)?;

    Ok(Json(CastVoteResponse {
        success: true,
        election_id: election,
        candidate_name: receipt.record.candidate_name,
        block_number: receipt.block.block_number.0,
        block_hash: receipt.block.hash_hex(),
    }))
}

async fn voter_status(
    State(engine): State<SharedEngine>,
    wallet_address: Result<Path<String>, PathRejection>,
    params: Result<Query<ElectionQuery>, QueryRejection>,
) -> Result<Json<VoterStatusResponse>, ServiceError> {
    let wallet_address = path(wallet_address)?;
    let query = query(params)?;
    let election = query.election_id.unwrap_or_else(|| engine.default_election());
    let status = engine.voter_status(&wallet_address, election)?;

    Ok(Json(VoterStatusResponse {
        wallet_address: wallet_address.trim().to_ascii_lowercase(),
        election_id: election,
        registered: status.registered,
        voted: status.voted,
    }))
}

async fn election_results(
    State(engine): State<SharedEngine>,
    election_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ElectionResultsResponse>, ServiceError> {
    let election_id = path(election_id)?;
    let tally = engine.tally(ElectionId(election_id))?;
    Ok(Json(ElectionResultsResponse { success: true, tally }))
}

async fn blockchain_info(
    State(engine): State<SharedEngine>,
    params: Result<Query<ElectionQuery>, QueryRejection>,
) -> Result<Json<BlockchainInfoResponse>, ServiceError> {
    let query = query(params)?;
    let election = query.election_id.unwrap_or_else(|| engine.default_election());
    let latest = engine.latest_block_number(election)?;
    let chains = engine.chain_reports();

    Ok(Json(BlockchainInfoResponse {
        election_id: election,
        latest_block_number: latest.0,
        chain_valid: chains.iter().all(|c| c.valid),
        total_blocks: chains.iter().map(|c| c.height.0).sum(),
        chains,
    }))
}

async fn blocks(
    State(engine): State<SharedEngine>,
    election_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<BlocksResponse>, ServiceError> {
    let election = ElectionId(path(election_id)?);
    let entries = engine.blocks(election)?;

    Ok(Json(BlocksResponse {
        election_id: election,
        blocks: entries.iter().map(|e| BlockView::from(e.as_ref())).collect(),
    }))
}

async fn list_elections(State(engine): State<SharedEngine>) -> Json<Vec<ElectionView>> {
    Json(engine.elections())
}

async fn get_election(
    State(engine): State<SharedEngine>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ElectionView>, ServiceError> {
    Ok(Json(engine.election(ElectionId(path(id)?))?))
}

async fn create_election(
    State(engine): State<SharedEngine>,
    payload: Result<Json<CreateElectionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Election>), ServiceError> {
    let req = body(payload)?;
    let election = engine.create_election(req.into())?;
    Ok((StatusCode::CREATED, Json(election)))
}

async fn advance_election(
    State(engine): State<SharedEngine>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<TransitionResponse>, ServiceError> {
    let election_id = ElectionId(path(id)?);
    let status = engine.advance(election_id)?;
    Ok(Json(TransitionResponse { success: true, election_id, status }))
}

async fn transition_election(
    State(engine): State<SharedEngine>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<TransitionResponse>, ServiceError> {
    let election_id = ElectionId(path(id)?);
    let req = body(payload)?;
    let status = engine.transition(election_id, req.status)?;
    Ok(Json(TransitionResponse { success: true, election_id, status }))
}

async fn event_log_proof(State(engine): State<SharedEngine>) -> Result<Json<EventLogProofResponse>, ServiceError> {
    let chains = engine.chain_reports();

    let response = match engine.event_log_proof() {
        Some(proof) => {
            let proof = proof?;
            EventLogProofResponse {
                persistent: true,
                format_version: Some(proof.format_version),
                event_log_hash: Some(proof.hash_hex()),
                event_count: Some(proof.event_count),
                log_len: Some(proof.log_len),
                chains,
            }
        }
        None => EventLogProofResponse {
            persistent: false,
            format_version: None,
            event_log_hash: None,
            event_count: None,
            log_len: None,
            chains,
        },
    };

    Ok(Json(response))
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
