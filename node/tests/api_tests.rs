use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

use ballot_node::config::NodeConfig;
use ballot_node::engine::Engine;
use ballot_node::server::build_router;

fn app_with_token(token: Option<&str>) -> Router {
    let cfg = NodeConfig::default();
    let engine = Arc::new(Engine::open(&cfg).unwrap());
    build_router(engine, token.map(String::from))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("Authorization", format!("Bearer {}", t));
    }
    let req = match body {
        Some(b) => req
            .header("Content-Type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_full_voting_flow() {
    let app = app_with_token(None);

    let (status, body) = call(&app, "POST", "/api/register-voter", Some(json!({
        "walletAddress": "0xA1", "nationalId": "1234567890"
    })), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["walletAddress"], "0xa1");

    // Seeded election starts Upcoming.
    let (status, body) = call(&app, "POST", "/api/cast-vote", Some(json!({
        "walletAddress": "0xA1", "electionId": 1, "candidateName": "National Citizen Party"
    })), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errorKind"], "ELECTION_NOT_ACTIVE");
    assert_eq!(body["success"], false);

    let (status, body) = call(&app, "POST", "/api/elections/1/advance", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Active");

    let (status, body) = call(&app, "POST", "/api/cast-vote", Some(json!({
        "walletAddress": "0xA1", "electionId": 1, "candidateName": "National Citizen Party"
    })), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blockNumber"], 1);

    let (status, body) = call(&app, "POST", "/api/cast-vote", Some(json!({
        "walletAddress": "0xa1", "electionId": 1, "candidateName": "Jatiya Party"
    })), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errorKind"], "ALREADY_VOTED");
    assert_eq!(body["fatal"], false);

    let (status, body) = call(&app, "GET", "/api/election-results/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["National Citizen Party"], 1);
    assert_eq!(body["results"]["Jatiya Party"], 0);
    assert_eq!(body["totalVotes"], 1);

    let (_, body) = call(&app, "GET", "/api/voter-status/0xA1", None, None).await;
    assert_eq!(body["registered"], true);
    assert_eq!(body["voted"], true);

    let (_, body) = call(&app, "GET", "/api/blockchain-info", None, None).await;
    assert_eq!(body["latestBlockNumber"], 1);
    assert_eq!(body["chainValid"], true);

    let (_, body) = call(&app, "GET", "/api/blocks/1", None, None).await;
    assert_eq!(body["blocks"].as_array().unwrap().len(), 1);
    assert_eq!(body["blocks"][0]["previousHash"], "0".repeat(64));
    assert!(body["blocks"][0].get("candidateName").is_none());

    let (_, body) = call(&app, "GET", "/api/health", None, None).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["latestBlockNumber"], 1);
    assert_eq!(body["ledgerPersistent"], false);
}

#[tokio::test]
async fn test_snake_case_request_names() {
    let app = app_with_token(None);
    call(&app, "POST", "/api/elections/1/advance", None, None).await;

    let (status, _) = call(&app, "POST", "/api/register-voter", Some(json!({
        "voter_address": "0xB2", "nid": "1234567890123"
    })), None).await;
    assert_eq!(status, StatusCode::OK);

    // election_id omitted: the default election is used.
    let (status, body) = call(&app, "POST", "/api/cast-vote", Some(json!({
        "voter_address": "0xB2", "candidate_name": "Jatiya Party"
    })), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["electionId"], 1);
}

#[tokio::test]
async fn test_rejections_are_typed() {
    let app = app_with_token(None);
    call(&app, "POST", "/api/elections/1/advance", None, None).await;

    let (status, body) = call(&app, "POST", "/api/cast-vote", Some(json!({
        "walletAddress": "0xB2", "electionId": 1, "candidateName": "Jatiya Party"
    })), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorKind"], "NOT_REGISTERED");

    let (status, body) = call(&app, "POST", "/api/register-voter", Some(json!({
        "walletAddress": "0xB2", "nationalId": "12-34"
    })), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorKind"], "INVALID_IDENTITY");

    let (status, body) = call(&app, "GET", "/api/election-results/77", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorKind"], "UNKNOWN_ELECTION");

    let (status, body) = call(&app, "POST", "/api/elections/1/transition", Some(json!({"status": "Upcoming"})), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errorKind"], "INVALID_TRANSITION");

    let (status, body) = call(&app, "POST", "/api/elections/1/transition", Some(json!({"status": "Paused"})), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorKind"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = app_with_token(Some("s3cret"));

    let (status, _) = call(&app, "POST", "/api/elections/1/advance", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "POST", "/api/elections/1/advance", None, Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "POST", "/api/elections/1/advance", None, Some("s3cret")).await;
    assert_eq!(status, StatusCode::OK);

    // Voter routes stay open.
    let (status, _) = call(&app, "GET", "/api/elections", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_election() {
    let app = app_with_token(None);

    let (status, body) = call(&app, "POST", "/api/elections", Some(json!({
        "name": "Dhaka City Corporation",
        "candidates": ["Boat", "Sheaf of Paddy"],
        "opensAt": 100,
        "closesAt": 200
    })), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 2);
    assert_eq!(body["opensAt"], 100);

    let (status, body) = call(&app, "POST", "/api/elections", Some(json!({
        "name": "Empty", "candidates": []
    })), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorKind"], "INVALID_ELECTION");

    let (_, body) = call(&app, "GET", "/api/elections", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["status"], "Upcoming");
}

#[tokio::test]
async fn test_malformed_path_and_query_are_typed() {
    let app = app_with_token(None);

    for uri in [
        "/api/election-results/abc",
        "/api/voter-status/0xA1?election_id=x",
        "/api/blockchain-info?electionId=-1",
        "/api/blocks/first",
        "/api/elections/one",
    ] {
        let (status, body) = call(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["errorKind"], "INVALID_REQUEST", "{}", uri);
        assert_eq!(body["success"], false, "{}", uri);
    }

    let (status, body) = call(&app, "POST", "/api/elections/x/advance", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorKind"], "INVALID_REQUEST");
}
