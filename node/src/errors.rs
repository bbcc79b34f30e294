// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use ballot_kernel::error::{ErrorKind, LedgerError};
use ballot_persistence::EventLogError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Invalid request: {0}")]
    InvalidInput(String),
    #[error("Event log unavailable: {0}")]
    EventLog(#[from] EventLogError),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Ledger(e) => match e.kind() {
                ErrorKind::InvalidIdentity
                | ErrorKind::NotRegistered
                | ErrorKind::UnknownCandidate
                | ErrorKind::InvalidElection => StatusCode::BAD_REQUEST,
                ErrorKind::UnknownElection => StatusCode::NOT_FOUND,
                ErrorKind::AlreadyRegistered
                | ErrorKind::AlreadyVoted
                | ErrorKind::ElectionNotActive
                | ErrorKind::InvalidTransition => StatusCode::CONFLICT,
                ErrorKind::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::LedgerCorrupt => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::EventLog(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Ledger(e) => e.kind().as_str(),
            ServiceError::InvalidInput(_) => "INVALID_REQUEST",
            ServiceError::EventLog(_) => ErrorKind::StorageUnavailable.as_str(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        match self {
            ServiceError::Ledger(e) => e.is_fatal(),
            ServiceError::InvalidInput(_) => false,
            ServiceError::EventLog(_) => true,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.is_fatal() {
            tracing::error!(kind = self.kind(), "Request failed: {}", self);
        }

        let body = Json(json!({
            "success": false,
            "errorKind": self.kind(),
            "error": self.to_string(),
            "fatal": self.is_fatal(),
        }));

        (status, body).into_response()
    }
}
