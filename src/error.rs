use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the ledger engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid peer address: {0:?}")]
    InvalidPeerAddress(String),
}

/// Errors reported to HTTP callers. None of them leave partial state behind.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing values: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("malformed request body: {0}")]
    BadPayload(String),

    #[error("please supply a valid list of nodes")]
    MissingNodes,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("no proof found within {0} attempts")]
    MiningExhausted(u64),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_)
            | ApiError::BadPayload(_)
            | ApiError::MissingNodes
            | ApiError::Ledger(_) => StatusCode::BAD_REQUEST,
            ApiError::MiningExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
