use std::{fmt::Display, time::Duration};

use reqwest::StatusCode;
use thiserror::Error;

use crate::shared::models::{Symbol, Venue};

/*----- */
// Transport errors
/*----- */
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("HTTP request timed out")]
    HttpTimeout(reqwest::Error),

    /// REST http response error
    #[error("HTTP response (status={0}) error: {1}")]
    HttpResponse(StatusCode, String),

    #[error("Deserialising JSON error: {error} for payload: {payload}")]
    Deserialise {
        error: serde_json::Error,
        payload: String,
    },

    #[error("Serialising JSON error: {0}")]
    Serialise(serde_json::Error),
}

impl From<reqwest::Error> for SocketError {
    fn from(error: reqwest::Error) -> Self {
        match error {
            error if error.is_timeout() => SocketError::HttpTimeout(error),
            error => SocketError::Http(error),
        }
    }
}

impl SocketError {
    /// Transport level failures worth another attempt. Parse failures, request
    /// builder errors and venue rejections (4xx other than 429) are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            SocketError::Http(error) => {
                error.is_connect() || error.is_request() || error.is_timeout()
            }
            SocketError::HttpTimeout(_) => true,
            SocketError::HttpResponse(status, _) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            SocketError::Deserialise { .. } | SocketError::Serialise(_) => false,
        }
    }
}

/*----- */
// Funding errors
/*----- */
#[derive(Debug, Error)]
pub enum FundingError {
    #[error("{venue} source unavailable: {reason}")]
    SourceUnavailable { venue: Venue, reason: String },

    #[error("{venue} has no usable funding rate for {symbol}: {reason}")]
    RateUnavailable {
        venue: Venue,
        symbol: Symbol,
        reason: String,
    },

    #[error("unsupported venue pair: {0}")]
    UnsupportedVenuePair(String),

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("comparison timed out after {0:?}")]
    Timeout(Duration),
}

impl FundingError {
    pub fn source_unavailable(venue: Venue, reason: impl Display) -> Self {
        FundingError::SourceUnavailable {
            venue,
            reason: reason.to_string(),
        }
    }

    pub fn rate_unavailable(venue: Venue, symbol: &Symbol, reason: impl Display) -> Self {
        FundingError::RateUnavailable {
            venue,
            symbol: symbol.clone(),
            reason: reason.to_string(),
        }
    }

    // A rate lookup that still fails on a retryable error has exhausted the
    // client's retries, so the venue is unreachable. Anything else means the
    // venue answered without a usable rate.
    pub fn from_rate_lookup(venue: Venue, symbol: &Symbol, error: SocketError) -> Self {
        if error.is_retryable() {
            FundingError::source_unavailable(venue, error)
        } else {
            FundingError::rate_unavailable(venue, symbol, error)
        }
    }

    pub fn venue(&self) -> Option<Venue> {
        match self {
            FundingError::SourceUnavailable { venue, .. }
            | FundingError::RateUnavailable { venue, .. } => Some(*venue),
            _ => None,
        }
    }
}
