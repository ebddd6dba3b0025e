pub mod handlers;

use std::sync::Arc;

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use funding_data::error::FundingError;
use thiserror::Error;

use crate::{
    aggregator::Aggregator,
    config::ScannerConfig,
    trade::{ExecutionError, TradeEmitter},
};

/*----- */
// App state
/*----- */
#[derive(Debug)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub emitter: TradeEmitter,
    pub config: ScannerConfig,
}

impl AppState {
    pub fn new(aggregator: Arc<Aggregator>, emitter: TradeEmitter, config: ScannerConfig) -> Self {
        Self {
            aggregator,
            emitter,
            config,
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::get_venues_handler)
        .service(handlers::get_venue_instruments_handler)
        .service(handlers::get_compare_handler)
        .service(handlers::get_compare_symbol_handler)
        .service(handlers::post_trade_intent_handler)
        .service(handlers::post_submit_trade_intent_handler);
}

/*----- */
// Api errors
/*----- */
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Funding(#[from] FundingError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Funding(FundingError::UnsupportedVenuePair(_))
            | ApiError::Funding(FundingError::InvalidSymbol(_)) => StatusCode::BAD_REQUEST,
            ApiError::Funding(FundingError::RateUnavailable { .. }) => StatusCode::NOT_FOUND,
            ApiError::Funding(FundingError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Funding(_) => StatusCode::BAD_GATEWAY,
            ApiError::Execution(ExecutionError::InvalidIntent(_))
            | ApiError::Execution(ExecutionError::NoEndpoint(_)) => StatusCode::BAD_REQUEST,
            ApiError::Execution(_) => StatusCode::BAD_GATEWAY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
