pub mod emitter;
pub mod intent;

use funding_data::{error::SocketError, shared::models::Venue};
use reqwest::StatusCode;
use thiserror::Error;

pub use emitter::{
    ExecutionClient, HttpExecutionClient, LegAck, LegResult, TradeEmitter, TradeOutcome,
};
pub use intent::{ConfirmedIntent, LegRequest, Side, TradeIntent};

/*----- */
// Execution errors
/*----- */
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("no execution endpoint configured for {0}")]
    NoEndpoint(Venue),

    #[error("execution rejected (status={0}): {1}")]
    Rejected(StatusCode, String),

    #[error("execution transport error: {0}")]
    Transport(#[from] SocketError),

    #[error("invalid trade intent: {0}")]
    InvalidIntent(String),
}
