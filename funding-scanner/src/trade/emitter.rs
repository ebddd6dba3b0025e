use std::{collections::HashMap, fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use funding_data::{error::SocketError, shared::models::Venue};
use serde::Serialize;
use tracing::{info, warn};

use super::{intent::LegRequest, ConfirmedIntent, ExecutionError};

/*----- */
// Execution client
/*----- */
#[async_trait]
pub trait ExecutionClient: Send + Sync + Debug {
    /// Forward one leg to its venue's execution service.
    async fn open(&self, leg: &LegRequest) -> Result<LegAck, ExecutionError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegAck {
    pub status: u16,
    pub response: String,
}

/// Posts legs as JSON to a per venue endpoint. Orders are never retried.
#[derive(Debug, Clone)]
pub struct HttpExecutionClient {
    http_client: reqwest::Client,
    endpoints: HashMap<Venue, String>,
    request_timeout: Duration,
}

impl HttpExecutionClient {
    pub fn new(endpoints: HashMap<Venue, String>, request_timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoints,
            request_timeout,
        }
    }
}

#[async_trait]
impl ExecutionClient for HttpExecutionClient {
    async fn open(&self, leg: &LegRequest) -> Result<LegAck, ExecutionError> {
        let endpoint = self
            .endpoints
            .get(&leg.venue)
            .ok_or(ExecutionError::NoEndpoint(leg.venue))?;

        let response = self
            .http_client
            .post(endpoint)
            .timeout(self.request_timeout)
            .json(&leg.payload())
            .send()
            .await
            .map_err(SocketError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(SocketError::from)?;

        if !status.is_success() {
            return Err(ExecutionError::Rejected(status, body));
        }

        Ok(LegAck {
            status: status.as_u16(),
            response: body,
        })
    }
}

/*----- */
// Outcome
/*----- */
#[derive(Debug)]
pub struct LegResult {
    pub leg: LegRequest,
    pub result: Result<LegAck, ExecutionError>,
}

impl LegResult {
    pub fn is_submitted(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum LegStatus<'a> {
    Submitted { ack: &'a LegAck },
    Failed { error: String },
}

#[derive(Serialize)]
struct LegResultView<'a> {
    leg: &'a LegRequest,
    #[serde(flatten)]
    status: LegStatus<'a>,
}

impl Serialize for LegResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let status = match &self.result {
            Ok(ack) => LegStatus::Submitted { ack },
            Err(error) => LegStatus::Failed {
                error: error.to_string(),
            },
        };

        LegResultView {
            leg: &self.leg,
            status,
        }
        .serialize(serializer)
    }
}

/// Both legs are always attempted, each reports on its own. A submitted leg
/// is never unwound when the other fails.
#[derive(Debug, Serialize)]
pub struct TradeOutcome {
    pub long: LegResult,
    pub short: LegResult,
}

impl TradeOutcome {
    pub fn is_complete(&self) -> bool {
        self.long.is_submitted() && self.short.is_submitted()
    }
}

/*----- */
// Trade emitter
/*----- */
#[derive(Debug, Clone)]
pub struct TradeEmitter {
    client: Arc<dyn ExecutionClient>,
}

impl TradeEmitter {
    pub fn new(client: Arc<dyn ExecutionClient>) -> Self {
        Self { client }
    }

    pub async fn submit(&self, intent: ConfirmedIntent) -> TradeOutcome {
        let intent = intent.into_inner();

        let (long, short) = tokio::join!(
            self.client.open(&intent.long),
            self.client.open(&intent.short)
        );

        let outcome = TradeOutcome {
            long: LegResult {
                leg: intent.long,
                result: long,
            },
            short: LegResult {
                leg: intent.short,
                result: short,
            },
        };

        for leg in [&outcome.long, &outcome.short] {
            match &leg.result {
                Ok(ack) => info!(
                    symbol = %intent.symbol,
                    venue = %leg.leg.venue,
                    side = ?leg.leg.side,
                    status = ack.status,
                    "trade leg submitted"
                ),
                Err(error) => warn!(
                    symbol = %intent.symbol,
                    venue = %leg.leg.venue,
                    side = ?leg.leg.side,
                    %error,
                    "trade leg failed"
                ),
            }
        }

        outcome
    }
}
