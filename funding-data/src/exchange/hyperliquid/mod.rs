pub mod model;
pub mod requests;

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use requests::{FundingHistoryRequest, MetaAndAssetCtxsRequest, MetaRequest};
use tracing::debug;

use crate::{
    error::FundingError,
    protocols::http::{
        client::{HttpSettings, RestClient},
        http_parser::StandardHttpParser,
        rate_limit::RateLimiter,
    },
    shared::{
        models::{FundingQuote, FundingRateMap, InstrumentSet, Symbol, Venue},
        normalizer,
        utils::current_timestamp_utc,
    },
};

use super::FundingAdapter;

pub const HYPERLIQUID_BASE_HTTP_URL: &str = "https://api.hyperliquid.xyz";

// Funding settles hourly, a day of history always holds the latest payment
const FUNDING_HISTORY_LOOKBACK: Duration = Duration::from_secs(24 * 60 * 60);

/*----- */
// Hyperliquid perps
/*----- */
#[derive(Debug)]
pub struct HyperliquidFundingAdapter {
    client: RestClient<StandardHttpParser>,
    limiter: RateLimiter,
    // Canonical symbol -> coin name as listed, e.g. KPEPE -> kPEPE
    coin_names: RwLock<HashMap<Symbol, String>>,
}

impl HyperliquidFundingAdapter {
    pub fn new(base_url: impl Into<String>, settings: HttpSettings, limiter: RateLimiter) -> Self {
        Self {
            client: RestClient::new(base_url, StandardHttpParser, settings),
            limiter,
            coin_names: RwLock::new(HashMap::new()),
        }
    }

    fn remember_coin_names<'a>(&self, names: impl IntoIterator<Item = (Symbol, &'a str)>) {
        let mut coin_names = self.coin_names.write();
        for (symbol, name) in names {
            coin_names.insert(symbol, name.to_string());
        }
    }

    async fn snapshot(&self) -> Result<model::HyperliquidSnapshot, FundingError> {
        self.limiter.acquire().await;
        let response = self
            .client
            .execute(&MetaAndAssetCtxsRequest::default())
            .await
            .map_err(|error| FundingError::source_unavailable(Venue::Hyperliquid, error))?;

        let snapshot = model::snapshot(response, Utc::now())?;
        self.remember_coin_names(
            snapshot
                .coin_names
                .iter()
                .map(|(symbol, name)| (symbol.clone(), name.as_str())),
        );

        debug!(
            venue = %Venue::Hyperliquid,
            instruments = snapshot.instruments.len(),
            rates = snapshot.rates.len(),
            "fetched hyperliquid asset contexts"
        );

        Ok(snapshot)
    }
}

#[async_trait]
impl FundingAdapter for HyperliquidFundingAdapter {
    fn venue(&self) -> Venue {
        Venue::Hyperliquid
    }

    async fn list_instruments(&self) -> Result<InstrumentSet, FundingError> {
        self.limiter.acquire().await;
        let meta = self
            .client
            .execute(&MetaRequest::default())
            .await
            .map_err(|error| FundingError::source_unavailable(Venue::Hyperliquid, error))?;

        self.remember_coin_names(meta.listed());
        Ok(meta.listed().map(|(symbol, _)| symbol).collect())
    }

    async fn get_funding_rate(&self, symbol: &Symbol) -> Result<FundingQuote, FundingError> {
        let start_time =
            current_timestamp_utc().saturating_sub(FUNDING_HISTORY_LOOKBACK.as_millis() as u64);
        let request = FundingHistoryRequest::new(self.instrument_id(symbol), start_time);

        self.limiter.acquire().await;
        let entries = self
            .client
            .execute(&request)
            .await
            .map_err(|error| FundingError::from_rate_lookup(Venue::Hyperliquid, symbol, error))?;

        model::latest_funding(entries, symbol)
    }

    fn supports_bulk_rates(&self) -> bool {
        true
    }

    async fn list_all_funding_rates(&self) -> Result<FundingRateMap, FundingError> {
        Ok(self.snapshot().await?.rates)
    }

    // Listing comes from the same snapshot so coins without a current rate
    // are still reported as listed
    async fn list_instruments_with_rates(
        &self,
    ) -> Result<(InstrumentSet, Option<FundingRateMap>), FundingError> {
        let snapshot = self.snapshot().await?;
        Ok((snapshot.instruments, Some(snapshot.rates)))
    }

    fn instrument_id(&self, symbol: &Symbol) -> String {
        self.coin_names
            .read()
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| normalizer::instrument_id(Venue::Hyperliquid, symbol))
    }
}
