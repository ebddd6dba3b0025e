pub mod model;
pub mod requests;

use async_trait::async_trait;
use requests::{ExchangeInfoRequest, PremiumIndexRequest};

use crate::{
    error::FundingError,
    protocols::http::{
        client::{HttpSettings, RestClient},
        http_parser::StandardHttpParser,
    },
    shared::models::{FundingQuote, InstrumentSet, Symbol, Venue},
};

use super::FundingAdapter;

pub const BINANCE_BASE_HTTP_URL: &str = "https://fapi.binance.com";

/*----- */
// Binance USDⓈ-M futures
/*----- */
#[derive(Debug)]
pub struct BinanceFundingAdapter {
    client: RestClient<StandardHttpParser>,
}

impl BinanceFundingAdapter {
    pub fn new(base_url: impl Into<String>, settings: HttpSettings) -> Self {
        Self {
            client: RestClient::new(base_url, StandardHttpParser, settings),
        }
    }
}

#[async_trait]
impl FundingAdapter for BinanceFundingAdapter {
    fn venue(&self) -> Venue {
        Venue::Binance
    }

    async fn list_instruments(&self) -> Result<InstrumentSet, FundingError> {
        let info = self
            .client
            .execute(&ExchangeInfoRequest)
            .await
            .map_err(|error| FundingError::source_unavailable(Venue::Binance, error))?;

        Ok(info.instruments())
    }

    async fn get_funding_rate(&self, symbol: &Symbol) -> Result<FundingQuote, FundingError> {
        let request = PremiumIndexRequest::new(self.instrument_id(symbol));
        let index = self
            .client
            .execute(&request)
            .await
            .map_err(|error| FundingError::from_rate_lookup(Venue::Binance, symbol, error))?;

        index.into_quote(symbol)
    }
}
