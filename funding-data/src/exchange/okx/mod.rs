pub mod model;
pub mod requests;

use async_trait::async_trait;
use requests::{FundingRateRequest, InstrumentsRequest};

use crate::{
    error::FundingError,
    protocols::http::{
        client::{HttpSettings, RestClient},
        http_parser::StandardHttpParser,
    },
    shared::models::{FundingQuote, InstrumentSet, Symbol, Venue},
};

use super::FundingAdapter;

pub const OKX_BASE_HTTP_URL: &str = "https://www.okx.com";

/*----- */
// Okx USDT swaps
/*----- */
#[derive(Debug)]
pub struct OkxFundingAdapter {
    client: RestClient<StandardHttpParser>,
}

impl OkxFundingAdapter {
    pub fn new(base_url: impl Into<String>, settings: HttpSettings) -> Self {
        Self {
            client: RestClient::new(base_url, StandardHttpParser, settings),
        }
    }
}

#[async_trait]
impl FundingAdapter for OkxFundingAdapter {
    fn venue(&self) -> Venue {
        Venue::Okx
    }

    async fn list_instruments(&self) -> Result<InstrumentSet, FundingError> {
        let data = self
            .client
            .execute(&InstrumentsRequest::default())
            .await
            .map_err(|error| FundingError::source_unavailable(Venue::Okx, error))?
            .into_data()
            .map_err(|reason| FundingError::source_unavailable(Venue::Okx, reason))?;

        Ok(model::instruments(&data))
    }

    async fn get_funding_rate(&self, symbol: &Symbol) -> Result<FundingQuote, FundingError> {
        let request = FundingRateRequest::new(self.instrument_id(symbol));
        let data = self
            .client
            .execute(&request)
            .await
            .map_err(|error| FundingError::from_rate_lookup(Venue::Okx, symbol, error))?
            .into_data()
            .map_err(|reason| FundingError::rate_unavailable(Venue::Okx, symbol, reason))?;

        model::funding_quote(data, symbol)
    }
}
