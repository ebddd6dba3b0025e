pub mod model;
pub mod requests;

use async_trait::async_trait;
use requests::{FundingHistoryRequest, InstrumentsInfoRequest};
use tracing::warn;

use crate::{
    error::FundingError,
    protocols::http::{
        client::{HttpSettings, RestClient},
        http_parser::StandardHttpParser,
    },
    shared::models::{FundingQuote, InstrumentSet, Symbol, Venue},
};

use super::FundingAdapter;

pub const BYBIT_BASE_HTTP_URL: &str = "https://api.bybit.com";

// Linear listings fit in one page today, the cap only guards a cursor loop
const MAX_INSTRUMENT_PAGES: usize = 10;

/*----- */
// Bybit linear perpetuals
/*----- */
#[derive(Debug)]
pub struct BybitFundingAdapter {
    client: RestClient<StandardHttpParser>,
}

impl BybitFundingAdapter {
    pub fn new(base_url: impl Into<String>, settings: HttpSettings) -> Self {
        Self {
            client: RestClient::new(base_url, StandardHttpParser, settings),
        }
    }
}

#[async_trait]
impl FundingAdapter for BybitFundingAdapter {
    fn venue(&self) -> Venue {
        Venue::Bybit
    }

    async fn list_instruments(&self) -> Result<InstrumentSet, FundingError> {
        let mut symbols = Vec::new();
        let mut cursor = None;

        for _ in 0..MAX_INSTRUMENT_PAGES {
            let page = self
                .client
                .execute(&InstrumentsInfoRequest::new(cursor.take()))
                .await
                .map_err(|error| FundingError::source_unavailable(Venue::Bybit, error))?
                .into_result()
                .map_err(|reason| FundingError::source_unavailable(Venue::Bybit, reason))?;

            symbols.extend(page.symbols());

            if page.next_page_cursor.is_empty() {
                return Ok(symbols.into_iter().collect());
            }
            cursor = Some(page.next_page_cursor);
        }

        warn!(
            venue = %Venue::Bybit,
            pages = MAX_INSTRUMENT_PAGES,
            "instrument listing truncated at page limit"
        );
        Ok(symbols.into_iter().collect())
    }

    async fn get_funding_rate(&self, symbol: &Symbol) -> Result<FundingQuote, FundingError> {
        let request = FundingHistoryRequest::new(self.instrument_id(symbol));
        self.client
            .execute(&request)
            .await
            .map_err(|error| FundingError::from_rate_lookup(Venue::Bybit, symbol, error))?
            .into_result()
            .map_err(|reason| FundingError::rate_unavailable(Venue::Bybit, symbol, reason))?
            .into_quote(symbol)
    }
}
