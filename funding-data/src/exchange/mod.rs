pub mod binance;
pub mod bybit;
pub mod hyperliquid;
pub mod okx;
pub mod registry;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    error::FundingError,
    shared::{
        models::{FundingQuote, FundingRateMap, InstrumentSet, Symbol, Venue},
        normalizer,
    },
};

/*----- */
// Funding adapter
/*----- */
/// Uniform view of one venue's perpetual listings and funding rates. Venue
/// response schemas never leak past an implementation of this trait.
#[async_trait]
pub trait FundingAdapter: Send + Sync + Debug {
    fn venue(&self) -> Venue;

    /// USD stablecoin margined perpetuals currently listed on the venue.
    async fn list_instruments(&self) -> Result<InstrumentSet, FundingError>;

    /// Most recent published funding rate for one symbol.
    async fn get_funding_rate(&self, symbol: &Symbol) -> Result<FundingQuote, FundingError>;

    fn supports_bulk_rates(&self) -> bool {
        false
    }

    async fn list_all_funding_rates(&self) -> Result<FundingRateMap, FundingError> {
        Err(FundingError::source_unavailable(
            self.venue(),
            "bulk funding rates are not supported",
        ))
    }

    /// Listing plus, for bulk venues, every rate from the same round trip.
    async fn list_instruments_with_rates(
        &self,
    ) -> Result<(InstrumentSet, Option<FundingRateMap>), FundingError> {
        if self.supports_bulk_rates() {
            let rates = self.list_all_funding_rates().await?;
            let instruments = rates.keys().cloned().collect();
            Ok((instruments, Some(rates)))
        } else {
            Ok((self.list_instruments().await?, None))
        }
    }

    /// Venue-native identifier used when talking to the venue about `symbol`.
    fn instrument_id(&self, symbol: &Symbol) -> String {
        normalizer::instrument_id(self.venue(), symbol)
    }
}
