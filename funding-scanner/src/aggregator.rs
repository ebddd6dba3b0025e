use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::Utc;
use funding_data::{
    error::FundingError,
    exchange::{registry::AdapterRegistry, FundingAdapter},
    shared::{
        models::{FundingQuote, FundingRateMap, InstrumentSet, Symbol, Venue},
        normalizer,
    },
};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::spread::{rank, Comparison, ComparisonRecord, RateWarning};

/*----- */
// Aggregator
/*----- */
/// Compares funding across two venues. Per-venue permits bound in-flight rate
/// lookups and are shared by every concurrent `compare`.
#[derive(Debug)]
pub struct Aggregator {
    registry: Arc<AdapterRegistry>,
    permits: HashMap<Venue, Arc<Semaphore>>,
}

impl Aggregator {
    pub fn new(registry: Arc<AdapterRegistry>, max_in_flight_per_venue: usize) -> Self {
        let permits = registry
            .venues()
            .into_iter()
            .map(|venue| {
                (
                    venue,
                    Arc::new(Semaphore::new(max_in_flight_per_venue.max(1))),
                )
            })
            .collect();

        Self { registry, permits }
    }

    pub fn venues(&self) -> Vec<Venue> {
        self.registry.venues()
    }

    /// Venue-native identifier for `symbol`, as the venue's adapter names it.
    pub fn instrument_id(&self, venue: Venue, symbol: &Symbol) -> String {
        self.registry
            .get(venue)
            .map(|adapter| adapter.instrument_id(symbol))
            .unwrap_or_else(|_| normalizer::instrument_id(venue, symbol))
    }

    /// Ranked spread of every symbol listed and priced on both venues.
    ///
    /// Fails only when the pair is unsupported or a listing cannot be
    /// fetched. Symbols whose rate cannot be resolved on either side are
    /// dropped and reported in [`Comparison::warnings`]. Dropping the future
    /// abandons all in-flight venue calls.
    pub async fn compare(
        &self,
        venue_a: Venue,
        venue_b: Venue,
    ) -> Result<Comparison, FundingError> {
        let (side_a, side_b) = self.pair(venue_a, venue_b)?;

        let ((instruments_a, rates_a), (instruments_b, rates_b)) =
            tokio::try_join!(side_a.listing(), side_b.listing())?;

        let symbols = instruments_a.intersection(&instruments_b);
        debug!(
            %venue_a,
            %venue_b,
            listed_a = instruments_a.len(),
            listed_b = instruments_b.len(),
            common = symbols.len(),
            "intersected listings"
        );

        let resolved = join_all(symbols.into_iter().map(|symbol| {
            let side_a = &side_a;
            let side_b = &side_b;
            let rates_a = rates_a.as_ref();
            let rates_b = rates_b.as_ref();

            async move {
                let (quote_a, quote_b) = tokio::join!(
                    side_a.resolve(&symbol, rates_a),
                    side_b.resolve(&symbol, rates_b)
                );
                (symbol, quote_a, quote_b)
            }
        }))
        .await;

        let mut records = Vec::with_capacity(resolved.len());
        let mut warnings = Vec::new();

        for (symbol, quote_a, quote_b) in resolved {
            match (quote_a, quote_b) {
                (Ok(quote_a), Ok(quote_b)) => {
                    records.push(ComparisonRecord::new(&quote_a, &quote_b));
                }
                (quote_a, quote_b) => {
                    for (venue, result) in [(venue_a, quote_a), (venue_b, quote_b)] {
                        if let Err(error) = result {
                            warn!(%venue, %symbol, %error, "dropping symbol without a usable rate");
                            warnings.push(RateWarning::new(venue, symbol.clone(), &error));
                        }
                    }
                }
            }
        }

        info!(
            %venue_a,
            %venue_b,
            records = records.len(),
            warnings = warnings.len(),
            "funding comparison complete"
        );

        Ok(Comparison {
            venue_a,
            venue_b,
            generated_at: Utc::now(),
            records: rank(records),
            warnings,
        })
    }

    /// [`Aggregator::compare`] abandoned after `limit`, leaving no partial
    /// result.
    pub async fn compare_with_timeout(
        &self,
        venue_a: Venue,
        venue_b: Venue,
        limit: Duration,
    ) -> Result<Comparison, FundingError> {
        tokio::time::timeout(limit, self.compare(venue_a, venue_b))
            .await
            .map_err(|_| {
                warn!(%venue_a, %venue_b, ?limit, "funding comparison timed out");
                FundingError::Timeout(limit)
            })?
    }

    /// Spread of one symbol, one rate lookup per side through the same permits
    /// as [`Aggregator::compare`]. No usable rate on either side is an error,
    /// never a zero spread.
    pub async fn compare_symbol(
        &self,
        venue_a: Venue,
        venue_b: Venue,
        symbol: &Symbol,
    ) -> Result<ComparisonRecord, FundingError> {
        let (side_a, side_b) = self.pair(venue_a, venue_b)?;

        let (quote_a, quote_b) =
            tokio::join!(side_a.resolve(symbol, None), side_b.resolve(symbol, None));
        let record = ComparisonRecord::new(&quote_a?, &quote_b?);

        info!(
            %venue_a,
            %venue_b,
            %symbol,
            spread = record.spread(),
            "funding symbol comparison complete"
        );

        Ok(record)
    }

    /// Current listing of one venue.
    pub async fn list_instruments(&self, venue: Venue) -> Result<InstrumentSet, FundingError> {
        let side = self.side(venue)?;
        side.adapter
            .list_instruments()
            .await
            .map_err(|error| side.unavailable(error))
    }

    fn pair(&self, venue_a: Venue, venue_b: Venue) -> Result<(Side, Side), FundingError> {
        if venue_a == venue_b {
            return Err(FundingError::UnsupportedVenuePair(format!(
                "cannot compare {venue_a} against itself"
            )));
        }
        Ok((self.side(venue_a)?, self.side(venue_b)?))
    }

    fn side(&self, venue: Venue) -> Result<Side, FundingError> {
        let adapter = self.registry.get(venue)?;
        let permits = self.permits.get(&venue).cloned().ok_or_else(|| {
            FundingError::UnsupportedVenuePair(format!("no request permits for {venue}"))
        })?;

        Ok(Side {
            venue,
            adapter,
            permits,
        })
    }
}

/*----- */
// One side of a comparison
/*----- */
struct Side {
    venue: Venue,
    adapter: Arc<dyn FundingAdapter>,
    permits: Arc<Semaphore>,
}

impl Side {
    async fn listing(&self) -> Result<(InstrumentSet, Option<FundingRateMap>), FundingError> {
        self.adapter
            .list_instruments_with_rates()
            .await
            .map_err(|error| self.unavailable(error))
    }

    // Any listing failure leaves nothing to compare against
    fn unavailable(&self, error: FundingError) -> FundingError {
        match error {
            unavailable @ FundingError::SourceUnavailable { .. } => unavailable,
            other => FundingError::source_unavailable(self.venue, other),
        }
    }

    async fn resolve(
        &self,
        symbol: &Symbol,
        bulk: Option<&FundingRateMap>,
    ) -> Result<FundingQuote, FundingError> {
        if let Some(rates) = bulk {
            return rates.get(symbol).cloned().ok_or_else(|| {
                FundingError::rate_unavailable(
                    self.venue,
                    symbol,
                    "missing from bulk funding rates",
                )
            });
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|error| FundingError::source_unavailable(self.venue, error))?;

        self.adapter.get_funding_rate(symbol).await
    }
}
