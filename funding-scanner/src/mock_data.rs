/*----- */
// Test utils
/*----- */
pub mod test_utils {
    use std::{
        collections::{BTreeMap, HashMap, HashSet},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use funding_data::{
        error::FundingError,
        exchange::{registry::AdapterRegistry, FundingAdapter},
        shared::{
            models::{FundingQuote, FundingRateMap, InstrumentSet, Symbol, Venue},
            normalizer,
        },
    };

    pub fn observed_at() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    pub fn symbol(raw: &str) -> Symbol {
        raw.parse().unwrap()
    }

    /// In memory venue with fixed listings and rates.
    #[derive(Debug)]
    pub struct FixtureAdapter {
        venue: Venue,
        instruments: Vec<Symbol>,
        rates: BTreeMap<Symbol, f64>,
        failing: HashSet<Symbol>,
        instrument_ids: HashMap<Symbol, String>,
        listing_fails: bool,
        bulk: bool,
        delay: Duration,
        listing_calls: AtomicUsize,
        rate_calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FixtureAdapter {
        pub fn new(venue: Venue) -> Self {
            Self {
                venue,
                instruments: Vec::new(),
                rates: BTreeMap::new(),
                failing: HashSet::new(),
                instrument_ids: HashMap::new(),
                listing_fails: false,
                bulk: false,
                delay: Duration::ZERO,
                listing_calls: AtomicUsize::new(0),
                rate_calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        /// Listed symbols with a published rate.
        pub fn with_rates(mut self, rates: &[(&str, f64)]) -> Self {
            for (raw, rate) in rates {
                let symbol = symbol(raw);
                self.instruments.push(symbol.clone());
                self.rates.insert(symbol, *rate);
            }
            self
        }

        /// Listed symbols without any rate.
        pub fn with_unpriced(mut self, symbols: &[&str]) -> Self {
            self.instruments.extend(symbols.iter().map(|raw| symbol(raw)));
            self
        }

        /// Listed symbols whose lookups fail at the transport level.
        pub fn with_failing(mut self, symbols: &[&str]) -> Self {
            self.failing.extend(symbols.iter().map(|raw| symbol(raw)));
            self
        }

        /// Venue-native id that differs from the normalizer's inverse.
        pub fn with_instrument_id(mut self, raw: &str, instrument_id: &str) -> Self {
            self.instrument_ids
                .insert(symbol(raw), instrument_id.to_string());
            self
        }

        pub fn with_listing_failure(mut self) -> Self {
            self.listing_fails = true;
            self
        }

        pub fn with_bulk_rates(mut self) -> Self {
            self.bulk = true;
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn rate_calls(&self) -> usize {
            self.rate_calls.load(Ordering::SeqCst)
        }

        pub fn listing_calls(&self) -> usize {
            self.listing_calls.load(Ordering::SeqCst)
        }

        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        fn quote(&self, symbol: &Symbol) -> Result<FundingQuote, FundingError> {
            if self.failing.contains(symbol) {
                return Err(FundingError::source_unavailable(
                    self.venue,
                    "connection reset",
                ));
            }

            match self.rates.get(symbol) {
                Some(rate) => FundingQuote::new(self.venue, symbol.clone(), *rate, observed_at()),
                None => Err(FundingError::rate_unavailable(
                    self.venue,
                    symbol,
                    "no current funding rate",
                )),
            }
        }
    }

    #[async_trait]
    impl FundingAdapter for FixtureAdapter {
        fn venue(&self) -> Venue {
            self.venue
        }

        async fn list_instruments(&self) -> Result<InstrumentSet, FundingError> {
            self.listing_calls.fetch_add(1, Ordering::SeqCst);
            if self.listing_fails {
                return Err(FundingError::source_unavailable(
                    self.venue,
                    "HTTP request timed out",
                ));
            }

            Ok(self
                .instruments
                .iter()
                .chain(self.failing.iter())
                .cloned()
                .collect())
        }

        async fn get_funding_rate(&self, symbol: &Symbol) -> Result<FundingQuote, FundingError> {
            self.rate_calls.fetch_add(1, Ordering::SeqCst);
            let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.quote(symbol)
        }

        fn supports_bulk_rates(&self) -> bool {
            self.bulk
        }

        async fn list_all_funding_rates(&self) -> Result<FundingRateMap, FundingError> {
            Ok(self
                .rates
                .keys()
                .filter_map(|symbol| {
                    self.quote(symbol)
                        .ok()
                        .map(|quote| (symbol.clone(), quote))
                })
                .collect())
        }

        async fn list_instruments_with_rates(
            &self,
        ) -> Result<(InstrumentSet, Option<FundingRateMap>), FundingError> {
            let instruments = self.list_instruments().await?;
            let rates = match self.bulk {
                true => Some(self.list_all_funding_rates().await?),
                false => None,
            };
            Ok((instruments, rates))
        }

        fn instrument_id(&self, symbol: &Symbol) -> String {
            self.instrument_ids
                .get(symbol)
                .cloned()
                .unwrap_or_else(|| normalizer::instrument_id(self.venue, symbol))
        }
    }

    pub fn registry(adapters: Vec<Arc<FixtureAdapter>>) -> Arc<AdapterRegistry> {
        Arc::new(
            adapters
                .into_iter()
                .fold(AdapterRegistry::default(), |registry, adapter| {
                    registry.with_adapter(adapter)
                }),
        )
    }
}
