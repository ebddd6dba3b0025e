use std::{collections::HashMap, sync::Arc, time::Duration};

use crate::{
    error::FundingError,
    protocols::http::{client::HttpSettings, rate_limit::RateLimiter},
    shared::models::Venue,
};

use super::{
    binance::{BinanceFundingAdapter, BINANCE_BASE_HTTP_URL},
    bybit::{BybitFundingAdapter, BYBIT_BASE_HTTP_URL},
    hyperliquid::{HyperliquidFundingAdapter, HYPERLIQUID_BASE_HTTP_URL},
    okx::{OkxFundingAdapter, OKX_BASE_HTTP_URL},
    FundingAdapter,
};

/*----- */
// Adapter settings
/*----- */
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    pub http: HttpSettings,
    pub base_urls: HashMap<Venue, String>,
    pub hyperliquid_burst: u32,
    pub hyperliquid_refill_interval: Duration,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            http: HttpSettings::default(),
            base_urls: HashMap::new(),
            hyperliquid_burst: 1,
            hyperliquid_refill_interval: Duration::from_millis(100),
        }
    }
}

impl AdapterSettings {
    pub fn base_url(&self, venue: Venue) -> String {
        self.base_urls
            .get(&venue)
            .cloned()
            .unwrap_or_else(|| default_base_url(venue).to_string())
    }
}

pub fn default_base_url(venue: Venue) -> &'static str {
    match venue {
        Venue::Binance => BINANCE_BASE_HTTP_URL,
        Venue::Bybit => BYBIT_BASE_HTTP_URL,
        Venue::Okx => OKX_BASE_HTTP_URL,
        Venue::Hyperliquid => HYPERLIQUID_BASE_HTTP_URL,
    }
}

/*----- */
// Adapter registry
/*----- */
#[derive(Debug, Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<Venue, Arc<dyn FundingAdapter>>,
}

impl AdapterRegistry {
    /// One live adapter per supported venue.
    pub fn new(settings: &AdapterSettings) -> Self {
        let http = settings.http.clone();

        Self::default()
            .with_adapter(Arc::new(BinanceFundingAdapter::new(
                settings.base_url(Venue::Binance),
                http.clone(),
            )))
            .with_adapter(Arc::new(BybitFundingAdapter::new(
                settings.base_url(Venue::Bybit),
                http.clone(),
            )))
            .with_adapter(Arc::new(OkxFundingAdapter::new(
                settings.base_url(Venue::Okx),
                http.clone(),
            )))
            .with_adapter(Arc::new(HyperliquidFundingAdapter::new(
                settings.base_url(Venue::Hyperliquid),
                http,
                RateLimiter::new(
                    settings.hyperliquid_burst,
                    settings.hyperliquid_refill_interval,
                ),
            )))
    }

    /// Register an adapter, replacing any existing one for the same venue.
    pub fn with_adapter(mut self, adapter: Arc<dyn FundingAdapter>) -> Self {
        self.adapters.insert(adapter.venue(), adapter);
        self
    }

    pub fn get(&self, venue: Venue) -> Result<Arc<dyn FundingAdapter>, FundingError> {
        self.adapters.get(&venue).cloned().ok_or_else(|| {
            FundingError::UnsupportedVenuePair(format!("no adapter registered for {venue}"))
        })
    }

    pub fn venues(&self) -> Vec<Venue> {
        let mut venues = self.adapters.keys().copied().collect::<Vec<_>>();
        venues.sort();
        venues
    }
}
