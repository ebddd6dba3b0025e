use chrono::{DateTime, Utc};
use funding_data::{
    error::FundingError,
    shared::models::{FundingQuote, Symbol, Venue},
};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::Serialize;

/*----- */
// Favorable side
/*----- */
/// Venue quoting the higher funding rate. An exactly zero spread is reported
/// as `VenueB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Favorable {
    VenueA,
    VenueB,
}

impl Favorable {
    pub fn from_spread(spread: f64) -> Self {
        if spread > 0.0 {
            Favorable::VenueA
        } else {
            Favorable::VenueB
        }
    }
}

/*----- */
// Comparison record
/*----- */
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    symbol: Symbol,
    rate_a: f64,
    rate_b: f64,
    spread: f64,
    favorable: Favorable,
    observed_at_a: DateTime<Utc>,
    observed_at_b: DateTime<Utc>,
}

impl ComparisonRecord {
    /// Join two quotes for the same symbol, `quote_a` from venue A.
    pub fn new(quote_a: &FundingQuote, quote_b: &FundingQuote) -> Self {
        debug_assert_eq!(quote_a.symbol, quote_b.symbol);

        let spread = quote_a.rate - quote_b.rate;
        Self {
            symbol: quote_a.symbol.clone(),
            rate_a: quote_a.rate,
            rate_b: quote_b.rate,
            spread,
            favorable: Favorable::from_spread(spread),
            observed_at_a: quote_a.observed_at,
            observed_at_b: quote_b.observed_at,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn rate_a(&self) -> f64 {
        self.rate_a
    }

    pub fn rate_b(&self) -> f64 {
        self.rate_b
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn favorable(&self) -> Favorable {
        self.favorable
    }

    pub fn observed_at_a(&self) -> DateTime<Utc> {
        self.observed_at_a
    }

    pub fn observed_at_b(&self) -> DateTime<Utc> {
        self.observed_at_b
    }

    /// Spread scaled to a year of funding periods, display only. Venues settle
    /// on different schedules so the caller picks the period count.
    pub fn annualized_spread(&self, periods_per_year: f64) -> f64 {
        self.spread * periods_per_year
    }
}

/*----- */
// Warnings
/*----- */
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateWarning {
    pub venue: Venue,
    pub symbol: Symbol,
    pub reason: String,
}

impl RateWarning {
    pub fn new(venue: Venue, symbol: Symbol, error: &FundingError) -> Self {
        Self {
            venue,
            symbol,
            reason: error.to_string(),
        }
    }
}

/*----- */
// Comparison
/*----- */
/// Complete result of one aggregation run. Only built once every symbol has
/// been resolved or dropped.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub venue_a: Venue,
    pub venue_b: Venue,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ComparisonRecord>,
    pub warnings: Vec<RateWarning>,
}

impl Comparison {
    pub fn top(&self, n: usize) -> &[ComparisonRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn record(&self, symbol: &Symbol) -> Option<&ComparisonRecord> {
        self.records.iter().find(|record| record.symbol() == symbol)
    }
}

/*----- */
// Ranking
/*----- */
/// Descending absolute spread, ties by symbol ascending.
pub fn rank(records: Vec<ComparisonRecord>) -> Vec<ComparisonRecord> {
    records
        .into_iter()
        .sorted_by(|a, b| {
            OrderedFloat(b.spread.abs())
                .cmp(&OrderedFloat(a.spread.abs()))
                .then_with(|| a.symbol.cmp(&b.symbol))
        })
        .collect()
}
