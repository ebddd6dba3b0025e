use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    str::FromStr,
};

use crate::error::FundingError;

use super::normalizer;

/*----- */
// Venues
/*----- */
#[derive(Debug, PartialEq, Hash, Eq, Clone, Copy, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Binance,
    Bybit,
    Okx,
    Hyperliquid,
}

impl Venue {
    pub const ALL: [Venue; 4] = [Venue::Binance, Venue::Bybit, Venue::Okx, Venue::Hyperliquid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::Binance => "binance",
            Venue::Bybit => "bybit",
            Venue::Okx => "okx",
            Venue::Hyperliquid => "hyperliquid",
        }
    }
}

impl Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Venue {
    type Err = FundingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Venue::ALL
            .into_iter()
            .find(|venue| venue.as_str() == name)
            .ok_or_else(|| FundingError::UnsupportedVenuePair(format!("unknown venue {s:?}")))
    }
}

/*----- */
// Canonical symbol
/*----- */
// Only the normalizer builds these, deserialising goes through the same
// canonical check.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub(crate) fn new_unchecked(symbol: String) -> Self {
        Self(symbol)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = FundingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalizer::canonical(s).ok_or_else(|| FundingError::InvalidSymbol(s.to_string()))
    }
}

impl TryFrom<String> for Symbol {
    type Error = FundingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/*----- */
// Instrument set
/*----- */
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentSet(BTreeSet<Symbol>);

impl InstrumentSet {
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.0.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.0.iter()
    }

    /// Symbols listed on both sides, in ascending order.
    pub fn intersection(&self, other: &InstrumentSet) -> Vec<Symbol> {
        self.0.intersection(&other.0).cloned().collect()
    }
}

impl FromIterator<Symbol> for InstrumentSet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/*----- */
// Funding quote
/*----- */
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingQuote {
    pub venue: Venue,
    pub symbol: Symbol,
    pub rate: f64,
    pub observed_at: DateTime<Utc>,
}

impl FundingQuote {
    pub fn new(
        venue: Venue,
        symbol: Symbol,
        rate: f64,
        observed_at: DateTime<Utc>,
    ) -> Result<Self, FundingError> {
        if !rate.is_finite() {
            return Err(FundingError::rate_unavailable(
                venue,
                &symbol,
                format!("non-finite funding rate {rate}"),
            ));
        }

        Ok(Self {
            venue,
            symbol,
            rate,
            observed_at,
        })
    }
}

pub type FundingRateMap = BTreeMap<Symbol, FundingQuote>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_venue_from_str() {
        assert_eq!("binance".parse::<Venue>().unwrap(), Venue::Binance);
        assert_eq!(" OKX ".parse::<Venue>().unwrap(), Venue::Okx);
        assert_eq!("HyperLiquid".parse::<Venue>().unwrap(), Venue::Hyperliquid);
        assert!(matches!(
            "kraken".parse::<Venue>(),
            Err(FundingError::UnsupportedVenuePair(_))
        ));
    }

    #[test]
    fn test_symbol_serde() {
        let symbol: Symbol = serde_json::from_str("\"eth\"").unwrap();
        assert_eq!(symbol.as_str(), "ETH");
        assert_eq!(serde_json::to_string(&symbol).unwrap(), "\"ETH\"");
        assert!(serde_json::from_str::<Symbol>("\"ETH-USDT\"").is_err());
    }

    #[test]
    fn test_instrument_set_intersection_is_sorted() {
        let a: InstrumentSet = ["SOL", "BTC", "ETH"]
            .into_iter()
            .map(|s| s.parse::<Symbol>().unwrap())
            .collect();
        let b: InstrumentSet = ["DOGE", "SOL", "ETH"]
            .into_iter()
            .map(|s| s.parse::<Symbol>().unwrap())
            .collect();

        let common = a.intersection(&b);
        let names = common.iter().map(Symbol::as_str).collect::<Vec<_>>();
        assert_eq!(names, vec!["ETH", "SOL"]);
    }

    #[test]
    fn test_quote_rejects_non_finite_rate() {
        let symbol: Symbol = "BTC".parse().unwrap();
        let quote = FundingQuote::new(Venue::Bybit, symbol, f64::NAN, Utc::now());
        assert!(matches!(quote, Err(FundingError::RateUnavailable { .. })));
    }
}
