use funding_data::shared::models::{Symbol, Venue};
use serde::{Deserialize, Serialize};

use crate::spread::{Comparison, ComparisonRecord};

use super::ExecutionError;

/*----- */
// Legs
/*----- */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegRequest {
    pub venue: Venue,
    pub instrument: String,
    pub side: Side,
    pub size: f64,
}

/// Body posted to an execution endpoint.
#[derive(Debug, Serialize)]
pub struct LegPayload<'a> {
    pub symbol: &'a str,
    pub side: Side,
    pub size: f64,
}

impl LegRequest {
    pub fn payload(&self) -> LegPayload<'_> {
        LegPayload {
            symbol: &self.instrument,
            side: self.side,
            size: self.size,
        }
    }
}

/*----- */
// Trade intent
/*----- */
/// First phase of a two venue position: long on venue a, short on venue b.
/// Nothing is sent until the intent is confirmed and submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub symbol: Symbol,
    pub spread: f64,
    pub long: LegRequest,
    pub short: LegRequest,
}

impl TradeIntent {
    /// `instrument_id` maps the symbol to each venue's native identifier, for
    /// live venues [`crate::aggregator::Aggregator::instrument_id`].
    pub fn new<F>(
        comparison: &Comparison,
        symbol: &Symbol,
        size: f64,
        instrument_id: F,
    ) -> Result<Self, ExecutionError>
    where
        F: Fn(Venue, &Symbol) -> String,
    {
        let record = comparison.record(symbol).ok_or_else(|| {
            ExecutionError::InvalidIntent(format!(
                "{symbol} is not in the {}/{} comparison",
                comparison.venue_a, comparison.venue_b
            ))
        })?;

        Self::from_record(
            comparison.venue_a,
            comparison.venue_b,
            record,
            size,
            instrument_id,
        )
    }

    /// Build from a single record, see [`TradeIntent::new`].
    pub fn from_record<F>(
        venue_a: Venue,
        venue_b: Venue,
        record: &ComparisonRecord,
        size: f64,
        instrument_id: F,
    ) -> Result<Self, ExecutionError>
    where
        F: Fn(Venue, &Symbol) -> String,
    {
        let symbol = record.symbol();
        let intent = Self {
            symbol: symbol.clone(),
            spread: record.spread(),
            long: LegRequest {
                venue: venue_a,
                instrument: instrument_id(venue_a, symbol),
                side: Side::Long,
                size,
            },
            short: LegRequest {
                venue: venue_b,
                instrument: instrument_id(venue_b, symbol),
                side: Side::Short,
                size,
            },
        };

        intent.validate()?;
        Ok(intent)
    }

    /// Second phase. Intents round trip through callers, so the legs are
    /// checked again before anything can be submitted.
    pub fn confirm(self) -> Result<ConfirmedIntent, ExecutionError> {
        self.validate()?;
        Ok(ConfirmedIntent(self))
    }

    fn validate(&self) -> Result<(), ExecutionError> {
        if self.long.venue == self.short.venue {
            return Err(ExecutionError::InvalidIntent(format!(
                "both legs target {}",
                self.long.venue
            )));
        }
        if self.long.side != Side::Long || self.short.side != Side::Short {
            return Err(ExecutionError::InvalidIntent(String::from(
                "legs must be one long and one short",
            )));
        }

        for leg in [&self.long, &self.short] {
            if !leg.size.is_finite() || leg.size <= 0.0 {
                return Err(ExecutionError::InvalidIntent(format!(
                    "invalid size {} for {} leg",
                    leg.size, leg.venue
                )));
            }
            if leg.instrument.trim().is_empty() {
                return Err(ExecutionError::InvalidIntent(format!(
                    "missing instrument for {} leg",
                    leg.venue
                )));
            }
        }

        Ok(())
    }
}

/// Intent the caller has explicitly confirmed, the only input
/// [`super::TradeEmitter::submit`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedIntent(TradeIntent);

impl ConfirmedIntent {
    pub fn intent(&self) -> &TradeIntent {
        &self.0
    }

    pub fn into_inner(self) -> TradeIntent {
        self.0
    }
}
