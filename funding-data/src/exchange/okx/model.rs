use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::FundingError,
    shared::{
        de::de_str_u64_epoch_ms_as_datetime_utc,
        models::{FundingQuote, InstrumentSet, Symbol, Venue},
        normalizer::normalize,
        utils::parse_rate,
    },
};

/*----- */
// Response envelope
/*----- */
#[derive(Debug, Deserialize)]
pub struct OkxResponse<T> {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> OkxResponse<T> {
    // Okx reports application errors through a non "0" code
    pub fn into_data(self) -> Result<Vec<T>, String> {
        if self.code != "0" {
            return Err(format!("code {}: {}", self.code, self.msg));
        }

        Ok(self.data)
    }
}

/*----- */
// Instruments
/*----- */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkxInstrument {
    pub inst_id: String,
    pub state: String,
}

pub fn instruments(data: &[OkxInstrument]) -> InstrumentSet {
    data.iter()
        .filter(|instrument| instrument.state == "live")
        .filter_map(|instrument| normalize(Venue::Okx, &instrument.inst_id))
        .collect()
}

/*----- */
// Funding rate
/*----- */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkxFundingRate {
    pub inst_id: String,
    pub funding_rate: String,
    #[serde(deserialize_with = "de_str_u64_epoch_ms_as_datetime_utc")]
    pub ts: DateTime<Utc>,
}

pub fn funding_quote(
    data: Vec<OkxFundingRate>,
    symbol: &Symbol,
) -> Result<FundingQuote, FundingError> {
    let entry = data
        .into_iter()
        .next()
        .ok_or_else(|| FundingError::rate_unavailable(Venue::Okx, symbol, "empty data"))?;

    let rate = parse_rate(&entry.funding_rate).ok_or_else(|| {
        FundingError::rate_unavailable(
            Venue::Okx,
            symbol,
            format!("unusable fundingRate {:?}", entry.funding_rate),
        )
    })?;

    FundingQuote::new(Venue::Okx, symbol.clone(), rate, entry.ts)
}
