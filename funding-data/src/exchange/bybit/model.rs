use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::FundingError,
    shared::{
        de::de_str_u64_epoch_ms_as_datetime_utc,
        models::{FundingQuote, Symbol, Venue},
        normalizer::normalize,
        utils::parse_rate,
    },
};

/*----- */
// Response envelope
/*----- */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitResponse<T> {
    pub ret_code: i64,
    pub ret_msg: String,
    #[serde(default)]
    pub result: Option<T>,
}

impl<T> BybitResponse<T> {
    // Bybit answers application errors with a 200 and a non zero retCode
    pub fn into_result(self) -> Result<T, String> {
        if self.ret_code != 0 {
            return Err(format!("retCode {}: {}", self.ret_code, self.ret_msg));
        }

        self.result
            .ok_or_else(|| String::from("response is missing result"))
    }
}

/*----- */
// Instruments info
/*----- */
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitInstrumentPage {
    #[serde(default)]
    pub list: Vec<BybitInstrument>,
    #[serde(default)]
    pub next_page_cursor: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitInstrument {
    pub symbol: String,
    pub contract_type: String,
    pub status: String,
    pub quote_coin: String,
}

impl BybitInstrument {
    pub fn is_tradable_usdt_perpetual(&self) -> bool {
        self.contract_type == "LinearPerpetual"
            && self.status == "Trading"
            && self.quote_coin == "USDT"
    }
}

impl BybitInstrumentPage {
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.list
            .iter()
            .filter(|instrument| instrument.is_tradable_usdt_perpetual())
            .filter_map(|instrument| normalize(Venue::Bybit, &instrument.symbol))
    }
}

/*----- */
// Funding history
/*----- */
#[derive(Debug, Default, Deserialize)]
pub struct BybitFundingHistory {
    #[serde(default)]
    pub list: Vec<BybitFundingEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitFundingEntry {
    pub symbol: String,
    pub funding_rate: String,
    #[serde(deserialize_with = "de_str_u64_epoch_ms_as_datetime_utc")]
    pub funding_rate_timestamp: DateTime<Utc>,
}

impl BybitFundingHistory {
    pub fn into_quote(self, symbol: &Symbol) -> Result<FundingQuote, FundingError> {
        let latest = self
            .list
            .into_iter()
            .max_by_key(|entry| entry.funding_rate_timestamp)
            .ok_or_else(|| {
                FundingError::rate_unavailable(Venue::Bybit, symbol, "empty funding history")
            })?;

        let rate = parse_rate(&latest.funding_rate).ok_or_else(|| {
            FundingError::rate_unavailable(
                Venue::Bybit,
                symbol,
                format!("unusable fundingRate {:?}", latest.funding_rate),
            )
        })?;

        FundingQuote::new(
            Venue::Bybit,
            symbol.clone(),
            rate,
            latest.funding_rate_timestamp,
        )
    }
}
