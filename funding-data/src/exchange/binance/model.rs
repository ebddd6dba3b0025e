use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::FundingError,
    shared::{
        de::de_u64_epoch_ms_as_datetime_utc,
        models::{FundingQuote, InstrumentSet, Symbol, Venue},
        normalizer::normalize,
        utils::parse_rate,
    },
};

/*----- */
// Exchange info
/*----- */
#[derive(Debug, Deserialize)]
pub struct BinanceExchangeInfo {
    pub symbols: Vec<BinanceContract>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceContract {
    pub symbol: String,
    #[serde(default)]
    pub contract_type: String,
    pub status: String,
    pub quote_asset: String,
}

impl BinanceContract {
    pub fn is_tradable_usdt_perpetual(&self) -> bool {
        self.contract_type == "PERPETUAL" && self.quote_asset == "USDT" && self.status == "TRADING"
    }
}

impl BinanceExchangeInfo {
    pub fn instruments(&self) -> InstrumentSet {
        self.symbols
            .iter()
            .filter(|contract| contract.is_tradable_usdt_perpetual())
            .filter_map(|contract| normalize(Venue::Binance, &contract.symbol))
            .collect()
    }
}

/*----- */
// Premium index
/*----- */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinancePremiumIndex {
    pub symbol: String,
    #[serde(default)]
    pub last_funding_rate: String,
    #[serde(deserialize_with = "de_u64_epoch_ms_as_datetime_utc")]
    pub time: DateTime<Utc>,
}

impl BinancePremiumIndex {
    pub fn into_quote(self, symbol: &Symbol) -> Result<FundingQuote, FundingError> {
        let rate = parse_rate(&self.last_funding_rate).ok_or_else(|| {
            FundingError::rate_unavailable(
                Venue::Binance,
                symbol,
                format!("unusable lastFundingRate {:?}", self.last_funding_rate),
            )
        })?;

        FundingQuote::new(Venue::Binance, symbol.clone(), rate, self.time)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exchange_info_instruments() {
        let payload = r#"{
            "timezone": "UTC",
            "serverTime": 1700000000000,
            "symbols": [
                {"symbol": "BTCUSDT", "pair": "BTCUSDT", "contractType": "PERPETUAL", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "USDT", "marginAsset": "USDT"},
                {"symbol": "ETHUSDT", "pair": "ETHUSDT", "contractType": "PERPETUAL", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "USDT", "marginAsset": "USDT"},
                {"symbol": "BTCUSDT_250627", "pair": "BTCUSDT", "contractType": "CURRENT_QUARTER", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "USDT", "marginAsset": "USDT"},
                {"symbol": "SOLUSDC", "pair": "SOLUSDC", "contractType": "PERPETUAL", "status": "TRADING", "baseAsset": "SOL", "quoteAsset": "USDC", "marginAsset": "USDC"},
                {"symbol": "LUNAUSDT", "pair": "LUNAUSDT", "contractType": "PERPETUAL", "status": "SETTLING", "baseAsset": "LUNA", "quoteAsset": "USDT", "marginAsset": "USDT"}
            ]
        }"#;

        let info = serde_json::from_str::<BinanceExchangeInfo>(payload).unwrap();
        let instruments = info.instruments();
        let names = instruments.iter().map(Symbol::as_str).collect::<Vec<_>>();

        assert_eq!(names, vec!["BTC", "ETH"]);
    }

    #[test]
    fn test_premium_index_quote() {
        let payload = r#"{
            "symbol": "BTCUSDT",
            "markPrice": "11793.63104562",
            "indexPrice": "11781.80495970",
            "lastFundingRate": "0.00038246",
            "interestRate": "0.00010000",
            "nextFundingTime": 1597392000000,
            "time": 1597370495002
        }"#;

        let symbol: Symbol = "BTC".parse().unwrap();
        let quote = serde_json::from_str::<BinancePremiumIndex>(payload)
            .unwrap()
            .into_quote(&symbol)
            .unwrap();

        assert_eq!(quote.venue, Venue::Binance);
        assert_eq!(quote.symbol, symbol);
        assert_eq!(quote.rate, 0.00038246);
        assert_eq!(quote.observed_at.timestamp_millis(), 1597370495002);
    }

    #[test]
    fn test_premium_index_empty_rate_is_unavailable() {
        let payload = r#"{"symbol": "BTCUSDT", "lastFundingRate": "", "time": 1597370495002}"#;

        let symbol: Symbol = "BTC".parse().unwrap();
        let quote = serde_json::from_str::<BinancePremiumIndex>(payload)
            .unwrap()
            .into_quote(&symbol);

        assert!(matches!(quote, Err(FundingError::RateUnavailable { .. })));
    }
}
