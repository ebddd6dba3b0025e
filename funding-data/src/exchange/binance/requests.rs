use std::borrow::Cow;

use serde::Serialize;

use crate::protocols::http::rest_request::RestRequest;

use super::model::{BinanceExchangeInfo, BinancePremiumIndex};

/*----- */
// Exchange info
/*----- */
#[derive(Debug)]
pub struct ExchangeInfoRequest;

impl RestRequest for ExchangeInfoRequest {
    type Response = BinanceExchangeInfo;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/fapi/v1/exchangeInfo")
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }
}

/*----- */
// Premium index
/*----- */
#[derive(Debug, Serialize)]
pub struct PremiumIndexQuery {
    pub symbol: String,
}

#[derive(Debug)]
pub struct PremiumIndexRequest {
    query: PremiumIndexQuery,
}

impl PremiumIndexRequest {
    pub fn new(symbol: String) -> Self {
        Self {
            query: PremiumIndexQuery { symbol },
        }
    }
}

impl RestRequest for PremiumIndexRequest {
    type Response = BinancePremiumIndex;
    type QueryParams = PremiumIndexQuery;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/fapi/v1/premiumIndex")
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.query)
    }
}
