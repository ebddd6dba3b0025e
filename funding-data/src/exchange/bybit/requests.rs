use std::borrow::Cow;

use serde::Serialize;

use crate::protocols::http::rest_request::RestRequest;

use super::model::{BybitFundingHistory, BybitInstrumentPage, BybitResponse};

const LINEAR_CATEGORY: &str = "linear";
const INSTRUMENT_PAGE_LIMIT: u32 = 1000;

/*----- */
// Instruments info
/*----- */
#[derive(Debug, Serialize)]
pub struct InstrumentsInfoQuery {
    category: &'static str,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

#[derive(Debug)]
pub struct InstrumentsInfoRequest {
    query: InstrumentsInfoQuery,
}

impl InstrumentsInfoRequest {
    pub fn new(cursor: Option<String>) -> Self {
        Self {
            query: InstrumentsInfoQuery {
                category: LINEAR_CATEGORY,
                limit: INSTRUMENT_PAGE_LIMIT,
                cursor,
            },
        }
    }
}

impl RestRequest for InstrumentsInfoRequest {
    type Response = BybitResponse<BybitInstrumentPage>;
    type QueryParams = InstrumentsInfoQuery;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/v5/market/instruments-info")
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.query)
    }
}

/*----- */
// Funding history
/*----- */
#[derive(Debug, Serialize)]
pub struct FundingHistoryQuery {
    category: &'static str,
    symbol: String,
    limit: u32,
}

#[derive(Debug)]
pub struct FundingHistoryRequest {
    query: FundingHistoryQuery,
}

impl FundingHistoryRequest {
    pub fn new(symbol: String) -> Self {
        Self {
            query: FundingHistoryQuery {
                category: LINEAR_CATEGORY,
                symbol,
                limit: 1,
            },
        }
    }
}

impl RestRequest for FundingHistoryRequest {
    type Response = BybitResponse<BybitFundingHistory>;
    type QueryParams = FundingHistoryQuery;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/v5/market/funding/history")
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.query)
    }
}
