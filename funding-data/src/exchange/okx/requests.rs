use std::borrow::Cow;

use serde::Serialize;

use crate::protocols::http::rest_request::RestRequest;

use super::model::{OkxFundingRate, OkxInstrument, OkxResponse};

/*----- */
// Instruments
/*----- */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentsQuery {
    inst_type: &'static str,
}

#[derive(Debug)]
pub struct InstrumentsRequest {
    query: InstrumentsQuery,
}

impl Default for InstrumentsRequest {
    fn default() -> Self {
        Self {
            query: InstrumentsQuery { inst_type: "SWAP" },
        }
    }
}

impl RestRequest for InstrumentsRequest {
    type Response = OkxResponse<OkxInstrument>;
    type QueryParams = InstrumentsQuery;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/api/v5/public/instruments")
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.query)
    }
}

/*----- */
// Funding rate
/*----- */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateQuery {
    inst_id: String,
}

#[derive(Debug)]
pub struct FundingRateRequest {
    query: FundingRateQuery,
}

impl FundingRateRequest {
    pub fn new(inst_id: String) -> Self {
        Self {
            query: FundingRateQuery { inst_id },
        }
    }
}

impl RestRequest for FundingRateRequest {
    type Response = OkxResponse<OkxFundingRate>;
    type QueryParams = FundingRateQuery;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/api/v5/public/funding-rate")
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.query)
    }
}
