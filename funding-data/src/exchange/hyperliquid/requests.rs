use std::borrow::Cow;

use serde::Serialize;

use crate::protocols::http::rest_request::RestRequest;

use super::model::{HyperliquidFundingEntry, HyperliquidMeta, HyperliquidMetaAndAssetCtxs};

const INFO_PATH: &str = "/info";

/*----- */
// Info request body
/*----- */
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoRequestBody {
    Meta,
    MetaAndAssetCtxs,
    FundingHistory {
        coin: String,
        #[serde(rename = "startTime")]
        start_time: u64,
    },
}

/*----- */
// Meta
/*----- */
#[derive(Debug)]
pub struct MetaRequest {
    body: InfoRequestBody,
}

impl Default for MetaRequest {
    fn default() -> Self {
        Self {
            body: InfoRequestBody::Meta,
        }
    }
}

impl RestRequest for MetaRequest {
    type Response = HyperliquidMeta;
    type QueryParams = ();
    type Body = InfoRequestBody;

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed(INFO_PATH)
    }

    fn method() -> reqwest::Method {
        reqwest::Method::POST
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(&self.body)
    }
}

/*----- */
// Meta and asset contexts
/*----- */
#[derive(Debug)]
pub struct MetaAndAssetCtxsRequest {
    body: InfoRequestBody,
}

impl Default for MetaAndAssetCtxsRequest {
    fn default() -> Self {
        Self {
            body: InfoRequestBody::MetaAndAssetCtxs,
        }
    }
}

impl RestRequest for MetaAndAssetCtxsRequest {
    type Response = HyperliquidMetaAndAssetCtxs;
    type QueryParams = ();
    type Body = InfoRequestBody;

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed(INFO_PATH)
    }

    fn method() -> reqwest::Method {
        reqwest::Method::POST
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(&self.body)
    }
}

/*----- */
// Funding history
/*----- */
#[derive(Debug)]
pub struct FundingHistoryRequest {
    body: InfoRequestBody,
}

impl FundingHistoryRequest {
    pub fn new(coin: String, start_time: u64) -> Self {
        Self {
            body: InfoRequestBody::FundingHistory { coin, start_time },
        }
    }
}

impl RestRequest for FundingHistoryRequest {
    type Response = Vec<HyperliquidFundingEntry>;
    type QueryParams = ();
    type Body = InfoRequestBody;

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed(INFO_PATH)
    }

    fn method() -> reqwest::Method {
        reqwest::Method::POST
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(&self.body)
    }
}
