use serde::{de::DeserializeOwned, Serialize};

pub trait RestRequest {
    type Response: DeserializeOwned;
    type QueryParams: Serialize;
    type Body: Serialize;

    fn path(&self) -> std::borrow::Cow<'static, str>;

    fn method() -> reqwest::Method;

    fn query_params(&self) -> Option<&Self::QueryParams> {
        None
    }

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}
