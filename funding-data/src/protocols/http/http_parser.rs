use crate::error::SocketError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::error;

pub trait HttpParser {
    type ApiError: DeserializeOwned;

    fn parse<Response>(&self, status: StatusCode, payload: &[u8]) -> Result<Response, SocketError>
    where
        Response: DeserializeOwned,
    {
        // Throttling and server side failures are transport problems whatever
        // the body says, keep them retryable
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SocketError::HttpResponse(
                status,
                String::from_utf8_lossy(payload).into_owned(),
            ));
        }

        // Venue rejections never count as a response, whatever the body holds
        if !status.is_success() {
            return match serde_json::from_slice::<Self::ApiError>(payload) {
                Ok(api_error) => Err(self.parse_api_error(status, api_error)),
                Err(_) => Err(SocketError::HttpResponse(
                    status,
                    String::from_utf8_lossy(payload).into_owned(),
                )),
            };
        }

        // Attempt to deserialise reqwest::Response bytes into Ok(Response)
        let parse_ok_error = match serde_json::from_slice::<Response>(payload) {
            Ok(response) => return Ok(response),
            Err(serde_error) => serde_error,
        };

        // Attempt to deserialise API Error if Ok(Response) deserialisation failed
        let parse_api_error_error = match serde_json::from_slice::<Self::ApiError>(payload) {
            Ok(api_error) => return Err(self.parse_api_error(status, api_error)),
            Err(serde_error) => serde_error,
        };

        // Log errors if failed to deserialise reqwest::Response into Response or API Self::Error
        error!(
            status_code = ?status,
            ?parse_ok_error,
            ?parse_api_error_error,
            response_body = %String::from_utf8_lossy(payload),
            "error deserializing HTTP response"
        );

        Err(SocketError::Deserialise {
            error: parse_ok_error,
            payload: String::from_utf8_lossy(payload).into_owned(),
        })
    }

    // If [`parse`](Self::parse) fails to deserialise the `Ok(Response)`, this function parses
    // to parse the API [`Self::ApiError`] associated with the response.
    fn parse_api_error(&self, status: StatusCode, error: Self::ApiError) -> SocketError;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StandardHttpParser;

impl HttpParser for StandardHttpParser {
    type ApiError = serde_json::Value;

    fn parse_api_error(&self, status: StatusCode, api_error: Self::ApiError) -> SocketError {
        // For simplicity, use serde_json::Value as Error and extract raw String for parsing
        SocketError::HttpResponse(status, api_error.to_string())
    }
}
