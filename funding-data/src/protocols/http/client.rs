use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use bytes::Bytes;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::SocketError;

use super::{http_parser::HttpParser, rest_request::RestRequest};

/*----- */
// Http settings
/*----- */
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    pub max_retries: usize,
    pub backoff_min: Duration,
    pub backoff_max: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            max_retries: 3,
            backoff_min: Duration::from_millis(200),
            backoff_max: Duration::from_secs(2),
        }
    }
}

/*----- */
// Rest client
/*----- */
#[derive(Debug, Clone)]
pub struct RestClient<Parser> {
    pub http_client: reqwest::Client,
    pub base_url: String,
    pub parser: Parser,
    pub settings: HttpSettings,
}

impl<Parser> RestClient<Parser>
where
    Parser: HttpParser,
{
    pub fn new(base_url: impl Into<String>, parser: Parser, settings: HttpSettings) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            parser,
            settings,
        }
    }

    /// Execute the request, retrying transport failures with exponential
    /// backoff until `max_retries` is spent.
    pub async fn execute<Request>(
        &self,
        request: &Request,
    ) -> Result<Request::Response, SocketError>
    where
        Request: RestRequest,
    {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.settings.backoff_min)
            .with_max_delay(self.settings.backoff_max)
            .with_max_times(self.settings.max_retries)
            .with_jitter();

        (|| self.execute_once(request))
            .retry(backoff)
            .sleep(tokio::time::sleep)
            .when(SocketError::is_retryable)
            .notify(|error: &SocketError, wait: Duration| {
                warn!(
                    base_url = %self.base_url,
                    path = %request.path(),
                    %error,
                    ?wait,
                    "retrying http request"
                );
            })
            .await
    }

    async fn execute_once<Request>(
        &self,
        request: &Request,
    ) -> Result<Request::Response, SocketError>
    where
        Request: RestRequest,
    {
        let request = self.build(request)?;
        let (status, payload) = self.measured_execution(request).await?;
        self.parser.parse::<Request::Response>(status, &payload)
    }

    pub fn build<Request>(&self, request: &Request) -> Result<reqwest::Request, SocketError>
    where
        Request: RestRequest,
    {
        let url = format!("{}{}", self.base_url, request.path());
        let mut builder = self
            .http_client
            .request(Request::method(), url)
            .timeout(self.settings.request_timeout);

        if let Some(query) = request.query_params() {
            builder = builder.query(query);
        }

        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        builder.build().map_err(SocketError::from)
    }

    pub async fn measured_execution(
        &self,
        request: reqwest::Request,
    ) -> Result<(StatusCode, Bytes), SocketError> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let start = std::time::Instant::now();
        let response = self.http_client.execute(request).await?;
        let status = response.status();
        let payload = response.bytes().await?;

        debug!(
            http_method = %method,
            base_url = %self.base_url,
            path,
            status_code = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "http request complete"
        );

        Ok((status, payload))
    }
}
