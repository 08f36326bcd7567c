//! Status queries against the remote authority.
//!
//! # Responsibilities
//! - Expand the endpoint template for an identifier
//! - Issue one uncached GET per query, with a per-request timeout
//! - Turn the response into a `StatusPayload` or a transient `PollError`

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::Client;

use crate::config::EndpointConfig;
use crate::poller::status::{CorrelationId, PollError, PollResult, StatusPayload};

/// Anything that can answer "what is the status of this operation now?".
pub trait StatusSource {
    /// Query the current status. Must never serve a cached answer.
    fn query(&self, id: &CorrelationId) -> impl Future<Output = PollResult<StatusPayload>>;
}

/// HTTP status client.
#[derive(Debug, Clone)]
pub struct HttpStatusClient {
    client: Client,
    endpoint: EndpointConfig,
}

impl HttpStatusClient {
    /// Create a client for the given endpoint template.
    pub fn new(endpoint: EndpointConfig) -> PollResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(endpoint.request_timeout_secs))
            .user_agent(format!("status-poller/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint })
    }
}

impl StatusSource for HttpStatusClient {
    async fn query(&self, id: &CorrelationId) -> PollResult<StatusPayload> {
        let url = self.endpoint.status_url(id.as_str())?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        StatusPayload::from_json(&body)
    }
}
