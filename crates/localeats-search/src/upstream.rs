//! HTTP client for the business-search API.
//!
//! Only the search proxy talks to the upstream directly: it holds the API key.
//! The client refuses any URL outside its configured endpoint so a proxy
//! cannot be turned into an open relay.

use std::time::Duration;

use localeats_core::SearchOutcome;
use reqwest::Client;

use crate::error::SearchError;
use crate::normalize::normalize;
use crate::orchestrator::SearchBackend;
use crate::query::QueryDescriptor;
use crate::retry::retry_with_backoff;
use crate::types::BusinessSearchResponse;

/// Client for `GET /v3/businesses/search`.
///
/// Transient errors (timeouts, 429, 5xx) are retried with exponential
/// back-off up to `max_retries` additional attempts.
pub struct UpstreamClient {
    client: Client,
    api_key: String,
    endpoint: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl UpstreamClient {
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether `api_string` targets the configured endpoint: the endpoint
    /// itself, optionally followed by a query string.
    #[must_use]
    pub fn accepts(&self, api_string: &str) -> bool {
        api_string
            .strip_prefix(self.endpoint.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('?'))
    }

    /// Fetches one page of businesses for a fully-built request URL.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidEndpoint`] if `api_string` is not under the
    ///   configured endpoint (nothing is sent).
    /// - [`SearchError::RateLimited`] on HTTP 429 after all retries.
    /// - [`SearchError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`SearchError::Http`] on network failure after all retries.
    /// - [`SearchError::Deserialize`] if the body is not a search response.
    pub async fn fetch(&self, api_string: &str) -> Result<BusinessSearchResponse, SearchError> {
        if !self.accepts(api_string) {
            return Err(SearchError::InvalidEndpoint {
                url: api_string.to_owned(),
            });
        }

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .get(api_string)
                .header(reqwest::header::AUTHORIZATION, format!("bearer {}", self.api_key))
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(1);
                return Err(SearchError::RateLimited { retry_after_secs });
            }

            if !status.is_success() {
                return Err(SearchError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: self.endpoint.clone(),
                });
            }

            let body = response.text().await?;
            serde_json::from_str::<BusinessSearchResponse>(&body).map_err(|e| {
                SearchError::Deserialize {
                    context: "business search response".to_owned(),
                    source: e,
                }
            })
        })
        .await
    }
}

impl SearchBackend for UpstreamClient {
    async fn search(&self, query: &QueryDescriptor) -> Result<SearchOutcome, SearchError> {
        let response = self.fetch(query.url()).await?;
        Ok(normalize(&response))
    }
}
