//! Client side of the internal request bridge.
//!
//! The orchestrator never sees the API key. It hands the built upstream URL to
//! the search proxy (`POST /api/search/restaurants`) and gets normalized
//! records back.

use std::time::Duration;

use localeats_core::SearchOutcome;
use reqwest::Client;

use crate::error::SearchError;
use crate::orchestrator::SearchBackend;
use crate::query::QueryDescriptor;
use crate::types::{BridgeRequest, BridgeResponse};

pub struct BridgeClient {
    client: Client,
    proxy_url: String,
}

impl BridgeClient {
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(proxy_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            proxy_url: proxy_url.to_owned(),
        })
    }

    #[must_use]
    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }

    /// Sends one upstream URL through the proxy.
    ///
    /// A 2xx reply with zero (or missing) `numberOfHits` is
    /// [`SearchOutcome::NoResults`].
    ///
    /// # Errors
    ///
    /// - [`SearchError::ProxyRejected`] on HTTP 422, carrying the proxy's message.
    /// - [`SearchError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`SearchError::Http`] on network failure.
    /// - [`SearchError::Deserialize`] if a 2xx body is not a bridge response.
    pub async fn forward(&self, api_string: &str) -> Result<SearchOutcome, SearchError> {
        let request = BridgeRequest {
            api_string: api_string.to_owned(),
        };
        let response = self.client.post(&self.proxy_url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            let message = serde_json::from_str::<BridgeResponse>(&body)
                .map_or(body, |reply| reply.message);
            return Err(SearchError::ProxyRejected { message });
        }

        if !status.is_success() {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.proxy_url.clone(),
            });
        }

        let reply = serde_json::from_str::<BridgeResponse>(&body).map_err(|e| {
            SearchError::Deserialize {
                context: format!("bridge response from {}", self.proxy_url),
                source: e,
            }
        })?;

        Ok(match reply.number_of_hits {
            Some(total_hits) if total_hits > 0 => SearchOutcome::Success {
                records: reply.results.unwrap_or_default(),
                total_hits,
            },
            _ => SearchOutcome::NoResults,
        })
    }
}

impl SearchBackend for BridgeClient {
    async fn search(&self, query: &QueryDescriptor) -> Result<SearchOutcome, SearchError> {
        self.forward(query.url()).await
    }
}
