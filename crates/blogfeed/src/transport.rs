//! HTTP transport used by the feed client
//!
//! The client only needs "GET this URL, give me status and body". The
//! [`Transport`] trait is that seam; [`ReqwestTransport`] is the default
//! implementation and tests plug in their own.

use crate::error::{FeedError, Result};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total request timeout (connect + body)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of a completed GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

/// Performs GET requests for the feed client
///
/// Implementations report any received response as `Ok`, whatever its
/// status; the caller decides which statuses are fatal. `Err` is reserved for
/// requests that produced no response at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<TransportResponse>;
}

/// [`Transport`] backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with the default User-Agent and timeout
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    /// Transport with a custom User-Agent and total timeout
    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/javascript, */*;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(FeedError::ClientBuildError)?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FeedError::from_reqwest)?;

        let status = response.status().as_u16();
        debug!(url = %url, status, "Response received");

        let body = response.text().await.map_err(FeedError::from_reqwest)?;
        Ok(TransportResponse { status, body })
    }
}
