//! Feed client and its configuration
//!
//! [`FeedClient`] holds the transport and the default blog URL. The fetch
//! loop (`feed.rs`) and the paging handlers (`handler.rs`) are methods on
//! this type.

use crate::endpoint::{parse_blog_url, FeedOptions};
use crate::error::{FeedError, Result};
use crate::transport::{ReqwestTransport, Transport, DEFAULT_TIMEOUT};
use crate::DEFAULT_USER_AGENT;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Environment variable read by [`FeedClient::from_env`]
pub const BLOG_URL_ENV: &str = "BLOGFEED_BLOG_URL";

/// Client for one blog's (or several blogs') JSON feeds
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct FeedClient {
    pub(crate) transport: Arc<dyn Transport>,
    blog_url: Option<Url>,
}

impl fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedClient")
            .field("blog_url", &self.blog_url.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

impl FeedClient {
    /// Client for `blog_url` with the default transport
    pub fn new(blog_url: &str) -> Result<Self> {
        Self::builder().blog_url(blog_url).build()
    }

    /// Client configured from `BLOGFEED_BLOG_URL`
    pub fn from_env() -> Result<Self> {
        let blog_url = std::env::var(BLOG_URL_ENV).map_err(|_| FeedError::MissingBlogUrl)?;
        Self::new(&blog_url)
    }

    pub fn builder() -> FeedClientBuilder {
        FeedClientBuilder::default()
    }

    /// Default blog root, if one was configured
    pub fn blog_url(&self) -> Option<&Url> {
        self.blog_url.as_ref()
    }

    /// Blog root for a request: the per-call URL, else the client default
    pub(crate) fn resolve_base(&self, options: &FeedOptions) -> Result<Url> {
        match (&options.blog_url, &self.blog_url) {
            (Some(raw), _) => parse_blog_url(raw),
            (None, Some(default)) => Ok(default.clone()),
            (None, None) => Err(FeedError::MissingBlogUrl),
        }
    }
}

/// Builder for [`FeedClient`]
#[derive(Default)]
pub struct FeedClientBuilder {
    blog_url: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl FeedClientBuilder {
    /// Default blog root used when options carry none
    pub fn blog_url(mut self, url: impl Into<String>) -> Self {
        self.blog_url = Some(url.into());
        self
    }

    /// User-Agent for the default transport
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Total request timeout for the default transport
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom transport; `user_agent` and `timeout` are then ignored
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<FeedClient> {
        let blog_url = self.blog_url.as_deref().map(parse_blog_url).transpose()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::with_settings(
                self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
                self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            )?),
        };

        Ok(FeedClient {
            transport,
            blog_url,
        })
    }
}
