//! Error types for blogfeed

use thiserror::Error;

/// Errors that can occur while building requests or fetching feeds
#[derive(Debug, Error)]
pub enum FeedError {
    /// No blog URL was supplied per call or as a client default
    #[error("Missing required parameter: blog url")]
    MissingBlogUrl,

    /// Blog URL could not be parsed or uses an unsupported scheme
    #[error("Invalid blog url '{0}': must be an absolute http:// or https:// URL")]
    InvalidBlogUrl(String),

    /// Unknown kind passed to the id extraction helper
    #[error("Invalid id kind '{0}': must be one of blog, post, page, comment")]
    InvalidIdKind(String),

    /// Caller-supplied arguments rejected before any request was made
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Upstream answered with anything other than 200
    #[error("Feed request failed with HTTP {status}: {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Response body was not valid JSON (or not the expected shape)
    #[error("Failed to parse feed response: {source}; body: {body}")]
    Parse {
        #[source]
        source: serde_json::Error,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Response parsed but carried no `feed` object
    #[error("Feed response is missing the feed object: {0}")]
    MissingFeed(String),

    /// Single-entry response parsed but carried no `entry` object
    #[error("Entry response is missing the entry object: {0}")]
    MissingEntry(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl FeedError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout
        } else if err.is_connect() {
            FeedError::ConnectError(err)
        } else {
            FeedError::RequestError(err.to_string())
        }
    }

    /// True for failures caused by how the library was configured or called
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            FeedError::MissingBlogUrl
                | FeedError::InvalidBlogUrl(_)
                | FeedError::InvalidIdKind(_)
                | FeedError::Validation(_)
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = FeedError> = std::result::Result<T, E>;
