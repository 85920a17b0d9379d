//! blogfeed - client for blog-hosting JSON feed APIs
//!
//! This crate talks to the Atom-style JSON feeds a blog exposes for its
//! posts, comments and pages. It builds request URLs, walks paginated feeds,
//! merges partial pages into one result and converts the verbose
//! `{ "$t": ... }` wire format into plain structs.
//!
//! ## Paging
//!
//! [`FeedClient::entries`] (and [`posts`](FeedClient::posts),
//! [`comments_by_id`](FeedClient::comments_by_id)) return a handler that
//! knows the feed's total and fetches pages on demand, forward or counted
//! from the end. [`FeedClient::fetch_raw`] is the underlying fetch and merge
//! loop.
//!
//! ```no_run
//! use blogfeed::{FeedClient, FeedOptions};
//!
//! # async fn run() -> blogfeed::Result<()> {
//! let client = FeedClient::new("https://example.blogspot.com")?;
//! let posts = client.posts(&FeedOptions::default().max_results(10)).await?;
//! println!("{} posts, labels: {:?}", posts.total(), posts.categories());
//!
//! let newest = posts.page(1, false).await?;
//! let oldest = posts.page(1, true).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Helpers
//!
//! - [`Query`] - search query builder for the `q` parameter
//! - [`ParamsBuilder`] - page and offset arithmetic over [`FeedParams`]
//! - [`extract_id`] - numeric ids from tag URIs
//! - [`resize_thumbnail`] - request another size of an entry thumbnail

mod builder;
pub mod client;
mod convert;
mod endpoint;
mod error;
mod feed;
mod handler;
mod ids;
mod params;
mod query;
pub mod raw;
mod thumbnail;
pub mod transport;

#[cfg(test)]
mod testutil;

pub use builder::ParamsBuilder;
pub use client::{FeedClient, FeedClientBuilder, BLOG_URL_ENV};
pub use convert::{Author, Blog, Entry};
pub use endpoint::{build_url, parse_blog_url, FeedOptions, FeedType, Route};
pub use error::{FeedError, Result};
pub use handler::{EntriesHandler, EntryMapper, Page, PostsHandler};
pub use ids::{extract_id, short_id, IdKind};
pub use params::{Alt, DateField, FeedParams, OrderBy, ParamKey, MAX_RESULTS_CAP};
pub use query::Query;
pub use raw::{RawBlog, RawEntry, RawFeed};
pub use thumbnail::{resize_thumbnail, FEED_THUMBNAIL_SIZE};
pub use transport::{ReqwestTransport, Transport, TransportResponse};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = concat!("blogfeed/", env!("CARGO_PKG_VERSION"));
