//! Paging handlers
//!
//! A handler wraps one feed and hands out pages of it on demand. It is
//! created with a cheap first request that reads the feed's total, and every
//! [`EntriesHandler::page`] call runs a fresh request sequence.
//!
//! Feeds filtered by a free-text query are handled differently: the server
//! does not paginate query results reliably, so the whole result set is
//! fetched and pages are cut out of it locally.

use crate::builder::ParamsBuilder;
use crate::client::FeedClient;
use crate::convert::{Blog, Entry};
use crate::endpoint::{FeedOptions, FeedType};
use crate::error::{FeedError, Result};
use crate::raw::{RawBlog, RawEntry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Extra per-entry mapping applied after conversion
pub type EntryMapper = Arc<dyn Fn(&RawEntry, Entry) -> Entry + Send + Sync>;

/// One page of converted entries with the feed header it came with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub blog: Blog,
    pub entries: Vec<Entry>,
}

/// Stateful paging facade over one feed
///
/// `total` is read once at creation and never refreshed. Calls to
/// [`page`](Self::page) on the same handler are serialized internally: the
/// handler's parameter builder is locked for the whole request sequence.
pub struct EntriesHandler {
    client: FeedClient,
    options: FeedOptions,
    builder: Mutex<ParamsBuilder>,
    page_size: u32,
    total: u64,
    query_mode: bool,
    mapper: Option<EntryMapper>,
}

impl fmt::Debug for EntriesHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntriesHandler")
            .field("options", &self.options)
            .field("page_size", &self.page_size)
            .field("total", &self.total)
            .field("query_mode", &self.query_mode)
            .field("mapper", &self.mapper.is_some())
            .finish()
    }
}

impl EntriesHandler {
    /// Total entries reported when the handler was created
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `max-results` captured at creation
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of pages of `page_size` covering `total`
    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size))
    }

    /// True when pages are cut from a fetch-all of query results
    pub fn is_query_mode(&self) -> bool {
        self.query_mode
    }

    pub fn options(&self) -> &FeedOptions {
        &self.options
    }

    /// Fetch a 1-based page
    ///
    /// With `reverse`, pages count from the end of the feed and the entries
    /// of the page come back in reverse order, so the oldest entry of the
    /// feed is first on reverse page 1.
    ///
    /// Reverse pages before the start of the feed come back empty without a
    /// request, like forward pages past its end.
    pub async fn page(&self, page_number: i64, reverse: bool) -> Result<Page> {
        if reverse && self.reverse_out_of_range(page_number) {
            debug!(page = page_number, total = self.total, "Reverse page out of range");
            return Ok(Page {
                blog: Blog {
                    total_results: self.total,
                    ..Blog::default()
                },
                entries: Vec::new(),
            });
        }

        let mut builder = self.builder.lock().await;
        builder.max_results(i64::from(self.page_size));
        if reverse {
            builder.repage(self.total, page_number);
        } else {
            builder.page(page_number);
        }
        let params = builder.build();
        debug!(
            page = page_number,
            reverse,
            start_index = params.start_index(),
            max_results = params.max_results(),
            "Fetching page"
        );

        let raw = if self.query_mode {
            let mut raw = self.client.fetch_raw(&self.options, true, None).await?;
            if let Some(feed) = raw.feed.as_mut() {
                let start = usize::try_from(params.start_index() - 1).unwrap_or(usize::MAX);
                let len = usize::try_from(params.max_results()).unwrap_or(usize::MAX);
                let entries: Vec<RawEntry> = feed.entry.drain(..).skip(start).take(len).collect();
                feed.set_start_index(u64::from(params.start_index()));
                feed.set_items_per_page(entries.len() as u64);
                feed.set_total_results(self.total);
                feed.entry = entries;
            }
            raw
        } else {
            let options = FeedOptions {
                params,
                ..self.options.clone()
            };
            self.client.fetch_raw(&options, false, None).await?
        };

        let mut page = self.convert(&raw);
        if reverse {
            page.entries.reverse();
        }
        Ok(page)
    }

    /// True when reverse page `page_number` starts at or before index 0
    fn reverse_out_of_range(&self, page_number: i64) -> bool {
        let skipped = u64::try_from(page_number.saturating_sub(1).max(0)).unwrap_or(u64::MAX);
        skipped.saturating_mul(u64::from(self.page_size)) >= self.total
    }

    fn convert(&self, raw: &RawBlog) -> Page {
        let Some(feed) = raw.feed.as_ref() else {
            return Page::default();
        };
        let entries = feed
            .entry
            .iter()
            .map(|raw_entry| {
                let entry = Entry::from(raw_entry);
                match &self.mapper {
                    Some(mapper) => mapper(raw_entry, entry),
                    None => entry,
                }
            })
            .collect();
        Page {
            blog: Blog::from(feed),
            entries,
        }
    }
}

/// Posts handler that also carries the blog's labels
#[derive(Debug)]
pub struct PostsHandler {
    handler: EntriesHandler,
    categories: Vec<String>,
}

impl PostsHandler {
    /// Labels defined on the blog, as reported by the first response
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn into_inner(self) -> EntriesHandler {
        self.handler
    }
}

impl Deref for PostsHandler {
    type Target = EntriesHandler;

    fn deref(&self) -> &Self::Target {
        &self.handler
    }
}

impl FeedClient {
    /// Create a paging handler for a feed
    pub async fn entries(&self, options: &FeedOptions) -> Result<EntriesHandler> {
        Ok(self.create_handler(options, None).await?.0)
    }

    /// Create a paging handler that post-processes every converted entry
    pub async fn entries_with_mapper<F>(
        &self,
        options: &FeedOptions,
        mapper: F,
    ) -> Result<EntriesHandler>
    where
        F: Fn(&RawEntry, Entry) -> Entry + Send + Sync + 'static,
    {
        Ok(self.create_handler(options, Some(Arc::new(mapper))).await?.0)
    }

    /// Paging handler over posts, with the blog's labels
    pub async fn posts(&self, options: &FeedOptions) -> Result<PostsHandler> {
        let options = FeedOptions {
            kind: FeedType::Posts,
            ..options.clone()
        };
        let (handler, categories) = self.create_handler(&options, None).await?;
        Ok(PostsHandler {
            handler,
            categories,
        })
    }

    /// Paging handler over posts carrying every one of `categories`
    pub async fn posts_by_categories<I, S>(
        &self,
        options: &FeedOptions,
        categories: I,
    ) -> Result<PostsHandler>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let categories: Vec<String> = categories
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if categories.is_empty() {
            return Err(FeedError::Validation(
                "at least one category is required".to_string(),
            ));
        }
        self.posts(&options.clone().categories(categories)).await
    }

    /// Paging handler over the comments of one post
    pub async fn comments_by_id(
        &self,
        options: &FeedOptions,
        post_id: &str,
    ) -> Result<EntriesHandler> {
        let post_id = post_id.trim();
        if post_id.is_empty() {
            return Err(FeedError::Validation("post id must not be empty".to_string()));
        }
        let options = FeedOptions {
            kind: FeedType::Comments,
            post_id: Some(post_id.to_string()),
            ..options.clone()
        };
        self.entries(&options).await
    }

    /// Fetch and convert one entry by id
    pub async fn entry(&self, options: &FeedOptions, id: &str) -> Result<Entry> {
        let raw = self.fetch_raw(options, false, Some(id)).await?;
        raw.entry
            .as_ref()
            .map(Entry::from)
            .ok_or_else(|| FeedError::MissingEntry(id.to_string()))
    }

    async fn create_handler(
        &self,
        options: &FeedOptions,
        mapper: Option<EntryMapper>,
    ) -> Result<(EntriesHandler, Vec<String>)> {
        let options = options.normalized();
        let builder = ParamsBuilder::from(options.params.clone());
        let page_size = builder.params().max_results();
        let query_mode = options.params.query().is_some();

        let (total, categories) = if query_mode {
            let raw = self.fetch_raw(&options, true, None).await?;
            let feed = raw.feed.unwrap_or_default();
            (feed.entry.len() as u64, feed.category_terms())
        } else {
            let mut probe = options.clone();
            probe.params.set_start_index(Some(1));
            probe.params.set_max_results(Some(1));
            let raw = self.fetch_raw(&probe, false, None).await?;
            let feed = raw.feed.unwrap_or_default();
            (feed.total_results().unwrap_or(0), feed.category_terms())
        };
        debug!(total, page_size, query_mode, "Handler created");

        let handler = EntriesHandler {
            client: self.clone(),
            options,
            builder: Mutex::new(builder),
            page_size,
            total,
            query_mode,
            mapper,
        };
        Ok((handler, categories))
    }
}
