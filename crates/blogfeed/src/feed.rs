//! Raw fetch and merge loop
//!
//! One logical fetch may take several HTTP requests: the server can return
//! fewer entries than asked for, and "all" mode walks the whole feed in
//! chunks of [`MAX_RESULTS_CAP`]. Requests are issued strictly one after the
//! other; their entries are merged into a single [`RawBlog`] whose counters
//! describe the merged result.

use crate::client::FeedClient;
use crate::endpoint::{build_url, FeedOptions};
use crate::error::{FeedError, Result};
use crate::params::MAX_RESULTS_CAP;
use crate::raw::{RawBlog, RawEntry};
use tracing::{debug, warn};
use url::Url;

impl FeedClient {
    /// Fetch a feed, following up until the requested entries are assembled
    ///
    /// - `want_all` ignores the caller's paging and walks the whole feed from
    ///   index 1 in chunks of [`MAX_RESULTS_CAP`] until an empty batch.
    /// - `entry_id` fetches that single entry with one request; the result
    ///   carries `entry` instead of `feed`.
    ///
    /// Otherwise another request follows whenever the last batch was
    /// non-empty but smaller than the remaining budget, asking only for what
    /// is still missing.
    ///
    /// The returned feed reports the start index the sequence began at.
    /// When the merged entry count differs from the first request's
    /// `max-results`, `itemsPerPage` and `totalResults` are rewritten to that
    /// count. Any failed request fails the whole call.
    pub async fn fetch_raw(
        &self,
        options: &FeedOptions,
        want_all: bool,
        entry_id: Option<&str>,
    ) -> Result<RawBlog> {
        let mut options = options.normalized();
        let base = self.resolve_base(&options)?;

        if let Some(id) = entry_id {
            let url = build_url(&base, &options, Some(id))?;
            debug!(url = %url, entry_id = id, "Fetching single entry");
            return self.request(&url).await;
        }

        if want_all {
            options.params.set_start_index(Some(1));
            options.params.set_max_results(Some(i64::from(MAX_RESULTS_CAP)));
        }

        let original_start = options.params.start_index();
        let requested = options.params.max_results();
        let mut remaining = requested;
        let mut accumulated: Vec<RawEntry> = Vec::new();
        let mut head: Option<RawBlog> = None;
        let mut reported_total: Option<u64> = None;
        let mut requests = 0usize;

        loop {
            let url = build_url(&base, &options, None)?;
            let mut blog = self.request(&url).await?;
            requests += 1;

            let batch = blog
                .feed
                .as_mut()
                .map(|feed| std::mem::take(&mut feed.entry))
                .ok_or_else(|| FeedError::MissingFeed(url.to_string()))?;
            let length = u32::try_from(batch.len()).unwrap_or(u32::MAX);
            accumulated.extend(batch);
            if head.is_none() {
                reported_total = blog.feed.as_ref().and_then(|feed| feed.total_results());
                head = Some(blog);
            }

            // more entries than the feed holds: the server is not honoring start-index
            if let Some(total) = reported_total.filter(|_| want_all) {
                if accumulated.len() as u64 > total {
                    warn!(
                        url = %url,
                        total,
                        received = accumulated.len(),
                        "Feed returned more entries than its total, stopping"
                    );
                    accumulated.truncate(usize::try_from(total).unwrap_or(usize::MAX));
                    break;
                }
            }

            if length == 0 || !(want_all || length < remaining) {
                break;
            }
            if !want_all {
                remaining = remaining.saturating_sub(length);
                if remaining == 0 {
                    break;
                }
                options.params.set_max_results(Some(i64::from(remaining)));
            }
            let next_start = options.params.start_index().saturating_add(length);
            options.params.set_start_index(Some(i64::from(next_start)));
            debug!(
                received = length,
                next_start,
                remaining = if want_all { None } else { Some(remaining) },
                "Continuing feed fetch"
            );
        }

        let mut blog = head.unwrap_or_default();
        let count = accumulated.len() as u64;
        let feed = blog.feed.get_or_insert_with(Default::default);
        if count != u64::from(requested) {
            feed.set_items_per_page(count);
            feed.set_total_results(count);
        }
        feed.set_start_index(u64::from(original_start));
        feed.entry = accumulated;

        debug!(requests, entries = count, "Feed assembled");
        Ok(blog)
    }

    /// One GET: non-200 and non-JSON bodies are errors
    async fn request(&self, url: &Url) -> Result<RawBlog> {
        debug!(url = %url, "GET feed");
        let response = self.transport.get(url).await?;
        if response.status != 200 {
            return Err(FeedError::Status {
                status: response.status,
                url: url.to_string(),
            });
        }
        serde_json::from_str(&response.body).map_err(|source| FeedError::Parse {
            source,
            body: response.body,
        })
    }
}
