//! Fluent builder over [`FeedParams`]
//!
//! Adds the derived paging operations: relative index moves, page number to
//! offset translation and reverse paging against a known total.

use crate::params::{coerce_index, Alt, DateField, FeedParams, OrderBy};
use chrono::{DateTime, Utc};

/// Chainable wrapper around a [`FeedParams`]
///
/// Set the page size before calling [`page`](Self::page) or
/// [`repage`](Self::repage); both read the current `max-results`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsBuilder {
    params: FeedParams,
}

impl ParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current parameters
    pub fn params(&self) -> &FeedParams {
        &self.params
    }

    /// Snapshot of the current parameters
    pub fn build(&self) -> FeedParams {
        self.params.clone()
    }

    pub fn into_params(self) -> FeedParams {
        self.params
    }

    /// Set the page size (clamped to the platform cap)
    pub fn max_results(&mut self, n: i64) -> &mut Self {
        self.params.set_max_results(Some(n));
        self
    }

    /// Set the absolute 1-based start offset
    pub fn start(&mut self, n: i64) -> &mut Self {
        self.params.set_start_index(Some(n));
        self
    }

    /// Move the start offset forward by `n`
    pub fn plus_start(&mut self, n: i64) -> &mut Self {
        let current = i64::from(self.params.start_index());
        self.start(current.saturating_add(n))
    }

    /// Move the start offset back by `n`, never below 1
    pub fn minus_start(&mut self, n: i64) -> &mut Self {
        let current = i64::from(self.params.start_index());
        self.start(current.saturating_sub(n))
    }

    /// Point the start offset at a 1-based page number
    ///
    /// `start-index = max(0, page - 1) * max-results + 1`
    pub fn page(&mut self, page: i64) -> &mut Self {
        let size = i64::from(self.params.max_results());
        let offset = page.saturating_sub(1).max(0).saturating_mul(size);
        self.start(offset.saturating_add(1))
    }

    /// Point at a page counted from the end of a collection of `total` items
    ///
    /// The start offset is `total - page * max-results + 1` (at least 1). When
    /// fewer than `max-results` items remain after the page's forward offset,
    /// `max-results` shrinks to that remainder so the request does not run
    /// past the end of the collection.
    pub fn repage(&mut self, total: u64, page: i64) -> &mut Self {
        let size = i64::from(self.params.max_results());
        let total = i64::try_from(total).unwrap_or(i64::MAX);
        let page = page.max(1);
        let span = page.saturating_mul(size);

        let start = total.saturating_sub(span).saturating_add(1);
        let forward = page.saturating_sub(1).saturating_mul(size).saturating_add(1);
        let remaining = total.saturating_sub(forward);
        if remaining < size {
            self.max_results(remaining.max(1));
        }
        self.start(i64::from(coerce_index(start)))
    }

    /// Set or clear a date bound from text (see [`FeedParams::set_date`])
    pub fn date(&mut self, field: DateField, value: Option<&str>) -> &mut Self {
        self.params.set_date(field, value);
        self
    }

    pub fn date_time(&mut self, field: DateField, value: DateTime<Utc>) -> &mut Self {
        self.params.set_date_time(field, Some(value));
        self
    }

    pub fn published_min(&mut self, value: &str) -> &mut Self {
        self.date(DateField::PublishedMin, Some(value))
    }

    pub fn published_max(&mut self, value: &str) -> &mut Self {
        self.date(DateField::PublishedMax, Some(value))
    }

    pub fn updated_min(&mut self, value: &str) -> &mut Self {
        self.date(DateField::UpdatedMin, Some(value))
    }

    pub fn updated_max(&mut self, value: &str) -> &mut Self {
        self.date(DateField::UpdatedMax, Some(value))
    }

    pub fn order_by(&mut self, order: OrderBy) -> &mut Self {
        self.params.set_order_by(Some(order));
        self
    }

    pub fn query(&mut self, query: &str) -> &mut Self {
        self.params.set_query(Some(query));
        self
    }

    pub fn clear_query(&mut self) -> &mut Self {
        self.params.set_query(None);
        self
    }

    pub fn alt(&mut self, alt: Alt) -> &mut Self {
        self.params.set_alt(Some(alt));
        self
    }
}

impl From<FeedParams> for ParamsBuilder {
    fn from(params: FeedParams) -> Self {
        Self { params }
    }
}
