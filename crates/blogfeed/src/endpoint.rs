//! Feed options and request URL construction

use crate::error::{FeedError, Result};
use crate::params::{FeedParams, ParamKey, MAX_RESULTS_CAP};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Which collection a feed lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    #[default]
    Posts,
    Comments,
    Pages,
}

impl FeedType {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedType::Posts => "posts",
            FeedType::Comments => "comments",
            FeedType::Pages => "pages",
        }
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verbosity of returned entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Truncated content in `summary`
    #[default]
    Summary,
    /// Complete content in `content`
    Full,
}

impl Route {
    pub fn as_str(self) -> &'static str {
        match self {
            Route::Summary => "summary",
            Route::Full => "full",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options describing one feed request sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedOptions {
    /// Blog root, overrides the client default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_url: Option<String>,

    #[serde(default)]
    pub route: Route,

    #[serde(default, rename = "type")]
    pub kind: FeedType,

    #[serde(default, skip_serializing_if = "FeedParams::is_empty")]
    pub params: FeedParams,

    /// Parent post of a comments feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,

    /// Label filter, written as `/-/<label>` path segments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl FeedOptions {
    /// Options for a feed of the given type
    pub fn new(kind: FeedType) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn blog_url(mut self, url: impl Into<String>) -> Self {
        self.blog_url = Some(url.into());
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    pub fn params(mut self, params: FeedParams) -> Self {
        self.params = params;
        self
    }

    pub fn post_id(mut self, post_id: impl Into<String>) -> Self {
        self.post_id = Some(post_id.into());
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Shorthand for setting `max-results`
    pub fn max_results(mut self, n: i64) -> Self {
        self.params.set_max_results(Some(n));
        self
    }

    /// Shorthand for setting the search query
    pub fn query(mut self, q: &str) -> Self {
        self.params.set_query(Some(q));
        self
    }

    /// Copy with defaults filled in (`max-results` of 1 when unset)
    pub fn normalized(&self) -> Self {
        let mut options = self.clone();
        if !options.params.contains(ParamKey::MaxResults) {
            options.params.set_max_results(Some(1));
        }
        options
    }
}

/// Parse and check a blog root URL
pub fn parse_blog_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| FeedError::InvalidBlogUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(FeedError::InvalidBlogUrl(raw.to_string())),
    }
}

/// Build the request URL for a feed, or for one entry of it
///
/// Path shape is `feeds/<type>/<route>[/-/<label>...][/<entry_id>]`. A
/// comments feed scoped to a post puts the post id first:
/// `feeds/<post_id>/comments/<route>`; without `post_id`, a comments
/// `entry_id` is used as that parent. The query holds every present
/// parameter followed by `alt`.
pub fn build_url(base: &Url, options: &FeedOptions, entry_id: Option<&str>) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    let is_comments = options.kind == FeedType::Comments;
    let parent = if is_comments {
        options.post_id.as_deref().or(entry_id)
    } else {
        None
    };
    let suffix = match entry_id {
        Some(_) if is_comments && options.post_id.is_none() => None,
        other => other,
    };

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| FeedError::InvalidBlogUrl(base.to_string()))?;
        segments.pop_if_empty().push("feeds");
        if let Some(parent) = parent {
            segments.push(parent);
        }
        segments
            .push(options.kind.as_str())
            .push(options.route.as_str());
        if !options.categories.is_empty() {
            segments.push("-");
            segments.extend(options.categories.iter());
        }
        if let Some(id) = suffix {
            segments.push(id);
        }
    }

    {
        let mut query = url.query_pairs_mut();
        for (key, value) in options.params.iter() {
            match key {
                ParamKey::Alt => {}
                ParamKey::MaxResults => {
                    let n = options.params.max_results().clamp(1, MAX_RESULTS_CAP);
                    query.append_pair(key.as_str(), &n.to_string());
                }
                _ => {
                    query.append_pair(key.as_str(), &value);
                }
            }
        }
        query.append_pair(ParamKey::Alt.as_str(), options.params.alt().as_str());
    }

    Ok(url)
}
