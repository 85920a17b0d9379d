//! Wire-format types of the JSON feed API
//!
//! Every scalar leaf arrives wrapped as `{ "$t": "<value>" }`. These types
//! mirror that shape exactly; keys they do not model are kept in `extra` so a
//! response can be written back out unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Wrapped scalar: `{ "$t": "...", "type": "..." }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    #[serde(rename = "$t", default)]
    pub value: String,

    /// Content type for text constructs (`text`, `html`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Parse the wrapped value
    pub fn parse<T: FromStr>(&self) -> Option<T> {
        self.value.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub rel: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAuthor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Text>,
    #[serde(rename = "gd$image", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<RawImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawThumbnail {
    #[serde(rename = "xmlns$media", default, skip_serializing_if = "Option::is_none")]
    pub xmlns: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

/// Parent reference of a comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInReplyTo {
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExtendedProperty {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// One post, comment or page as sent by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub id: Text,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Text>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<RawCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Text>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<RawLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<RawAuthor>,
    #[serde(rename = "media$thumbnail", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<RawThumbnail>,
    #[serde(rename = "thr$total", default, skip_serializing_if = "Option::is_none")]
    pub total_replies: Option<Text>,
    #[serde(rename = "thr$in-reply-to", default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<RawInReplyTo>,
    #[serde(rename = "gd$extendedProperty", default, skip_serializing_if = "Vec::is_empty")]
    pub extended_property: Vec<RawExtendedProperty>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Feed wrapper with its openSearch counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeed {
    #[serde(default)]
    pub id: Text,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Text>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<RawCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<Text>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<RawLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<RawAuthor>,
    #[serde(rename = "openSearch$totalResults", default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<Text>,
    #[serde(rename = "openSearch$startIndex", default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<Text>,
    #[serde(rename = "openSearch$itemsPerPage", default, skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<Text>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<RawEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawFeed {
    /// Reported `openSearch$totalResults`
    pub fn total_results(&self) -> Option<u64> {
        self.total_results.as_ref().and_then(Text::parse)
    }

    /// Reported `openSearch$startIndex`
    pub fn start_index(&self) -> Option<u64> {
        self.start_index.as_ref().and_then(Text::parse)
    }

    /// Reported `openSearch$itemsPerPage`
    pub fn items_per_page(&self) -> Option<u64> {
        self.items_per_page.as_ref().and_then(Text::parse)
    }

    pub fn set_total_results(&mut self, n: u64) {
        self.total_results = Some(Text::new(n.to_string()));
    }

    pub fn set_start_index(&mut self, n: u64) {
        self.start_index = Some(Text::new(n.to_string()));
    }

    pub fn set_items_per_page(&mut self, n: u64) {
        self.items_per_page = Some(Text::new(n.to_string()));
    }

    /// Labels defined on the blog
    pub fn category_terms(&self) -> Vec<String> {
        self.category.iter().map(|c| c.term.clone()).collect()
    }
}

/// Top-level response object
///
/// Feed requests carry `feed`; single-entry requests carry `entry`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<RawFeed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<RawEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
