//! Conversion from wire types to simplified application objects
//!
//! Unwraps `$t` scalars, parses counters and timestamps, flattens categories
//! and picks out the links callers actually use.

use crate::ids::{extract_id, short_id, IdKind};
use crate::raw::{RawAuthor, RawEntry, RawFeed, RawLink, Text};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entry author
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Simplified post, comment or page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Numeric id extracted from the tag URI
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Public page of the entry (`alternate` link)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Author>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Comment count (`thr$total`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_comments: Option<u64>,
    /// Parent entry id, for comments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    /// `gd$extendedProperty` name/value pairs
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

/// Simplified feed header with its counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    /// Numeric blog id
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Author>,
    /// Labels defined on the blog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    pub total_results: u64,
    pub start_index: u64,
    pub items_per_page: u64,
}

fn text(value: &Option<Text>) -> Option<String> {
    value.as_ref().map(|t| t.value.clone())
}

fn timestamp(value: &Option<Text>) -> Option<DateTime<FixedOffset>> {
    value
        .as_ref()
        .and_then(|t| DateTime::parse_from_rfc3339(t.value.trim()).ok())
}

fn alternate(links: &[RawLink]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel == "alternate")
        .map(|l| l.href.clone())
}

impl From<&RawAuthor> for Author {
    fn from(raw: &RawAuthor) -> Self {
        Self {
            name: text(&raw.name).unwrap_or_default(),
            uri: text(&raw.uri),
            email: text(&raw.email),
            image: raw.image.as_ref().and_then(|i| i.src.clone()),
        }
    }
}

impl From<&RawEntry> for Entry {
    fn from(raw: &RawEntry) -> Self {
        Self {
            id: short_id(raw.id.as_str()),
            title: text(&raw.title).unwrap_or_default(),
            published: timestamp(&raw.published),
            updated: timestamp(&raw.updated),
            summary: text(&raw.summary),
            content: text(&raw.content),
            url: alternate(&raw.link),
            authors: raw.author.iter().map(Author::from).collect(),
            categories: raw.category.iter().map(|c| c.term.clone()).collect(),
            thumbnail: raw.thumbnail.as_ref().map(|t| t.url.clone()),
            total_comments: raw.total_replies.as_ref().and_then(Text::parse),
            in_reply_to: raw
                .in_reply_to
                .as_ref()
                .map(|r| extract_id(&r.reference, IdKind::Post).unwrap_or_else(|| r.reference.clone())),
            properties: raw
                .extended_property
                .iter()
                .map(|p| (p.name.clone(), p.value.clone()))
                .collect(),
        }
    }
}

impl From<&RawFeed> for Blog {
    fn from(raw: &RawFeed) -> Self {
        Self {
            id: extract_id(raw.id.as_str(), IdKind::Blog)
                .unwrap_or_else(|| raw.id.value.clone()),
            title: text(&raw.title).unwrap_or_default(),
            subtitle: text(&raw.subtitle),
            updated: timestamp(&raw.updated),
            url: alternate(&raw.link),
            authors: raw.author.iter().map(Author::from).collect(),
            categories: raw.category_terms(),
            total_results: raw.total_results().unwrap_or(0),
            start_index: raw.start_index().unwrap_or(1),
            items_per_page: raw.items_per_page().unwrap_or(0),
        }
    }
}
