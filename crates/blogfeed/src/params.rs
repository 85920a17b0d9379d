//! Feed query parameters
//!
//! [`FeedParams`] is the bag of query parameters the feed API understands.
//! Every setter either stores a valid, coerced value or removes the key, so
//! iterating the bag only ever yields parameters that belong in a request URL.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Largest page size the platform serves in one response
pub const MAX_RESULTS_CAP: u32 = 500;

/// Query parameter names, in the order they are written to a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKey {
    MaxResults,
    StartIndex,
    PublishedMin,
    PublishedMax,
    UpdatedMin,
    UpdatedMax,
    OrderBy,
    Query,
    Alt,
}

impl ParamKey {
    /// All keys in URL order
    pub const ALL: [ParamKey; 9] = [
        ParamKey::MaxResults,
        ParamKey::StartIndex,
        ParamKey::PublishedMin,
        ParamKey::PublishedMax,
        ParamKey::UpdatedMin,
        ParamKey::UpdatedMax,
        ParamKey::OrderBy,
        ParamKey::Query,
        ParamKey::Alt,
    ];

    /// Wire name of the parameter
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKey::MaxResults => "max-results",
            ParamKey::StartIndex => "start-index",
            ParamKey::PublishedMin => "published-min",
            ParamKey::PublishedMax => "published-max",
            ParamKey::UpdatedMin => "updated-min",
            ParamKey::UpdatedMax => "updated-max",
            ParamKey::OrderBy => "orderby",
            ParamKey::Query => "q",
            ParamKey::Alt => "alt",
        }
    }

    fn date_field(self) -> Option<DateField> {
        match self {
            ParamKey::PublishedMin => Some(DateField::PublishedMin),
            ParamKey::PublishedMax => Some(DateField::PublishedMax),
            ParamKey::UpdatedMin => Some(DateField::UpdatedMin),
            ParamKey::UpdatedMax => Some(DateField::UpdatedMax),
            _ => None,
        }
    }
}

impl FromStr for ParamKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown feed parameter: {}", s))
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date bound parameters
///
/// `*Min` bounds are inclusive and `*Max` bounds exclusive on the server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    PublishedMin,
    PublishedMax,
    UpdatedMin,
    UpdatedMax,
}

impl DateField {
    pub const ALL: [DateField; 4] = [
        DateField::PublishedMin,
        DateField::PublishedMax,
        DateField::UpdatedMin,
        DateField::UpdatedMax,
    ];

    /// Matching query parameter key
    pub fn key(self) -> ParamKey {
        match self {
            DateField::PublishedMin => ParamKey::PublishedMin,
            DateField::PublishedMax => ParamKey::PublishedMax,
            DateField::UpdatedMin => ParamKey::UpdatedMin,
            DateField::UpdatedMax => ParamKey::UpdatedMax,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Sort order of returned entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Updated,
    Published,
}

impl OrderBy {
    /// Parse a sort order, falling back to [`OrderBy::Updated`]
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "published" => OrderBy::Published,
            _ => OrderBy::Updated,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::Updated => "updated",
            OrderBy::Published => "published",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response format requested from the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alt {
    #[default]
    Json,
    Rss,
    Atom,
}

impl Alt {
    /// Parse a format, falling back to [`Alt::Json`]
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "rss" => Alt::Rss,
            "atom" => Alt::Atom,
            _ => Alt::Json,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Alt::Json => "json",
            Alt::Rss => "rss",
            Alt::Atom => "atom",
        }
    }
}

impl fmt::Display for Alt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable bag of feed query parameters
///
/// Absent fields read back as their defaults (`max-results` and
/// `start-index` as 1, `orderby` as updated, `alt` as json).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, serde_json::Value>")]
pub struct FeedParams {
    max_results: Option<u32>,
    start_index: Option<u32>,
    dates: [Option<String>; 4],
    order_by: Option<OrderBy>,
    query: Option<String>,
    alt: Option<Alt>,
}

impl FeedParams {
    /// Create an empty parameter bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Page size, 1 when unset
    pub fn max_results(&self) -> u32 {
        self.max_results.unwrap_or(1)
    }

    /// 1-based offset of the first entry, 1 when unset
    pub fn start_index(&self) -> u32 {
        self.start_index.unwrap_or(1)
    }

    /// Normalized timestamp of a date bound
    pub fn date(&self, field: DateField) -> Option<&str> {
        self.dates[field.slot()].as_deref()
    }

    pub fn order_by(&self) -> OrderBy {
        self.order_by.unwrap_or_default()
    }

    /// Free-text search query
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn alt(&self) -> Alt {
        self.alt.unwrap_or_default()
    }

    /// Set the page size, clamped to `1..=MAX_RESULTS_CAP`; `None` removes it
    pub fn set_max_results(&mut self, value: Option<i64>) {
        self.max_results = value.map(|n| coerce_index(n).min(MAX_RESULTS_CAP));
    }

    /// Set the start offset, clamped to at least 1; `None` removes it
    pub fn set_start_index(&mut self, value: Option<i64>) {
        self.start_index = value.map(coerce_index);
    }

    /// Set a date bound from text
    ///
    /// The value is parsed and stored as an ISO-8601 UTC timestamp.
    /// Unparsable input is logged and leaves the field unset.
    pub fn set_date(&mut self, field: DateField, value: Option<&str>) {
        let slot = &mut self.dates[field.slot()];
        *slot = match value {
            None => None,
            Some(raw) => {
                let normalized = normalize_date(raw);
                if normalized.is_none() {
                    warn!(param = %field.key(), value = raw, "Ignoring unparsable date");
                }
                normalized
            }
        };
    }

    /// Set a date bound from a timestamp
    pub fn set_date_time(&mut self, field: DateField, value: Option<DateTime<Utc>>) {
        self.dates[field.slot()] = value.map(format_date);
    }

    pub fn set_order_by(&mut self, value: Option<OrderBy>) {
        self.order_by = value;
    }

    /// Set the search query; empty text removes it
    pub fn set_query(&mut self, value: Option<&str>) {
        self.query = value
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
    }

    pub fn set_alt(&mut self, value: Option<Alt>) {
        self.alt = value;
    }

    /// Set any parameter from text, coercing leniently
    ///
    /// Numbers go through integer coercion (non-numeric text becomes 1),
    /// dates through date validation, enums fall back to their defaults.
    pub fn set(&mut self, key: ParamKey, value: Option<&str>) {
        if let Some(field) = key.date_field() {
            self.set_date(field, value);
            return;
        }
        match key {
            ParamKey::MaxResults => self.set_max_results(value.map(|v| parse_index(key, v))),
            ParamKey::StartIndex => self.set_start_index(value.map(|v| parse_index(key, v))),
            ParamKey::OrderBy => self.set_order_by(value.map(OrderBy::parse_lenient)),
            ParamKey::Query => self.set_query(value),
            ParamKey::Alt => self.set_alt(value.map(Alt::parse_lenient)),
            _ => {}
        }
    }

    /// Raw value of a present parameter
    pub fn get(&self, key: ParamKey) -> Option<String> {
        if let Some(field) = key.date_field() {
            return self.date(field).map(str::to_string);
        }
        match key {
            ParamKey::MaxResults => self.max_results.map(|n| n.to_string()),
            ParamKey::StartIndex => self.start_index.map(|n| n.to_string()),
            ParamKey::OrderBy => self.order_by.map(|o| o.to_string()),
            ParamKey::Query => self.query.clone(),
            ParamKey::Alt => self.alt.map(|a| a.to_string()),
            _ => None,
        }
    }

    /// True when the parameter has been set
    pub fn contains(&self, key: ParamKey) -> bool {
        self.get(key).is_some()
    }

    /// Present parameters as `(key, value)` pairs in URL order
    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, String)> + '_ {
        ParamKey::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for FeedParams {
    fn from(map: BTreeMap<String, serde_json::Value>) -> Self {
        let mut params = FeedParams::new();
        for (name, value) in map {
            let key = match name.parse::<ParamKey>() {
                Ok(key) => key,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };
            let text = match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s),
                other => Some(other.to_string()),
            };
            params.set(key, text.as_deref());
        }
        params
    }
}

impl Serialize for FeedParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(n) = self.max_results {
            map.serialize_entry(ParamKey::MaxResults.as_str(), &n)?;
        }
        if let Some(n) = self.start_index {
            map.serialize_entry(ParamKey::StartIndex.as_str(), &n)?;
        }
        for (key, value) in self.iter() {
            if !matches!(key, ParamKey::MaxResults | ParamKey::StartIndex) {
                map.serialize_entry(key.as_str(), &value)?;
            }
        }
        map.end()
    }
}

/// Clamp an integer to a valid 1-based index
pub(crate) fn coerce_index(value: i64) -> u32 {
    value.clamp(1, i64::from(u32::MAX)) as u32
}

/// Parse the leading integer of `value` the lenient way
///
/// `"12"`, `" 12 "` and `"12abc"` give 12; text without a leading integer
/// gives 1.
fn parse_index(key: ParamKey, value: &str) -> i64 {
    let trimmed = value.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(n) => sign * n,
        // all digits but too large for i64
        Err(_) if end > 0 => sign * i64::MAX,
        Err(_) => {
            warn!(param = %key, value, "Non-numeric value, using 1");
            1
        }
    }
}

fn normalize_date(value: &str) -> Option<String> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|n| n.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|n| n.and_utc())
        })
        .map(format_date)
}

fn format_date(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
