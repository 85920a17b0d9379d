//! Shared fixtures for unit tests

use crate::error::Result;
use crate::transport::{Transport, TransportResponse};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

pub(crate) const BLOG: &str = "https://example.blogspot.com";

/// Post entry numbered `n`, in wire format
pub(crate) fn entry_json(n: u64) -> Value {
    json!({
        "id": {"$t": format!("tag:blogger.com,1999:blog-100.post-{}", n)},
        "published": {"$t": "2024-01-02T10:00:00.000-08:00"},
        "updated": {"$t": "2024-01-03T11:30:00.000-08:00"},
        "category": [{"scheme": "http://www.blogger.com/atom/ns#", "term": "Rust"}],
        "title": {"type": "text", "$t": format!("Post {}", n)},
        "summary": {"type": "text", "$t": format!("Summary {}", n)},
        "link": [
            {"rel": "replies", "type": "text/html", "href": format!("https://example.blogspot.com/2024/01/post-{}.html#comment-form", n), "title": "2 Comments"},
            {"rel": "alternate", "type": "text/html", "href": format!("https://example.blogspot.com/2024/01/post-{}.html", n), "title": format!("Post {}", n)}
        ],
        "author": [{
            "name": {"$t": "Ada"},
            "uri": {"$t": "https://www.blogger.com/profile/1"},
            "email": {"$t": "noreply@blogger.com"},
            "gd$image": {"rel": "http://schemas.google.com/g/2005#thumbnail", "width": "16", "height": "16", "src": "https://img/b16-rounded.gif"}
        }],
        "media$thumbnail": {"xmlns$media": "http://search.yahoo.com/mrss/", "url": format!("https://blogger.googleusercontent.com/img/a/post{}=s72-c", n), "height": "72", "width": "72"},
        "thr$total": {"$t": "2"}
    })
}

/// Feed with `count` entries numbered from `start`
pub(crate) fn feed_json(count: u64, total: Option<u64>, start: u64, per_page: u64) -> Value {
    let entries: Vec<Value> = (start..start + count).map(entry_json).collect();
    let mut feed = json!({
        "xmlns": "http://www.w3.org/2005/Atom",
        "id": {"$t": "tag:blogger.com,1999:blog-100"},
        "updated": {"$t": "2024-01-03T11:30:00.000-08:00"},
        "category": [{"term": "News"}, {"term": "Rust"}],
        "title": {"type": "text", "$t": "Example Blog"},
        "subtitle": {"type": "html", "$t": "Notes"},
        "link": [{"rel": "alternate", "type": "text/html", "href": "https://example.blogspot.com/"}],
        "author": [{"name": {"$t": "Ada"}}],
        "openSearch$startIndex": {"$t": start.to_string()},
        "openSearch$itemsPerPage": {"$t": per_page.to_string()},
        "entry": entries
    });
    if let Some(total) = total {
        feed["openSearch$totalResults"] = json!({"$t": total.to_string()});
    }
    json!({"version": "1.0", "encoding": "UTF-8", "feed": feed})
}

pub(crate) fn feed_body(count: u64, total: Option<u64>, start: u64, per_page: u64) -> String {
    feed_json(count, total, start, per_page).to_string()
}

/// Transport replaying canned responses in order and recording requests
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<TransportResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn ok(bodies: Vec<String>) -> Self {
        Self::new(
            bodies
                .into_iter()
                .map(|body| TransportResponse { status: 200, body })
                .collect(),
        )
    }

    pub(crate) fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    /// Value of a query parameter on the `i`-th request
    pub(crate) fn param(&self, i: usize, name: &str) -> Option<String> {
        self.requests()[i]
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(url.clone());
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| TransportResponse {
            status: 200,
            body: feed_body(0, Some(0), 1, 0),
        }))
    }
}
