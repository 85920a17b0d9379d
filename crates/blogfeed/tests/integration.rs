//! Integration tests for blogfeed using wiremock

use blogfeed::{FeedClient, FeedError, FeedOptions, FeedType, Query, DEFAULT_USER_AGENT};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn entry(n: u64) -> Value {
    json!({
        "id": {"$t": format!("tag:blogger.com,1999:blog-100.post-{}", n)},
        "published": {"$t": "2024-01-02T10:00:00.000-08:00"},
        "title": {"type": "text", "$t": format!("Post {}", n)},
        "link": [{"rel": "alternate", "type": "text/html", "href": format!("https://example.blogspot.com/p{}.html", n)}],
        "author": [{"name": {"$t": "Ada"}}]
    })
}

fn feed(count: u64, start: u64, total: u64) -> Value {
    let entries: Vec<Value> = (start..start + count).map(entry).collect();
    json!({
        "version": "1.0",
        "encoding": "UTF-8",
        "feed": {
            "id": {"$t": "tag:blogger.com,1999:blog-100"},
            "title": {"type": "text", "$t": "Example Blog"},
            "category": [{"term": "News"}],
            "openSearch$totalResults": {"$t": total.to_string()},
            "openSearch$startIndex": {"$t": start.to_string()},
            "openSearch$itemsPerPage": {"$t": count.to_string()},
            "entry": entries
        }
    })
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("blogfeed=debug")
        .with_test_writer()
        .try_init();
}

fn json_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
}

#[tokio::test]
async fn test_handler_total_and_second_page() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feeds/posts/summary"))
        .and(query_param("max-results", "1"))
        .respond_with(json_response(feed(1, 1, 12)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/feeds/posts/summary"))
        .and(query_param("max-results", "5"))
        .and(query_param("start-index", "6"))
        .and(query_param("alt", "json"))
        .respond_with(json_response(feed(5, 6, 12)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FeedClient::new(&mock_server.uri()).unwrap();
    let options: FeedOptions =
        serde_json::from_value(json!({"type": "posts", "params": {"max-results": 5}})).unwrap();
    let handler = client.entries(&options).await.unwrap();
    assert_eq!(handler.total(), 12);

    let page = handler.page(2, false).await.unwrap();
    assert_eq!(page.entries.len(), 5);
    assert_eq!(page.entries[0].id, "6");
    assert_eq!(page.entries[0].title, "Post 6");
    assert_eq!(page.blog.title, "Example Blog");
    assert_eq!(page.blog.start_index, 6);
}

#[tokio::test]
async fn test_fetch_all_merges_pages() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feeds/posts/full"))
        .and(query_param("start-index", "1"))
        .and(query_param("max-results", "500"))
        .respond_with(json_response(feed(5, 1, 5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/feeds/posts/full"))
        .and(query_param("start-index", "6"))
        .respond_with(json_response(feed(0, 6, 5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FeedClient::new(&mock_server.uri()).unwrap();
    let options = FeedOptions::default()
        .route(blogfeed::Route::Full)
        .max_results(3);
    let blog = client.fetch_raw(&options, true, None).await.unwrap();

    let feed = blog.feed.unwrap();
    assert_eq!(feed.entry.len(), 5);
    assert_eq!(feed.start_index(), Some(1));
    assert_eq!(feed.total_results(), Some(5));
}

#[tokio::test]
async fn test_query_uses_fetch_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feeds/posts/summary"))
        .and(query_param("q", "rust -java"))
        .and(query_param("max-results", "500"))
        .and(query_param("start-index", "1"))
        .respond_with(json_response(feed(3, 1, 80)))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/feeds/posts/summary"))
        .and(query_param("start-index", "4"))
        .respond_with(json_response(feed(0, 4, 80)))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("max-results", "1"))
        .respond_with(json_response(feed(1, 1, 80)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = FeedClient::new(&mock_server.uri()).unwrap();
    let query = Query::new().term("rust").exclude("java").build();
    let options = FeedOptions::default().max_results(2).query(&query);
    let handler = client.entries(&options).await.unwrap();

    assert!(handler.is_query_mode());
    assert_eq!(handler.total(), 3);

    let page = handler.page(1, true).await.unwrap();
    let ids: Vec<_> = page.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "2"]);
}

#[tokio::test]
async fn test_not_found_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = FeedClient::new(&mock_server.uri()).unwrap();
    let err = assert_err!(client.fetch_raw(&FeedOptions::default(), true, None).await);

    assert!(matches!(err, FeedError::Status { status: 404, .. }));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_invalid_json_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = FeedClient::new(&mock_server.uri()).unwrap();
    let err = assert_err!(client.entries(&FeedOptions::default()).await);

    let msg = err.to_string();
    assert!(msg.contains("Failed to parse"));
    assert!(msg.contains("not json"));
}

#[tokio::test]
async fn test_comments_feed_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feeds/42/comments/summary"))
        .respond_with(json_response(feed(1, 1, 2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FeedClient::new(&mock_server.uri()).unwrap();
    let handler = client
        .comments_by_id(&FeedOptions::default(), "42")
        .await
        .unwrap();
    assert_eq!(handler.total(), 2);
    assert_eq!(handler.options().kind, FeedType::Comments);
}

#[tokio::test]
async fn test_single_entry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feeds/pages/summary/33"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(json_response(json!({"version": "1.0", "entry": entry(33)})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FeedClient::new(&mock_server.uri()).unwrap();
    let entry = client
        .entry(&FeedOptions::new(FeedType::Pages), "33")
        .await
        .unwrap();
    assert_eq!(entry.id, "33");
    assert_eq!(entry.url.as_deref(), Some("https://example.blogspot.com/p33.html"));
}

#[tokio::test]
async fn test_posts_by_categories() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feeds/posts/summary/-/News"))
        .respond_with(json_response(feed(1, 1, 7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FeedClient::builder()
        .blog_url(mock_server.uri())
        .build()
        .unwrap();
    let posts = client
        .posts_by_categories(&FeedOptions::default(), ["News"])
        .await
        .unwrap();
    assert_eq!(posts.total(), 7);
    assert_eq!(posts.categories().to_vec(), vec!["News"]);
}

#[tokio::test]
async fn test_per_call_blog_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feeds/posts/summary"))
        .respond_with(json_response(feed(1, 1, 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FeedClient::builder().build().unwrap();
    let err = client.entries(&FeedOptions::default()).await.unwrap_err();
    assert!(matches!(err, FeedError::MissingBlogUrl));

    let options = FeedOptions::default().blog_url(mock_server.uri());
    let handler = assert_ok!(client.entries(&options).await);
    assert_eq!(handler.total(), 1);
}
