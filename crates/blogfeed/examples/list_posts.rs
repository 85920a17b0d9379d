//! Example: List the newest and oldest posts of a blog
//!
//! Run with: cargo run -p blogfeed --example list_posts -- https://example.blogspot.com
//!
//! Falls back to `BLOGFEED_BLOG_URL` when no URL is given.

use blogfeed::{Entry, FeedClient, FeedOptions, Query};

fn print_entries(heading: &str, entries: &[Entry]) {
    println!("{}", heading);
    println!("{}", "=".repeat(heading.len()));
    for entry in entries {
        let date = entry
            .published
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        println!("{}  {}  (#{})", date, entry.title, entry.id);
    }
    println!();
}

#[tokio::main]
async fn main() -> blogfeed::Result<()> {
    let client = match std::env::args().nth(1) {
        Some(url) => FeedClient::new(&url)?,
        None => FeedClient::from_env()?,
    };

    let posts = client.posts(&FeedOptions::default().max_results(5)).await?;
    println!(
        "{} posts in {} pages, labels: {}\n",
        posts.total(),
        posts.page_count(),
        posts.categories().join(", ")
    );

    let newest = posts.page(1, false).await?;
    print_entries(&format!("Newest ({})", newest.blog.title), &newest.entries);

    let oldest = posts.page(1, true).await?;
    print_entries("Oldest", &oldest.entries);

    if let Some(label) = posts.categories().first() {
        let query = Query::new().label(label).build();
        let labelled = client
            .entries(&FeedOptions::default().max_results(5).query(&query))
            .await?;
        let page = labelled.page(1, false).await?;
        print_entries(&format!("Search: {}", query), &page.entries);
    }

    Ok(())
}
