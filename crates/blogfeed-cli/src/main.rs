//! blogfeed CLI - list posts, comments and pages of a blog from the command line

use blogfeed::{
    DateField, Entry, FeedClient, FeedOptions, FeedType, OrderBy, Page, Route, BLOG_URL_ENV,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Output format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Markdown with YAML frontmatter
    #[default]
    Md,
    /// JSON format
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Updated,
    Published,
}

impl From<OrderArg> for OrderBy {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Updated => OrderBy::Updated,
            OrderArg::Published => OrderBy::Published,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum KindArg {
    #[default]
    Posts,
    Pages,
}

/// blogfeed - read a blog's JSON feeds
#[derive(Parser, Debug)]
#[command(name = "blogfeed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Blog root URL
    #[arg(long, global = true, env = BLOG_URL_ENV)]
    blog_url: Option<String>,

    /// Output format
    #[arg(long, short, global = true, default_value = "md")]
    output: OutputFormat,

    /// Custom User-Agent
    #[arg(long, global = true)]
    user_agent: Option<String>,
}

/// Paging and filter flags shared by the list commands
#[derive(Args, Debug, Clone)]
struct ListArgs {
    /// Entries per page (1-500)
    #[arg(long, short = 'n', default_value_t = 10)]
    max_results: i64,

    /// 1-based page number
    #[arg(long, short, default_value_t = 1)]
    page: i64,

    /// Count pages from the end of the feed, oldest first
    #[arg(long, short)]
    reverse: bool,

    /// Full-text search query
    #[arg(long, short)]
    query: Option<String>,

    /// Request full content instead of summaries
    #[arg(long)]
    full: bool,

    /// Sort order
    #[arg(long, value_enum)]
    order_by: Option<OrderArg>,

    /// Only entries published at or after this date
    #[arg(long)]
    published_min: Option<String>,

    /// Only entries published before this date
    #[arg(long)]
    published_max: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List posts, optionally restricted to labels
    Posts {
        #[command(flatten)]
        list: ListArgs,

        /// Label the posts must carry (repeatable)
        #[arg(long = "label", short = 'l')]
        labels: Vec<String>,
    },
    /// List comments of one post
    Comments {
        /// Post id
        post_id: String,

        #[command(flatten)]
        list: ListArgs,
    },
    /// List static pages
    Pages {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Fetch one post or page by id
    Entry {
        /// Entry id
        id: String,

        /// Collection the entry belongs to
        #[arg(long, value_enum, default_value = "posts")]
        kind: KindArg,

        /// Request full content instead of the summary
        #[arg(long)]
        full: bool,
    },
}

impl ListArgs {
    fn options(&self, kind: FeedType) -> FeedOptions {
        let mut options = FeedOptions::new(kind)
            .route(route(self.full))
            .max_results(self.max_results);
        if let Some(query) = &self.query {
            options = options.query(query);
        }
        options.params.set_order_by(self.order_by.map(OrderBy::from));
        options
            .params
            .set_date(DateField::PublishedMin, self.published_min.as_deref());
        options
            .params
            .set_date(DateField::PublishedMax, self.published_max.as_deref());
        options
    }
}

fn route(full: bool) -> Route {
    if full {
        Route::Full
    } else {
        Route::Summary
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let mut builder = FeedClient::builder();
    if let Some(url) = cli.blog_url {
        builder = builder.blog_url(url);
    }
    if let Some(ua) = cli.user_agent {
        builder = builder.user_agent(ua);
    }
    let client = builder.build().unwrap_or_else(|e| fail(&e));

    match cli.command {
        Commands::Posts { list, labels } => {
            let options = list.options(FeedType::Posts);
            let handler = if labels.is_empty() {
                client.posts(&options).await
            } else {
                client.posts_by_categories(&options, &labels).await
            }
            .unwrap_or_else(|e| fail(&e));
            tracing::debug!(total = handler.total(), "Listing posts");
            let page = handler
                .page(list.page, list.reverse)
                .await
                .unwrap_or_else(|e| fail(&e));
            print_page(&page, handler.total(), list.page, cli.output);
        }
        Commands::Comments { post_id, list } => {
            let options = list.options(FeedType::Comments);
            let handler = client
                .comments_by_id(&options, &post_id)
                .await
                .unwrap_or_else(|e| fail(&e));
            let page = handler
                .page(list.page, list.reverse)
                .await
                .unwrap_or_else(|e| fail(&e));
            print_page(&page, handler.total(), list.page, cli.output);
        }
        Commands::Pages { list } => {
            let options = list.options(FeedType::Pages);
            let handler = client.entries(&options).await.unwrap_or_else(|e| fail(&e));
            let page = handler
                .page(list.page, list.reverse)
                .await
                .unwrap_or_else(|e| fail(&e));
            print_page(&page, handler.total(), list.page, cli.output);
        }
        Commands::Entry { id, kind, full } => {
            let kind = match kind {
                KindArg::Posts => FeedType::Posts,
                KindArg::Pages => FeedType::Pages,
            };
            let options = FeedOptions::new(kind).route(route(full));
            let entry = client
                .entry(&options, &id)
                .await
                .unwrap_or_else(|e| fail(&e));
            match cli.output {
                OutputFormat::Md => writeln_safe(&format_entry_md(&entry)),
                OutputFormat::Json => print_json(&entry),
            }
        }
    }
}

fn fail(err: &blogfeed::FeedError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}

fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing response: {}", e);
        std::process::exit(1);
    });
    writeln_safe(&json);
}

fn print_page(page: &Page, total: u64, page_number: i64, output: OutputFormat) {
    match output {
        OutputFormat::Md => writeln_safe(&format_page_md(page, total, page_number)),
        OutputFormat::Json => print_json(page),
    }
}

/// Format a page as a markdown list with YAML frontmatter
fn format_page_md(page: &Page, total: u64, page_number: i64) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!("blog: {}\n", page.blog.title));
    if let Some(ref url) = page.blog.url {
        output.push_str(&format!("url: {}\n", url));
    }
    output.push_str(&format!("total: {}\n", total));
    output.push_str(&format!("page: {}\n", page_number));
    output.push_str(&format!("start_index: {}\n", page.blog.start_index));
    output.push_str(&format!("items: {}\n", page.entries.len()));
    output.push_str("---\n");

    for entry in &page.entries {
        output.push('\n');
        output.push_str(&format_entry_line(entry));
    }

    output
}

fn format_entry_line(entry: &Entry) -> String {
    let mut line = format!("- {}", entry.title);
    if let Some(published) = entry.published {
        line.push_str(&format!(" ({})", published.format("%Y-%m-%d")));
    }
    line.push_str(&format!(" #{}", entry.id));
    if let Some(ref url) = entry.url {
        line.push_str(&format!("\n  {}", url));
    }
    line
}

/// Format one entry as markdown with YAML frontmatter
fn format_entry_md(entry: &Entry) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!("id: {}\n", entry.id));
    output.push_str(&format!("title: {}\n", entry.title));
    if let Some(ref url) = entry.url {
        output.push_str(&format!("url: {}\n", url));
    }
    if let Some(published) = entry.published {
        output.push_str(&format!("published: {}\n", published.to_rfc3339()));
    }
    if !entry.authors.is_empty() {
        let names: Vec<&str> = entry.authors.iter().map(|a| a.name.as_str()).collect();
        output.push_str(&format!("authors: {}\n", names.join(", ")));
    }
    if !entry.categories.is_empty() {
        output.push_str(&format!("labels: {}\n", entry.categories.join(", ")));
    }
    if let Some(comments) = entry.total_comments {
        output.push_str(&format!("comments: {}\n", comments));
    }
    output.push_str("---\n");

    if let Some(ref content) = entry.content {
        output.push_str(content);
    } else if let Some(ref summary) = entry.summary {
        output.push_str(summary);
    }

    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogfeed::{Author, Blog, ParamKey};

    fn entry() -> Entry {
        Entry {
            id: "42".to_string(),
            title: "Hello".to_string(),
            url: Some("https://example.blogspot.com/hello.html".to_string()),
            authors: vec![Author {
                name: "Ada".to_string(),
                ..Default::default()
            }],
            categories: vec!["News".to_string(), "Rust".to_string()],
            summary: Some("Short".to_string()),
            total_comments: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_entry_md() {
        let output = format_entry_md(&entry());

        assert!(output.starts_with("---\n"));
        assert!(output.contains("id: 42\n"));
        assert!(output.contains("title: Hello\n"));
        assert!(output.contains("authors: Ada\n"));
        assert!(output.contains("labels: News, Rust\n"));
        assert!(output.contains("comments: 3\n"));
        assert!(output.ends_with("---\nShort"));
    }

    #[test]
    fn test_format_entry_prefers_content() {
        let entry = Entry {
            content: Some("<p>Long</p>".to_string()),
            ..entry()
        };
        assert!(format_entry_md(&entry).ends_with("---\n<p>Long</p>"));
    }

    #[test]
    fn test_format_page_md() {
        let page = Page {
            blog: Blog {
                title: "Example Blog".to_string(),
                start_index: 11,
                ..Default::default()
            },
            entries: vec![entry()],
        };

        let output = format_page_md(&page, 25, 2);

        assert!(output.contains("blog: Example Blog\n"));
        assert!(output.contains("total: 25\n"));
        assert!(output.contains("page: 2\n"));
        assert!(output.contains("start_index: 11\n"));
        assert!(output.contains("items: 1\n"));
        assert!(output.contains("- Hello #42\n  https://example.blogspot.com/hello.html"));
    }

    #[test]
    fn test_list_args_options() {
        let cli = Cli::parse_from([
            "blogfeed",
            "posts",
            "-n",
            "5",
            "--query",
            "rust",
            "--full",
            "--order-by",
            "published",
            "--label",
            "News",
        ]);
        let Commands::Posts { list, labels } = cli.command else {
            panic!("expected posts command");
        };
        let options = list.options(FeedType::Posts);

        assert_eq!(labels, vec!["News"]);
        assert_eq!(options.route, Route::Full);
        assert_eq!(options.params.max_results(), 5);
        assert_eq!(options.params.query(), Some("rust"));
        assert_eq!(options.params.order_by(), OrderBy::Published);
        assert!(!options.params.contains(ParamKey::PublishedMin));
    }

    #[test]
    fn test_comments_requires_post_id() {
        assert!(Cli::try_parse_from(["blogfeed", "comments"]).is_err());
        let cli = Cli::try_parse_from(["blogfeed", "comments", "7", "--reverse"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Comments { ref post_id, ref list } if post_id == "7" && list.reverse
        ));
    }
}
