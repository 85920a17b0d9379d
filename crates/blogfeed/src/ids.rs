//! Numeric id extraction from tag URIs
//!
//! The feed identifies everything with tag URIs such as
//! `tag:blogger.com,1999:blog-123.post-456`. Comments use the `post-`
//! segment for their own id.

use crate::error::FeedError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Which id to pull out of a tag URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Blog,
    Post,
    Page,
    Comment,
}

impl IdKind {
    fn marker(self) -> &'static str {
        match self {
            IdKind::Blog => "blog",
            IdKind::Post | IdKind::Comment => "post",
            IdKind::Page => "page",
        }
    }
}

impl FromStr for IdKind {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blog" => Ok(IdKind::Blog),
            "post" | "posts" => Ok(IdKind::Post),
            "page" | "pages" => Ok(IdKind::Page),
            "comment" | "comments" => Ok(IdKind::Comment),
            _ => Err(FeedError::InvalidIdKind(s.to_string())),
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdKind::Blog => "blog",
            IdKind::Post => "post",
            IdKind::Page => "page",
            IdKind::Comment => "comment",
        };
        f.write_str(name)
    }
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|[.:/])(blog|post|page)-(\d+)").expect("Invalid regex")
    })
}

/// Pull the numeric id of `kind` out of a tag URI
pub fn extract_id(tag: &str, kind: IdKind) -> Option<String> {
    id_pattern()
        .captures_iter(tag)
        .find(|caps| &caps[1] == kind.marker())
        .map(|caps| caps[2].to_string())
}

/// Most specific id in a tag URI: post or page, then blog, else the tag itself
pub fn short_id(tag: &str) -> String {
    extract_id(tag, IdKind::Post)
        .or_else(|| extract_id(tag, IdKind::Page))
        .or_else(|| extract_id(tag, IdKind::Blog))
        .unwrap_or_else(|| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "tag:blogger.com,1999:blog-7001.post-9002";
    const PAGE: &str = "tag:blogger.com,1999:blog-7001.page-33";

    #[test]
    fn test_extract_post_and_blog() {
        assert_eq!(extract_id(POST, IdKind::Post).as_deref(), Some("9002"));
        assert_eq!(extract_id(POST, IdKind::Comment).as_deref(), Some("9002"));
        assert_eq!(extract_id(POST, IdKind::Blog).as_deref(), Some("7001"));
        assert_eq!(extract_id(POST, IdKind::Page), None);
    }

    #[test]
    fn test_extract_page() {
        assert_eq!(extract_id(PAGE, IdKind::Page).as_deref(), Some("33"));
        assert_eq!(short_id(PAGE), "33");
    }

    #[test]
    fn test_short_id_fallbacks() {
        assert_eq!(short_id("tag:blogger.com,1999:blog-7001"), "7001");
        assert_eq!(short_id("urn:custom:abc"), "urn:custom:abc");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Post".parse::<IdKind>().unwrap(), IdKind::Post);
        assert_eq!("comments".parse::<IdKind>().unwrap(), IdKind::Comment);
        let err = "user".parse::<IdKind>().unwrap_err();
        assert!(matches!(err, FeedError::InvalidIdKind(_)));
        assert!(err.is_config());
    }
}
