//! Thumbnail URL resizing
//!
//! Image URLs served by the platform carry their size inline, either as a
//! path segment (`.../s72-c/photo.jpg`) or as a suffix (`...=s72-c`).
//! Rewriting that token asks the image server for another size.

use regex::Regex;
use std::sync::OnceLock;

/// Size the feed uses for `media$thumbnail`
pub const FEED_THUMBNAIL_SIZE: u32 = 72;

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"/(?:s\d+|w\d+-h\d+)(?:-[a-z]+)*/").expect("Invalid regex")
    })
}

fn suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"=(?:s\d+|w\d+-h\d+)(?:-[a-z]+)*$").expect("Invalid regex")
    })
}

/// Rewrite the size token of an image URL
///
/// `size` is the longest edge in pixels; `crop` requests a square crop.
/// URLs without a size token are returned unchanged.
pub fn resize_thumbnail(url: &str, size: u32, crop: bool) -> String {
    let token = if crop {
        format!("s{}-c", size)
    } else {
        format!("s{}", size)
    };

    if suffix_pattern().is_match(url) {
        return suffix_pattern()
            .replace(url, format!("={}", token).as_str())
            .into_owned();
    }
    segment_pattern()
        .replacen(url, 1, format!("/{}/", token).as_str())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_path_segment() {
        let url = "https://1.bp.blogspot.com/-abc/XYZ/AAAA/def/s72-c/photo.jpg";
        assert_eq!(
            resize_thumbnail(url, 640, false),
            "https://1.bp.blogspot.com/-abc/XYZ/AAAA/def/s640/photo.jpg"
        );
        assert_eq!(
            resize_thumbnail(url, 200, true),
            "https://1.bp.blogspot.com/-abc/XYZ/AAAA/def/s200-c/photo.jpg"
        );
    }

    #[test]
    fn test_resize_width_height_segment() {
        let url = "https://blogger.googleusercontent.com/img/b/R29v/w640-h400/photo.png";
        assert_eq!(
            resize_thumbnail(url, 1600, false),
            "https://blogger.googleusercontent.com/img/b/R29v/s1600/photo.png"
        );
    }

    #[test]
    fn test_resize_suffix() {
        let url = "https://blogger.googleusercontent.com/img/a/AVvXsEh=s72-c";
        assert_eq!(
            resize_thumbnail(url, 320, false),
            "https://blogger.googleusercontent.com/img/a/AVvXsEh=s320"
        );
    }

    #[test]
    fn test_unknown_url_unchanged() {
        let url = "https://img.youtube.com/vi/abc/default.jpg";
        assert_eq!(resize_thumbnail(url, 320, true), url);
    }
}
