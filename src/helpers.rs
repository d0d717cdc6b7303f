//! Normalization helpers applied to raw extracted values
//!
//! This module provides the pure post-processing steps of the pipeline:
//! - Whitespace cleanup of text fields
//! - Resolution of relative image and link URLs against the site root
//! - Placeholder and branding filters
//! - First-occurrence deduplication and newest-first ordering
//! - Slug, status, chapter number and date parsing
//!
//! # Examples
//!
//! ```
//! use xoxocomics_source::helpers::{absolute_url, comic_slug};
//!
//! assert_eq!(
//!     absolute_url("https://xoxocomic.com", "/img/cover.jpg"),
//!     "https://xoxocomic.com/img/cover.jpg"
//! );
//! assert_eq!(comic_slug("/comic/my-comic/"), Some("my-comic".to_string()));
//! ```

use crate::models::{Chapter, MangaStatus};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;

static CHAPTER_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:issue|chapter|ch\.?|episode|ep\.?)\s*#?(\d+(?:\.\d+)?)").expect("valid regex")
});
static CHAPTER_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:issue|chapter)-(\d+(?:\.\d+)?)").expect("valid regex"));
static COMIC_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/comic/([^/?#]+)(?:/([^/?#]+))?").expect("valid regex"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("valid regex"));

/// Collapse runs of whitespace and trim the ends
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a possibly relative URL against the site root.
///
/// Absolute and `data:` URLs pass through untouched; empty input stays empty.
pub fn absolute_url(base: &str, raw: &str) -> String {
    let raw = raw.trim();
    let base = base.trim_end_matches('/');
    if raw.is_empty()
        || raw.starts_with("http://")
        || raw.starts_with("https://")
        || raw.starts_with("data:")
    {
        raw.to_string()
    } else if let Some(rest) = raw.strip_prefix("//") {
        format!("https://{}", rest)
    } else if raw.starts_with('/') {
        format!("{}{}", base, raw)
    } else {
        format!("{}/{}", base, raw.trim_start_matches("./"))
    }
}

/// Lazy-load spinners and inline stand-ins that never hold a real page
pub fn is_placeholder_image(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.contains("loading")
        || lower.contains("placeholder")
        || lower.starts_with("data:")
        || lower.contains("data:image")
}

/// The site's own logo leaks into generic image scans
pub fn is_branding(title: &str) -> bool {
    title.to_lowercase().contains("logo")
}

/// Drop later entries whose key was already seen
pub fn dedup_by_key<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

/// Chapters are parsed top of page first (oldest); hosts want newest first
pub fn newest_first(mut chapters: Vec<Chapter>) -> Vec<Chapter> {
    chapters.reverse();
    chapters
}

/// Slug of the comic a link points to: `/comic/{slug}/...`
pub fn comic_slug(href: &str) -> Option<String> {
    COMIC_PATH_RE
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

/// Issue segment of a reader link: `/comic/{slug}/{issue}/...`
pub fn chapter_slug(href: &str) -> Option<String> {
    COMIC_PATH_RE
        .captures(href)
        .and_then(|c| c.get(2))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

/// Map free-form status text onto the host's status enum
pub fn parse_status(text: &str) -> MangaStatus {
    let lower = text.to_lowercase();
    if lower.contains("ongoing") || lower.contains("continuing") {
        MangaStatus::Ongoing
    } else if lower.contains("completed") || lower.contains("finished") {
        MangaStatus::Completed
    } else {
        MangaStatus::Unknown
    }
}

/// Chapter number from link text, then from the link target
pub fn chapter_number(text: &str, href: &str) -> Option<f64> {
    CHAPTER_TEXT_RE
        .captures(text)
        .or_else(|| CHAPTER_HREF_RE.captures(href))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// First `MM/DD/YYYY` date in the text, as midnight UTC
pub fn parse_chapter_date(text: &str) -> Option<DateTime<Utc>> {
    DATE_RE.captures_iter(text).find_map(|c| {
        let month = c[1].parse().ok()?;
        let day = c[2].parse().ok()?;
        let year = c[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    })
}
