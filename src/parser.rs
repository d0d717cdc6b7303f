//! HTML extraction for XoXoComics pages.
//!
//! Each page kind has its own entry point. None of them fail: a missing
//! element degrades to a documented fallback value so callers always get a
//! structurally complete record.

use crate::helpers::{
    absolute_url, chapter_number, chapter_slug, clean_text, comic_slug, dedup_by_key,
    is_branding, is_placeholder_image, newest_first, parse_chapter_date, parse_status,
};
use crate::models::{Chapter, ChapterDetails, HomeSection, Manga, MangaTile, Tag};
use crate::rules::{collect_first, first_hit, first_value, Rule};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

pub const SEARCH_LIMIT: usize = 50;
pub const HOME_SECTION_LIMIT: usize = 20;
pub const MIN_CHAPTER_ID_LEN: usize = 2;
pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

const LAZY_IMAGE_ATTRS: &[&str] = &["data-src", "data-original", "src"];
const PAGE_IMAGE_ATTRS: &[&str] = &["data-src", "src", "data-lazy"];

const TITLE_RULES: &[Rule] = &[
    Rule::text("entry-title", "h1.entry-title"),
    Rule::text("comic-title", ".comic-title"),
    Rule::text("series-title", ".series-title"),
    Rule::text("heading", "h1"),
    Rule::text("page-title", "title"),
];

const COVER_RULES: &[Rule] = &[
    Rule::attrs("comic-cover", ".comic-cover img", LAZY_IMAGE_ATTRS),
    Rule::attrs("lazy-owl", "img.lazyOwl", LAZY_IMAGE_ATTRS),
    Rule::attrs("lazy", "img.lazy", LAZY_IMAGE_ATTRS),
    Rule::attrs("cover-alt", "img[alt*=\"cover\"]", LAZY_IMAGE_ATTRS),
];

const DESCRIPTION_RULES: &[Rule] = &[
    Rule::paragraph("summary", ".summary"),
    Rule::paragraph("description", ".comic-description, .description"),
    Rule::paragraph("about", ".about"),
    Rule::text("description-block", ".comic-description, .description, .summary, .about"),
];

const STATUS_RULES: &[Rule] = &[Rule::text("status", ".comic-status, span.status, .status")];

const AUTHOR_RULES: &[Rule] = &[Rule::text("author", ".comic-author, .author, .creator")];

const ARTIST_RULES: &[Rule] = &[Rule::text("artist", ".comic-artist, .artist")];

const TAG_RULES: &[Rule] = &[
    Rule::text("comic-tags", ".comic-tags .tag"),
    Rule::text("genre", ".genres .genre"),
    Rule::text("genre-link", ".genres a"),
    Rule::text("tag", ".tags .tag"),
];

const PAGE_RULES: &[Rule] = &[
    Rule::attrs("single-page", "img.single-page", PAGE_IMAGE_ATTRS),
    Rule::attrs("comic-page", ".comic-page img", PAGE_IMAGE_ATTRS),
    Rule::attrs("reader-image", ".reader-image img", PAGE_IMAGE_ATTRS),
    Rule::attrs("chapter-content", ".chapter-content img", PAGE_IMAGE_ATTRS),
    Rule::attrs("lazy", "img.lazy", PAGE_IMAGE_ATTRS),
];

const TILE_LINK_RULES: &[Rule] = &[Rule::attrs("comic-link", "a[href*=\"/comic/\"]", &["href"])];

const TILE_TITLE_RULES: &[Rule] = &[
    Rule::text("heading", "h2, h3, h4, .title"),
    Rule::attrs("link-title", "a[title]", &["title"]),
    Rule::attrs("image-alt", "img[alt]", &["alt"]),
    Rule::text("link-text", "a[href*=\"/comic/\"]"),
];

const TILE_IMAGE_RULES: &[Rule] = &[Rule::attrs("image", "img", LAZY_IMAGE_ATTRS)];

/// Repeating listing containers, most specific first
const LISTING_CONTAINERS: &[&str] = &[
    "article.post",
    "article",
    ".comic-item",
    ".ModuleContent .col-sm-3",
    ".item",
];

struct SectionLayout {
    id: &'static str,
    title: &'static str,
    view_more: bool,
    containers: &'static [&'static str],
    lazy_owl: bool,
}

const HOME_SECTIONS: &[SectionLayout] = &[
    SectionLayout {
        id: "trending",
        title: "Trending Comics",
        view_more: true,
        containers: &[],
        lazy_owl: true,
    },
    SectionLayout {
        id: "hot",
        title: "Hot Comics",
        view_more: true,
        containers: &[".hot .item", "[class*=\"hot\"] .item", ".Module .item"],
        lazy_owl: false,
    },
    SectionLayout {
        id: "featured",
        title: "Featured Comics",
        view_more: false,
        containers: &["article.post"],
        lazy_owl: false,
    },
];

static CHAPTER_VOCAB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)issue|chapter|\bch\b|episode|read").expect("valid regex"));
static SCRIPT_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)["'](https?://[^"']*\.(?:jpg|jpeg|png|gif|webp))["']"#).expect("valid regex")
});

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn not_placeholder(value: &str) -> bool {
    !is_placeholder_image(value)
}

/// Parse a comic's landing page
pub fn parse_manga_details(html: &str, manga_id: &str, base: &str) -> Manga {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title = match first_hit(root, TITLE_RULES, |_| true) {
        Some(hit) => {
            log::debug!("{}: title from rule {}", manga_id, hit.rule);
            hit.value
        }
        None => manga_id.to_string(),
    };

    let image = first_hit(root, COVER_RULES, not_placeholder)
        .map(|hit| absolute_url(base, &hit.value))
        .unwrap_or_default();

    let desc = first_value(root, DESCRIPTION_RULES).unwrap_or_else(|| NO_DESCRIPTION.to_string());
    let status = first_value(root, STATUS_RULES)
        .map(|s| parse_status(&s))
        .unwrap_or_default();
    let author = first_value(root, AUTHOR_RULES).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    let artist = first_value(root, ARTIST_RULES).unwrap_or_else(|| author.clone());

    let tags = collect_first(root, TAG_RULES, |_| true)
        .map(|(_, labels)| dedup_by_key(labels, |l| l.to_lowercase()))
        .unwrap_or_default()
        .iter()
        .map(|label| Tag::from_label(label))
        .collect();

    Manga {
        id: manga_id.to_string(),
        titles: vec![title],
        image,
        status,
        author,
        artist,
        desc,
        tags,
        last_update: None,
    }
}

/// Date printed in the list row holding a chapter link
fn row_date(anchor: ElementRef<'_>) -> Option<DateTime<Utc>> {
    anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| matches!(e.value().name(), "li" | "tr"))
        .and_then(|row| parse_chapter_date(&row.text().collect::<String>()))
}

/// Parse the issue list of a comic's landing page, newest first
pub fn parse_chapters(html: &str, manga_id: &str) -> Vec<Chapter> {
    let document = Html::parse_document(html);
    let Some(anchor) = selector("a[href]") else {
        return Vec::new();
    };

    let now = Utc::now();
    let mut seen = HashSet::new();
    let mut chapters = Vec::new();

    for a in document.select(&anchor) {
        let href = a.value().attr("href").unwrap_or_default().trim();
        let text = clean_text(&a.text().collect::<String>());

        if !CHAPTER_VOCAB_RE.is_match(href) && !CHAPTER_VOCAB_RE.is_match(&text) {
            continue;
        }
        // Issues of other comics (sidebars, "related" shelves) are not ours
        if comic_slug(href).as_deref() != Some(manga_id) {
            continue;
        }
        let Some(id) = chapter_slug(href) else {
            continue;
        };
        if id.len() < MIN_CHAPTER_ID_LEN || !seen.insert(id.clone()) {
            continue;
        }

        // Position in document order, before the newest-first reversal
        let position = chapters.len() + 1;
        let chap_num = chapter_number(&text, href).unwrap_or(position as f64);
        let name = if text.is_empty() {
            format!("Issue {}", chap_num)
        } else {
            text
        };

        chapters.push(Chapter {
            chap_num,
            time: row_date(a).unwrap_or(now),
            id,
            manga_id: manga_id.to_string(),
            name,
            lang_code: "en".to_string(),
        });
    }

    log::debug!("{}: {} chapters", manga_id, chapters.len());
    newest_first(chapters)
}

/// Quoted image URLs inside inline scripts that look like comic pages
fn script_images(document: &Html) -> Vec<String> {
    let Some(script) = selector("script") else {
        return Vec::new();
    };
    document
        .select(&script)
        .flat_map(|s| s.text().map(str::to_string).collect::<Vec<_>>())
        .flat_map(|text| {
            SCRIPT_IMAGE_RE
                .captures_iter(&text)
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                .collect::<Vec<_>>()
        })
        .filter(|url| {
            let lower = url.to_lowercase();
            lower.contains("xoxocomic") || lower.contains("comic") || lower.contains("manga")
        })
        .filter(|url| !is_placeholder_image(url))
        .collect()
}

/// Parse the reader page of one issue
pub fn parse_chapter_pages(
    html: &str,
    manga_id: &str,
    chapter_id: &str,
    base: &str,
) -> ChapterDetails {
    let document = Html::parse_document(html);

    let raw = match collect_first(document.root_element(), PAGE_RULES, not_placeholder) {
        Some((rule, pages)) => {
            log::debug!("{}/{}: {} pages from rule {}", manga_id, chapter_id, pages.len(), rule);
            pages
        }
        None => {
            let pages = script_images(&document);
            log::debug!("{}/{}: {} pages from inline scripts", manga_id, chapter_id, pages.len());
            pages
        }
    };

    let pages: Vec<String> = raw.iter().map(|p| absolute_url(base, p)).collect();

    ChapterDetails {
        id: chapter_id.to_string(),
        manga_id: manga_id.to_string(),
        pages: dedup_by_key(pages, |p: &String| p.clone()),
        long_strip: false,
    }
}

/// One listing container holding a link, a heading and a cover
fn tile_from_container(container: ElementRef<'_>, base: &str) -> Option<MangaTile> {
    let href = first_value(container, TILE_LINK_RULES)?;
    let id = comic_slug(&href)?;
    let title = first_value(container, TILE_TITLE_RULES)?;
    let image = first_value_accepting(container, TILE_IMAGE_RULES)
        .map(|img| absolute_url(base, &img))
        .unwrap_or_default();
    Some(MangaTile { id, title, image })
}

fn first_value_accepting(scope: ElementRef<'_>, rules: &[Rule]) -> Option<String> {
    first_hit(scope, rules, not_placeholder).map(|hit| hit.value)
}

/// Carousel images whose nearest enclosing link points at a comic
fn lazy_owl_tiles(root: ElementRef<'_>, base: &str) -> Vec<MangaTile> {
    let Some(owl) = selector("img.lazyOwl") else {
        return Vec::new();
    };
    root.select(&owl)
        .filter_map(|img| {
            let link = img
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "a")?;
            let id = comic_slug(link.value().attr("href")?)?;
            let title = [img.value().attr("alt"), link.value().attr("title")]
                .into_iter()
                .flatten()
                .map(clean_text)
                .find(|t| !t.is_empty())?;
            let image = LAZY_IMAGE_ATTRS
                .iter()
                .filter_map(|attr| img.value().attr(attr))
                .map(str::trim)
                .find(|v| !v.is_empty() && !is_placeholder_image(v))
                .map(|v| absolute_url(base, v))
                .unwrap_or_default();
            Some(MangaTile { id, title, image })
        })
        .collect()
}

/// Tiles from the first container selector that yields any
fn tiles(
    root: ElementRef<'_>,
    containers: &[&str],
    lazy_owl: bool,
    base: &str,
    limit: usize,
) -> Vec<MangaTile> {
    let mut found = containers
        .iter()
        .filter_map(|css| selector(css))
        .map(|sel| {
            root.select(&sel)
                .filter_map(|c| tile_from_container(c, base))
                .collect::<Vec<_>>()
        })
        .find(|tiles| !tiles.is_empty())
        .unwrap_or_default();

    if found.is_empty() && lazy_owl {
        found = lazy_owl_tiles(root, base);
    }

    let mut tiles = dedup_by_key(
        found.into_iter().filter(|t| !is_branding(&t.title)).collect(),
        |t: &MangaTile| t.id.clone(),
    );
    tiles.truncate(limit);
    tiles
}

/// Parse a search or "view more" results page
pub fn parse_listing(html: &str, base: &str, limit: usize) -> Vec<MangaTile> {
    let document = Html::parse_document(html);
    tiles(document.root_element(), LISTING_CONTAINERS, true, base, limit)
}

/// Parse the homepage shelves. Shelves with no comics are left out.
pub fn parse_home_sections(html: &str, base: &str) -> Vec<HomeSection> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    HOME_SECTIONS
        .iter()
        .filter_map(|layout| {
            let items = tiles(root, layout.containers, layout.lazy_owl, base, HOME_SECTION_LIMIT);
            log::debug!("home section {}: {} items", layout.id, items.len());
            (!items.is_empty()).then(|| HomeSection {
                id: layout.id.to_string(),
                title: layout.title.to_string(),
                items,
                view_more: layout.view_more,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://xoxocomic.com";

    #[test]
    fn test_details_fallback_values() {
        let manga = parse_manga_details("<html><body><p>nothing</p></body></html>", "batman", BASE);
        assert_eq!(manga.titles, vec!["batman"]);
        assert_eq!(manga.image, "");
        assert_eq!(manga.desc, NO_DESCRIPTION);
        assert_eq!(manga.author, UNKNOWN_AUTHOR);
        assert_eq!(manga.artist, UNKNOWN_AUTHOR);
        assert_eq!(manga.status, crate::models::MangaStatus::Unknown);
        assert!(manga.tags.is_empty());
    }

    #[test]
    fn test_details_page_title_fallback() {
        let html = "<html><head><title> Batman Comic </title></head><body></body></html>";
        let manga = parse_manga_details(html, "batman", BASE);
        assert_eq!(manga.titles, vec!["Batman Comic"]);
    }

    #[test]
    fn test_chapter_without_text_gets_positional_name() {
        let html = r#"<a href="/comic/x/issue-a"><img src="/c.jpg"></a>"#;
        let chapters = parse_chapters(html, "x");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].name, "Issue 1");
        assert_eq!(chapters[0].chap_num, 1.0);
    }

    #[test]
    fn test_textless_chapter_link_numbered_from_href() {
        let html = r#"<a href="/comic/x/issue-1">Issue 1</a>
            <a href="/comic/x/issue-7"><img src="/c.jpg"></a>"#;
        let chapters = parse_chapters(html, "x");
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].id, "issue-7");
        assert_eq!(chapters[0].chap_num, 7.0);
        assert_eq!(chapters[0].name, "Issue 7");
    }

    #[test]
    fn test_other_comics_issues_are_ignored() {
        let html = r#"<ul>
            <li><a href="/comic/x/issue-1">Issue 1</a></li>
            <li><a href="/comic/y/issue-9">Issue 9</a></li>
            <li><a href="https://xoxocomic.com/comic/x/issue-2">Issue 2</a></li>
        </ul>"#;
        let chapters = parse_chapters(html, "x");
        let ids: Vec<&str> = chapters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["issue-2", "issue-1"]);
        assert!(chapters.iter().all(|c| c.manga_id == "x"));
    }

    #[test]
    fn test_short_chapter_ids_are_dropped() {
        let html = r#"<a href="/comic/x/1">Read</a><a href="/comic/x/issue-2">Issue 2</a>"#;
        let chapters = parse_chapters(html, "x");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].id, "issue-2");
    }

    #[test]
    fn test_script_fallback() {
        let html = r#"<html><body><script>
            var pages = ["https://img.xoxocomic.com/x/1/001.jpg", 'https://cdn.example.com/ads/banner.png',
                         "https://img.xoxocomic.com/x/1/loading.gif", "https://img.xoxocomic.com/x/1/002.webp"];
        </script></body></html>"#;
        let details = parse_chapter_pages(html, "x", "issue-1", BASE);
        assert_eq!(
            details.pages,
            vec![
                "https://img.xoxocomic.com/x/1/001.jpg",
                "https://img.xoxocomic.com/x/1/002.webp"
            ]
        );
        assert!(!details.long_strip);
    }

    #[test]
    fn test_lazy_owl_fallback_listing() {
        let html = r#"<div class="owl">
            <a href="/comic/saga" title="Saga"><img class="lazyOwl" data-src="/covers/saga.jpg" alt=""></a>
            <a href="/"><img class="lazyOwl" src="/logo.png" alt="XoXo Logo"></a>
        </div>"#;
        let tiles = parse_listing(html, BASE, SEARCH_LIMIT);
        assert_eq!(
            tiles,
            vec![MangaTile {
                id: "saga".into(),
                title: "Saga".into(),
                image: "https://xoxocomic.com/covers/saga.jpg".into(),
            }]
        );
    }

    #[test]
    fn test_listing_cap() {
        let html: String = (0..30)
            .map(|i| {
                format!(
                    r#"<article class="post"><a href="/comic/c{i}/"><img src="/{i}.jpg"></a><h2>C {i}</h2></article>"#
                )
            })
            .collect();
        assert_eq!(parse_listing(&html, BASE, HOME_SECTION_LIMIT).len(), 20);
        assert_eq!(parse_listing(&html, BASE, SEARCH_LIMIT).len(), 30);
    }
}
