use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Blue,
    Green,
    Grey,
    Yellow,
    Red,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentRating {
    Everyone,
    Mature,
    Adult,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SourceTag {
    pub text: &'static str,
    #[serde(rename = "type")]
    pub kind: TagType,
}

/// Static identity of a source, shown by the host in its source list
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub version: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub author: &'static str,
    pub author_website: &'static str,
    pub description: &'static str,
    #[serde(rename = "websiteBaseURL")]
    pub website_base_url: &'static str,
    pub content_rating: ContentRating,
    pub source_tags: &'static [SourceTag],
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MangaStatus {
    Ongoing,
    Completed,
    #[default]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub label: String,
}

impl Tag {
    /// A tag whose id and label are the same text
    pub fn from_label(label: &str) -> Self {
        Self {
            id: label.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TagSection {
    pub id: String,
    pub label: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Manga {
    pub id: String,
    /// Never empty: falls back to the id
    pub titles: Vec<String>,
    pub image: String,
    pub status: MangaStatus,
    pub author: String,
    pub artist: String,
    pub desc: String,
    pub tags: Vec<Tag>,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub manga_id: String,
    pub name: String,
    pub lang_code: String,
    pub chap_num: f64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDetails {
    pub id: String,
    pub manga_id: String,
    pub pages: Vec<String>,
    pub long_strip: bool,
}

/// The partial manga shown in search results and homepage shelves
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MangaTile {
    pub id: String,
    pub title: String,
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PageMetadata {
    pub page: u32,
}

impl PageMetadata {
    pub fn first() -> Self {
        Self { page: 1 }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PagedResults {
    pub results: Vec<MangaTile>,
    /// Cursor for the following page, `None` once a page comes back empty
    pub metadata: Option<PageMetadata>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SearchRequest {
    pub title: Option<String>,
}

impl SearchRequest {
    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HomeSection {
    pub id: String,
    pub title: String,
    pub items: Vec<MangaTile>,
    pub view_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_page_saturates() {
        assert_eq!(PageMetadata::first().next(), PageMetadata { page: 2 });
        let last = PageMetadata { page: u32::MAX };
        assert_eq!(last.next(), last);
    }
}
