use crate::config::{Config, SearchUrlStyle};
use crate::error::SourceResult;
use crate::http_client::{Fetch, HttpFetcher};
use crate::models::{
    Chapter, ChapterDetails, ContentRating, HomeSection, Manga, MangaTile, PageMetadata,
    PagedResults, SearchRequest, SourceInfo, SourceTag, Tag, TagSection, TagType,
};
use crate::parser::{self, HOME_SECTION_LIMIT, SEARCH_LIMIT};
use crate::sources::Source;
use async_trait::async_trait;

pub static XOXOCOMICS_INFO: SourceInfo = SourceInfo {
    version: "1.0.0",
    name: "XoXoComics",
    icon: "icon.png",
    author: "Private Extension",
    author_website: "https://github.com/presdec/XoXoComics",
    description: "Extension for XoXoComics (Private Use Only)",
    website_base_url: crate::config::DEFAULT_BASE_URL,
    content_rating: ContentRating::Mature,
    source_tags: &[SourceTag {
        text: "Private",
        kind: TagType::Grey,
    }],
};

const GENRES: &[&str] = &["Action", "Romance", "Comedy", "Drama", "Fantasy", "Sci-Fi"];

/// Shelves that have a paged "view more" listing, and where it lives
fn view_more_path(section_id: &str) -> Option<&'static str> {
    match section_id {
        "trending" => Some("/trending-comic"),
        "hot" => Some("/hot-comic"),
        _ => None,
    }
}

pub struct XoXoComics<F = HttpFetcher> {
    config: Config,
    fetcher: F,
}

impl XoXoComics<HttpFetcher> {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }
}

impl<F: Fetch> XoXoComics<F> {
    /// Drive the source through any transport, e.g. a host-provided one
    pub fn with_fetcher(config: Config, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn base(&self) -> &str {
        &self.config.base_url
    }

    pub fn manga_url(&self, manga_id: &str) -> String {
        format!("{}/comic/{}", self.base(), manga_id)
    }

    pub fn chapter_url(&self, manga_id: &str, chapter_id: &str) -> String {
        format!("{}/comic/{}/{}", self.base(), manga_id, chapter_id)
    }

    pub fn search_url(&self, term: &str, page: u32) -> String {
        let term = urlencoding::encode(term);
        match self.config.search_style {
            SearchUrlStyle::Keyword => {
                format!("{}/search?keyword={}&page={}", self.base(), term, page)
            }
            SearchUrlStyle::WordPress => format!("{}/page/{}/?s={}", self.base(), page, term),
        }
    }

    fn paged(results: Vec<MangaTile>, page: PageMetadata) -> PagedResults {
        let metadata = (!results.is_empty()).then(|| page.next());
        PagedResults { results, metadata }
    }
}

#[async_trait]
impl<F: Fetch> Source for XoXoComics<F> {
    fn info(&self) -> &SourceInfo {
        &XOXOCOMICS_INFO
    }

    async fn get_manga_details(&self, manga_id: &str) -> SourceResult<Manga> {
        let html = self.fetcher.fetch(&self.manga_url(manga_id)).await?;
        Ok(parser::parse_manga_details(&html, manga_id, self.base()))
    }

    async fn get_chapters(&self, manga_id: &str) -> SourceResult<Vec<Chapter>> {
        let html = self.fetcher.fetch(&self.manga_url(manga_id)).await?;
        Ok(parser::parse_chapters(&html, manga_id))
    }

    async fn get_chapter_details(
        &self,
        manga_id: &str,
        chapter_id: &str,
    ) -> SourceResult<ChapterDetails> {
        let html = self.fetcher.fetch(&self.chapter_url(manga_id, chapter_id)).await?;
        Ok(parser::parse_chapter_pages(&html, manga_id, chapter_id, self.base()))
    }

    async fn get_search_results(
        &self,
        query: &SearchRequest,
        metadata: Option<PageMetadata>,
    ) -> SourceResult<PagedResults> {
        let page = metadata.unwrap_or_else(PageMetadata::first);
        let term = query.title.as_deref().unwrap_or_default().trim();
        let html = self.fetcher.fetch(&self.search_url(term, page.page)).await?;
        let results = parser::parse_listing(&html, self.base(), SEARCH_LIMIT);
        log::debug!("search {:?} page {}: {} results", term, page.page, results.len());
        Ok(Self::paged(results, page))
    }

    async fn get_home_page_sections(&self, sink: &mut (dyn FnMut(HomeSection) + Send)) {
        let url = format!("{}/", self.base());
        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Homepage unavailable, showing no sections: {}", e);
                return;
            }
        };
        for section in parser::parse_home_sections(&html, self.base()) {
            sink(section);
        }
    }

    async fn get_view_more_items(
        &self,
        section_id: &str,
        metadata: Option<PageMetadata>,
    ) -> SourceResult<PagedResults> {
        let Some(path) = view_more_path(section_id) else {
            log::debug!("No view more listing for section {}", section_id);
            return Ok(PagedResults::default());
        };
        let page = metadata.unwrap_or_else(PageMetadata::first);
        let url = format!("{}{}?page={}", self.base(), path, page.page);
        let html = self.fetcher.fetch(&url).await?;
        let results = parser::parse_listing(&html, self.base(), HOME_SECTION_LIMIT);
        Ok(Self::paged(results, page))
    }

    async fn get_search_tags(&self) -> SourceResult<Vec<TagSection>> {
        Ok(vec![TagSection {
            id: "genre".to_string(),
            label: "Genre".to_string(),
            tags: GENRES
                .iter()
                .map(|g| Tag {
                    id: g.to_lowercase(),
                    label: g.to_string(),
                })
                .collect(),
        }])
    }
}
