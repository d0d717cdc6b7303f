use crate::error::SourceResult;
use crate::models::{
    Chapter, ChapterDetails, HomeSection, Manga, PageMetadata, PagedResults, SearchRequest,
    SourceInfo, TagSection,
};
use async_trait::async_trait;

pub mod xoxocomics;

pub use xoxocomics::{XoXoComics, XOXOCOMICS_INFO};

/// The capability set a comic reader host drives.
///
/// Every call performs at most one fetch and holds no state afterwards, so
/// implementations can be shared across concurrent calls.
#[async_trait]
pub trait Source: Send + Sync {
    fn info(&self) -> &SourceInfo;

    async fn get_manga_details(&self, manga_id: &str) -> SourceResult<Manga>;

    /// Chapters ordered newest first
    async fn get_chapters(&self, manga_id: &str) -> SourceResult<Vec<Chapter>>;

    async fn get_chapter_details(
        &self,
        manga_id: &str,
        chapter_id: &str,
    ) -> SourceResult<ChapterDetails>;

    async fn get_search_results(
        &self,
        query: &SearchRequest,
        metadata: Option<PageMetadata>,
    ) -> SourceResult<PagedResults>;

    /// Hands each shelf to `sink` as it is built. Never fails: a page that
    /// cannot be fetched simply yields no shelves.
    async fn get_home_page_sections(&self, sink: &mut (dyn FnMut(HomeSection) + Send));

    async fn get_view_more_items(
        &self,
        _section_id: &str,
        _metadata: Option<PageMetadata>,
    ) -> SourceResult<PagedResults> {
        Ok(PagedResults::default())
    }

    async fn get_search_tags(&self) -> SourceResult<Vec<TagSection>> {
        Ok(Vec::new())
    }
}
