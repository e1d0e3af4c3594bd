use crate::models::{IndexLayout, PageChunk, SearchHit, SearchQuery, TabularRecord};
use crate::SearchError;
use async_trait::async_trait;

/// A search index that can be (re)built and queried.
#[async_trait]
pub trait DocumentIndex {
    async fn index_exists(&self) -> Result<bool, SearchError>;

    async fn count(&self) -> Result<u64, SearchError>;

    /// Drops the index and recreates its mapping and ingest pipeline.
    async fn reset(&self, layout: IndexLayout) -> Result<(), SearchError>;

    async fn index_records(&self, records: &[TabularRecord]) -> Result<usize, SearchError>;

    async fn index_page_chunks(&self, chunks: &[PageChunk]) -> Result<usize, SearchError>;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError>;
}
