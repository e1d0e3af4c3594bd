use crate::models::{IndexBatch, RetrievalMode, SearchQuery, SearchResult};
use crate::traits::DocumentIndex;
use crate::SearchError;
use tracing::{info, warn};

/// Outcome of [`SearchCoordinator::ensure_indexed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Reused { count: u64 },
    Rebuilt { indexed: usize, count: u64 },
}

impl IndexStatus {
    pub fn count(&self) -> u64 {
        match self {
            Self::Reused { count } | Self::Rebuilt { count, .. } => *count,
        }
    }
}

pub struct SearchCoordinator<I>
where
    I: DocumentIndex,
{
    index: I,
}

impl<I> SearchCoordinator<I>
where
    I: DocumentIndex + Send + Sync,
{
    pub fn new(index: I) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Runs the query, dropping to BM25-only when the service rejects hybrid.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        if query.text.trim().is_empty() {
            return Err(SearchError::Request(
                "provide a non-empty search question".to_string(),
            ));
        }

        let (mode, hits) = match self.index.search(query).await {
            Ok(hits) => (query.mode, hits),
            Err(SearchError::BackendResponse { details, .. })
                if query.mode == RetrievalMode::Hybrid =>
            {
                warn!(%details, "hybrid search rejected, retrying with bm25 only");
                let fallback = query.clone().with_mode(RetrievalMode::Bm25Only);
                (RetrievalMode::Bm25Only, self.index.search(&fallback).await?)
            }
            Err(error) => return Err(error),
        };

        Ok(SearchResult {
            query: query.text.clone(),
            mode,
            hits,
        })
    }

    /// Rebuilds the index from `load` when asked to, or when it is missing or empty.
    ///
    /// `load` only runs when a rebuild actually happens.
    pub async fn ensure_indexed<F>(&self, reindex: bool, load: F) -> Result<IndexStatus, SearchError>
    where
        F: FnOnce() -> Result<IndexBatch, SearchError> + Send,
    {
        let count = if self.index.index_exists().await? {
            self.index.count().await.unwrap_or(0)
        } else {
            0
        };

        if !reindex && count > 0 {
            return Ok(IndexStatus::Reused { count });
        }

        let batch = load()?;
        self.index.reset(batch.layout()).await?;

        let indexed = match &batch {
            IndexBatch::Records(records) => self.index.index_records(records).await?,
            IndexBatch::PageChunks(chunks) => self.index.index_page_chunks(chunks).await?,
        };

        let count = self.index.count().await?;
        info!(indexed, count, "index rebuilt");
        Ok(IndexStatus::Rebuilt { indexed, count })
    }
}
