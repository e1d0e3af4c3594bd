use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFingerprint {
    pub document_id: String,
    pub document_title: String,
    pub source_path: String,
    pub checksum: String,
    pub ingested_at: DateTime<Utc>,
}

/// A span of a trimmed document produced by the chunker.
///
/// `start` and `end` are character offsets, not byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub seq: u32,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageChunk {
    pub chunk_id: String,
    pub document_id: String,
    pub source_path: String,
    pub title: String,
    pub page: u32,
    pub chunk_seq: u32,
    pub chunk_index: u64,
    pub text: String,
}

/// One tabular row ready for indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularRecord {
    pub id: Option<String>,
    pub source: Map<String, Value>,
}

/// Which mapping an index is created with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum IndexLayout {
    #[default]
    Records,
    PageChunks,
}

/// Documents staged for one bulk load.
#[derive(Debug, Clone)]
pub enum IndexBatch {
    Records(Vec<TabularRecord>),
    PageChunks(Vec<PageChunk>),
}

impl IndexBatch {
    pub fn layout(&self) -> IndexLayout {
        match self {
            Self::Records(_) => IndexLayout::Records,
            Self::PageChunks(_) => IndexLayout::PageChunks,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::PageChunks(chunks) => chunks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RetrievalMode {
    #[default]
    Hybrid,
    Bm25Only,
}

impl RetrievalMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::Bm25Only => "bm25",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub text: String,
    pub size: usize,
    pub mode: RetrievalMode,
    pub fields: Option<Vec<String>>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, size: usize) -> Self {
        Self {
            text: text.into(),
            size,
            mode: RetrievalMode::Hybrid,
            fields: None,
        }
    }

    pub fn with_mode(mut self, mode: RetrievalMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    pub source: Map<String, Value>,
}

impl SearchHit {
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.source.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub mode: RetrievalMode,
    pub hits: Vec<SearchHit>,
}

/// Token weights from a sparse-embedding inference, heaviest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseEmbedding {
    pub tokens: Vec<(String, f32)>,
}

impl SparseEmbedding {
    pub fn from_weights(weights: impl IntoIterator<Item = (String, f32)>) -> Self {
        let mut tokens: Vec<_> = weights.into_iter().collect();
        tokens.sort_by(|left, right| {
            right
                .1
                .total_cmp(&left.1)
                .then_with(|| left.0.cmp(&right.0))
        });
        Self { tokens }
    }

    pub fn top(&self, n: usize) -> &[(String, f32)] {
        &self.tokens[..n.min(self.tokens.len())]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IngestionOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1_200,
            chunk_overlap: 200,
        }
    }
}
