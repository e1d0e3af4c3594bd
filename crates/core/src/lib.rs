pub mod chunking;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod models;
pub mod orchestrator;
pub mod stores;
pub mod tabular;
pub mod traits;

pub use chunking::{
    build_page_chunks, chunk_spans, chunk_text, normalize_whitespace, ChunkingConfig,
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};
pub use error::{IngestError, SearchError};
pub use extractor::{extract_page_texts, LopdfExtractor, PageText, PdfExtractor};
pub use ingest::{
    discover_pdf_files, ingest_folder_chunks_best_effort, ingest_folder_with, ingest_text_file,
    IngestionReport, SkippedPdf,
};
pub use models::{
    DocumentFingerprint, IndexBatch, IndexLayout, IngestionOptions, PageChunk, RetrievalMode,
    SearchHit, SearchQuery, SearchResult, SparseEmbedding, TabularRecord, TextChunk,
};
pub use orchestrator::{IndexStatus, SearchCoordinator};
pub use stores::{ElasticConfig, ElasticsearchStore, ModelWaitOptions};
pub use tabular::{load_records, ColumnRoles, ResolvedColumns};
pub use traits::DocumentIndex;
