use crate::error::IngestError;
use crate::models::{DocumentFingerprint, IngestionOptions, PageChunk, TextChunk};
use sha2::{Digest, Sha256};

pub const DEFAULT_CHUNK_SIZE: usize = 1_200;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// A period must sit past this fraction of `chunk_size` to become a cut point.
const SENTENCE_BOUNDARY_RATIO: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl From<IngestionOptions> for ChunkingConfig {
    fn from(value: IngestionOptions) -> Self {
        Self {
            chunk_size: value.chunk_size,
            overlap: value.chunk_overlap,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, IngestError> {
        let config = Self {
            chunk_size,
            overlap,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.chunk_size == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Overlap clamped below `chunk_size` so the cursor always moves forward.
    pub fn effective_overlap(&self) -> usize {
        self.overlap.min(self.chunk_size.saturating_sub(1))
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    text.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits `text` into overlapping chunks, preferring to cut just after a period.
///
/// Sizes and offsets count characters. Offsets refer to the trimmed input and
/// describe the window before its own whitespace was trimmed, so consecutive
/// spans overlap by `overlap` characters whenever a cut falls mid-text.
pub fn chunk_spans(text: &str, config: ChunkingConfig) -> Result<Vec<TextChunk>, IngestError> {
    config.validate()?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let total = chars.len();
    let overlap = config.effective_overlap();
    let threshold = SENTENCE_BOUNDARY_RATIO * config.chunk_size as f64;

    let mut spans = Vec::new();
    let mut start = 0usize;

    while start < total {
        let mut end = start.saturating_add(config.chunk_size).min(total);

        if end < total {
            let last_period = chars[start..end].iter().rposition(|ch| *ch == '.');
            if let Some(position) = last_period.filter(|position| *position as f64 > threshold) {
                end = start + position + 1;
            }
        }

        let window: String = chars[start..end].iter().collect();
        let piece = window.trim();
        if !piece.is_empty() {
            spans.push(TextChunk {
                seq: u32::try_from(spans.len() + 1).unwrap_or(u32::MAX),
                start,
                end,
                text: piece.to_string(),
            });
        }

        start = if end >= total {
            end
        } else {
            end.saturating_sub(overlap).max(start + 1)
        };
    }

    Ok(spans)
}

pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, IngestError> {
    let spans = chunk_spans(text, ChunkingConfig::new(chunk_size, overlap)?)?;
    Ok(spans.into_iter().map(|span| span.text).collect())
}

/// Chunks one page and binds every piece to its document.
///
/// Returns the chunks together with the next free global index.
pub fn build_page_chunks(
    document: &DocumentFingerprint,
    page: u32,
    page_text: &str,
    options: &IngestionOptions,
    global_index: u64,
) -> Result<(Vec<PageChunk>, u64), IngestError> {
    let config = ChunkingConfig::from(*options);
    let normalized = normalize_whitespace(page_text);

    let mut chunks = Vec::new();
    let mut cursor = global_index;

    for span in chunk_spans(&normalized, config)? {
        chunks.push(PageChunk {
            chunk_id: make_chunk_id(&document.document_id, page, span.seq, &span.text),
            document_id: document.document_id.clone(),
            source_path: document.source_path.clone(),
            title: document.document_title.clone(),
            page,
            chunk_seq: span.seq,
            chunk_index: cursor,
            text: span.text,
        });

        cursor = cursor.saturating_add(1);
    }

    Ok((chunks, cursor))
}

fn make_chunk_id(document_id: &str, page: u32, seq: u32, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document_id.as_bytes());
    hasher.update(page.to_le_bytes());
    hasher.update(seq.to_le_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
