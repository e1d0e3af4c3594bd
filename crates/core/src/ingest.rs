use crate::chunking::build_page_chunks;
use crate::extractor::{LopdfExtractor, PdfExtractor};
use crate::{DocumentFingerprint, IngestError, IngestionOptions, PageChunk};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub fn discover_pdf_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdf = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

pub fn digest_file(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[derive(Debug, Clone)]
pub struct SkippedPdf {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    pub chunks: Vec<PageChunk>,
    pub skipped_files: Vec<SkippedPdf>,
}

pub fn ingest_folder_chunks_best_effort(
    folder: &Path,
    options: IngestionOptions,
) -> Result<IngestionReport, IngestError> {
    ingest_folder_with(&LopdfExtractor, folder, options)
}

/// Chunks every PDF under `folder`, recording unreadable files instead of failing.
pub fn ingest_folder_with<E: PdfExtractor>(
    extractor: &E,
    folder: &Path,
    options: IngestionOptions,
) -> Result<IngestionReport, IngestError> {
    crate::ChunkingConfig::from(options).validate()?;

    let files = discover_pdf_files(folder);

    if files.is_empty() {
        return Err(IngestError::InvalidArgument(format!(
            "no pdf files found in {}",
            folder.display()
        )));
    }

    let mut result = Vec::new();
    let mut skipped_files = Vec::new();
    let mut cursor = 0u64;

    for path in files {
        let build_result = (|| {
            let fingerprint = build_document_fingerprint(&path)?;
            let pages = extractor.extract_pages(&path)?;
            let mut chunks = Vec::new();
            let mut next = cursor;

            for page in pages {
                let (page_chunks, next_cursor) =
                    build_page_chunks(&fingerprint, page.number, &page.text, &options, next)?;

                next = next_cursor;
                chunks.extend(page_chunks);
            }

            Ok::<_, IngestError>((chunks, next))
        })();

        match build_result {
            Ok((file_chunks, next)) => {
                debug!(path = %path.display(), chunks = file_chunks.len(), "chunked pdf");
                cursor = next;
                result.extend(file_chunks);
            }
            Err(error) => skipped_files.push(SkippedPdf {
                path,
                reason: error.to_string(),
            }),
        }
    }

    Ok(IngestionReport {
        chunks: result,
        skipped_files,
    })
}

/// Chunks a plain-text file as a single page.
pub fn ingest_text_file(path: &Path, options: IngestionOptions) -> Result<Vec<PageChunk>, IngestError> {
    let fingerprint = build_document_fingerprint(path)?;
    let text = fs::read_to_string(path)?;
    let (chunks, _) = build_page_chunks(&fingerprint, 1, &text, &options, 0)?;
    Ok(chunks)
}

pub fn build_document_fingerprint(path: &Path) -> Result<DocumentFingerprint, IngestError> {
    let checksum = digest_file(path)?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            IngestError::MissingFileName(format!("path missing filename: {}", path.display()))
        })?;

    Ok(DocumentFingerprint {
        document_id: generate_document_id(path),
        document_title: name.to_string(),
        source_path: path.to_string_lossy().to_string(),
        checksum,
        ingested_at: Utc::now(),
    })
}

fn generate_document_id(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::{
        digest_file, discover_pdf_files, ingest_folder_chunks_best_effort, ingest_folder_with,
        ingest_text_file,
    };
    use crate::extractor::{PageText, PdfExtractor};
    use crate::{IngestError, IngestionOptions};
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    struct FakeExtractor;

    impl PdfExtractor for FakeExtractor {
        fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, IngestError> {
            if path.file_name().and_then(|name| name.to_str()) == Some("bad.pdf") {
                return Err(IngestError::PdfParse("unreadable".to_string()));
            }

            Ok(vec![
                PageText {
                    number: 1,
                    text: "Torque the flange bolts in a star pattern.".to_string(),
                },
                PageText {
                    number: 2,
                    text: "Check the gauge reading after every cycle.".to_string(),
                },
            ])
        }
    }

    #[test]
    fn discover_pdf_files_is_recursive() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let base = dir.path();
        let nested = base.join("nested");
        fs::create_dir(&nested)?;

        File::create(base.join("a.pdf")).and_then(|mut file| file.write_all(b"%PDF-1.4\n%fake"))?;
        File::create(nested.join("b.PDF"))
            .and_then(|mut file| file.write_all(b"%PDF-1.4\n%fake"))?;
        fs::write(base.join("notes.txt"), b"skip me")?;

        let files = discover_pdf_files(base);
        assert_eq!(files.len(), 2);
        Ok(())
    }

    #[test]
    fn checksum_is_reproducible() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file_path = dir.path().join("a.pdf");
        fs::write(&file_path, b"abc")?;

        let first = digest_file(&file_path)?;
        let second = digest_file(&file_path)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn ingestion_fails_without_pdfs() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let result = ingest_folder_chunks_best_effort(dir.path(), IngestionOptions::default());
        assert!(matches!(result, Err(IngestError::InvalidArgument(_))));
        Ok(())
    }

    #[test]
    fn best_effort_skips_unreadable_pdfs() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("unreadable.pdf"), b"%PDF-1.4\n%broken")?;

        let report = ingest_folder_chunks_best_effort(dir.path(), IngestionOptions::default())?;

        assert_eq!(report.chunks.len(), 0);
        assert_eq!(report.skipped_files.len(), 1);
        assert_eq!(
            report.skipped_files[0]
                .path
                .file_name()
                .and_then(|name| name.to_str()),
            Some("unreadable.pdf")
        );
        Ok(())
    }

    #[test]
    fn pages_are_chunked_with_global_indices() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.pdf"), b"first")?;
        fs::write(dir.path().join("bad.pdf"), b"second")?;
        fs::write(dir.path().join("c.pdf"), b"third")?;

        let report = ingest_folder_with(&FakeExtractor, dir.path(), IngestionOptions::default())?;

        assert_eq!(report.skipped_files.len(), 1);
        assert_eq!(report.chunks.len(), 4);
        let indices: Vec<u64> = report.chunks.iter().map(|chunk| chunk.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(report.chunks[1].page, 2);
        assert_eq!(report.chunks[1].chunk_seq, 1);
        assert!(report.chunks[2].source_path.ends_with("c.pdf"));
        Ok(())
    }

    #[test]
    fn invalid_chunk_size_fails_before_reading_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.pdf"), b"first")?;
        let options = IngestionOptions {
            chunk_size: 0,
            chunk_overlap: 0,
        };

        let result = ingest_folder_with(&FakeExtractor, dir.path(), options);
        assert!(matches!(result, Err(IngestError::InvalidChunkConfig(_))));
        Ok(())
    }

    #[test]
    fn text_files_are_chunked_as_one_page() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("notes.txt");
        fs::write(&path, "x".repeat(250))?;
        let options = IngestionOptions {
            chunk_size: 100,
            chunk_overlap: 20,
        };

        let chunks = ingest_text_file(&path, options)?;
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|chunk| chunk.page == 1));
        assert_eq!(chunks[2].chunk_seq, 3);
        Ok(())
    }
}
