use chrono::Utc;
use clap::{Parser, Subcommand};
use elser_search_core::tabular::TIMESTAMP_FIELD;
use elser_search_core::{
    ingest_folder_chunks_best_effort, ingest_text_file, load_records, ColumnRoles,
    DocumentIndex, ElasticConfig, ElasticsearchStore, IndexBatch, IndexLayout, IndexStatus,
    IngestionOptions, ModelWaitOptions, RetrievalMode, SearchCoordinator, SearchError,
    SearchQuery, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "elser-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Elasticsearch base URL
    #[arg(long, env = "ES_URL", default_value = "http://localhost:9200")]
    es_url: String,

    /// Elasticsearch username
    #[arg(long, env = "ES_USER", default_value = "elastic")]
    es_user: String,

    /// Elasticsearch password
    #[arg(long, env = "ES_PASS", default_value = "changeme", hide_env_values = true)]
    es_pass: String,

    /// Index name
    #[arg(long, env = "ES_INDEX", default_value = "chat_elser_description_only")]
    index_name: String,

    /// Ingest pipeline id
    #[arg(long, env = "ES_PIPELINE", default_value = "elser_v2_description_only")]
    pipeline_id: String,

    /// ELSER trained model id
    #[arg(long, env = "ELSER_MODEL_ID", default_value = ".elser_model_2_linux-x86_64")]
    model_id: String,

    /// Text column to index and search
    #[arg(long, env = "ES_TEXT_FIELD", default_value = "Description")]
    col: String,

    /// Request timeout in seconds
    #[arg(long, env = "ES_TIMEOUT", default_value = "120")]
    request_timeout_secs: u64,

    /// Verify TLS certificates
    #[arg(long, default_value_t = false)]
    verify_certs: bool,

    /// Skip ELSER entirely and use BM25 only
    #[arg(long, default_value_t = false)]
    bm25_only: bool,
}

impl Cli {
    fn elastic_config(&self) -> ElasticConfig {
        ElasticConfig {
            endpoint: self.es_url.clone(),
            username: self.es_user.clone(),
            password: self.es_pass.clone(),
            index_name: self.index_name.clone(),
            pipeline_id: self.pipeline_id.clone(),
            model_id: self.model_id.clone(),
            text_field: self.col.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            verify_certs: self.verify_certs,
            use_ml: !self.bm25_only,
            ..ElasticConfig::default()
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Deploy the ELSER model and create the ingest pipeline and index.
    Setup {
        /// Do not download or start the model.
        #[arg(long, default_value_t = false)]
        skip_model: bool,
        /// Index the page-chunk layout instead of the tabular one.
        #[arg(long, default_value_t = false)]
        pdf_layout: bool,
    },
    /// Index rows from a CSV or JSON Lines file.
    IngestTable {
        /// Path to a .csv, .jsonl or .ndjson file.
        #[arg(long, short = 'f')]
        file: PathBuf,
        /// Column whose value becomes the document id.
        #[arg(long)]
        id_field: Option<String>,
        /// Recreate the index and re-ingest the file.
        #[arg(long, default_value_t = false)]
        reindex: bool,
    },
    /// Chunk every PDF under a folder and index the chunks.
    IngestPdf {
        /// Folder that contains PDFs recursively.
        #[arg(long)]
        folder: PathBuf,
        /// Target characters per chunk.
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
        /// Characters shared by consecutive chunks.
        #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
        overlap: usize,
        /// Recreate the index and re-ingest the folder.
        #[arg(long, default_value_t = false)]
        reindex: bool,
    },
    /// Run one query, or start an interactive prompt when no query is given.
    Search {
        /// Query text.
        #[arg(long, short = 'q')]
        query: Option<String>,
        /// Number of hits to return.
        #[arg(long, default_value = "10")]
        size: usize,
    },
    /// Print the chunks a text file would be split into.
    Chunk {
        #[arg(long, short = 'f')]
        file: PathBuf,
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
        #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
        overlap: usize,
    },
    /// Show the heaviest ELSER tokens for a piece of text.
    Expand {
        #[arg(long)]
        text: String,
        #[arg(long, default_value = "20")]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "elser-search boot"
    );

    if let Command::Chunk {
        file,
        chunk_size,
        overlap,
    } = &cli.command
    {
        let options = IngestionOptions {
            chunk_size: *chunk_size,
            chunk_overlap: *overlap,
        };
        for chunk in ingest_text_file(file, options)? {
            println!(
                "--- chunk {} ({} chars)",
                chunk.chunk_seq,
                chunk.text.chars().count()
            );
            println!("{}", chunk.text);
        }
        return Ok(());
    }

    let store = ElasticsearchStore::new(cli.elastic_config())?;
    let mode = if cli.bm25_only {
        RetrievalMode::Bm25Only
    } else {
        RetrievalMode::Hybrid
    };

    match cli.command {
        Command::Setup {
            skip_model,
            pdf_layout,
        } => {
            if !skip_model && !cli.bm25_only {
                store.ensure_model(ModelWaitOptions::default()).await?;
            }
            store.ensure_pipeline().await?;
            let layout = if pdf_layout {
                IndexLayout::PageChunks
            } else {
                IndexLayout::Records
            };
            store.ensure_index(layout).await?;
            println!("index '{}' is ready", cli.index_name);
        }
        Command::IngestTable {
            file,
            id_field,
            reindex,
        } => {
            let roles = ColumnRoles::default()
                .with_text_column(cli.col.clone())
                .with_id_column(id_field);
            let coordinator = SearchCoordinator::new(store);

            let status = coordinator
                .ensure_indexed(reindex, || {
                    let records = load_records(&file, &roles)?;
                    info!(file = %file.display(), rows = records.len(), "loaded rows");
                    Ok(IndexBatch::Records(records))
                })
                .await?;
            report_status(&cli.index_name, status);
        }
        Command::IngestPdf {
            folder,
            chunk_size,
            overlap,
            reindex,
        } => {
            let options = IngestionOptions {
                chunk_size,
                chunk_overlap: overlap,
            };
            let coordinator = SearchCoordinator::new(store);

            let status = coordinator
                .ensure_indexed(reindex, || {
                    let report = ingest_folder_chunks_best_effort(&folder, options)?;
                    for skipped in &report.skipped_files {
                        warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped pdf");
                    }
                    info!(folder = %folder.display(), chunk_count = report.chunks.len(), "chunked pdfs");
                    Ok(IndexBatch::PageChunks(report.chunks))
                })
                .await?;
            report_status(&cli.index_name, status);
        }
        Command::Search { query, size } => {
            let coordinator = SearchCoordinator::new(store);
            if !coordinator.index().index_exists().await? {
                warn!(index = %cli.index_name, "index does not exist yet; run an ingest command first");
            }

            match query {
                Some(text) => {
                    println!("\n=== SEARCH RESULTS for: {text:?} ===");
                    run_query(&coordinator, &cli.col, &text, size, mode).await?;
                }
                None => interactive(&coordinator, &cli.col, size, mode).await?,
            }
        }
        Command::Expand { text, top } => {
            let embedding = store.infer_sparse(&text).await?;
            for (token, weight) in embedding.top(top) {
                println!("{weight:>8.4}  {token}");
            }
        }
        Command::Chunk { .. } => {}
    }

    Ok(())
}

fn report_status(index_name: &str, status: IndexStatus) {
    match status {
        IndexStatus::Reused { count } => {
            println!("using existing index '{index_name}' with {count} docs")
        }
        IndexStatus::Rebuilt { indexed, count } => println!(
            "indexed {indexed} docs into '{index_name}' ({count} total) at {}",
            Utc::now().to_rfc3339()
        ),
    }
}

async fn run_query(
    coordinator: &SearchCoordinator<ElasticsearchStore>,
    text_field: &str,
    text: &str,
    size: usize,
    mode: RetrievalMode,
) -> Result<(), SearchError> {
    let query = SearchQuery::new(text, size).with_mode(mode);
    let result = coordinator.search(&query).await?;

    if result.mode != query.mode {
        println!("(answered with {} fallback)", result.mode.as_str());
    }
    if result.hits.is_empty() {
        println!("(no matches)");
        return Ok(());
    }

    for hit in result.hits {
        println!("score={:.4} id={}", hit.score, hit.id);
        if let Some(timestamp) = hit.field_str(TIMESTAMP_FIELD) {
            println!("  timestamp={timestamp}");
        }
        if let Some(path) = hit.field_str("source_path") {
            let page = hit.source.get("page").and_then(|page| page.as_u64());
            println!("  source={path} page={}", page.unwrap_or_default());
        }
        if let Some(text) = hit.field_str(text_field) {
            println!("  {text}");
        }
    }

    Ok(())
}

async fn interactive(
    coordinator: &SearchCoordinator<ElasticsearchStore>,
    text_field: &str,
    size: usize,
    mode: RetrievalMode,
) -> anyhow::Result<()> {
    println!("\nInteractive mode. Type your query and press Enter.");
    println!("Commands: :quit to exit, :help for help.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("query> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!("\nExiting.");
            break;
        };

        let query = line.trim();
        match query {
            "" => continue,
            ":quit" | ":exit" => {
                println!("Exiting.");
                break;
            }
            ":help" | "help" | "?" => {
                println!("Enter any text to search. Use :quit to exit.");
                continue;
            }
            _ => {}
        }

        println!("\n=== SEARCH RESULTS for: {query:?} ===");
        if let Err(error) = run_query(coordinator, text_field, query, size, mode).await {
            warn!(%error, "query failed");
        }
        println!();
    }

    Ok(())
}
