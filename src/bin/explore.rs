//! Seed-paper exploration binary.
//!
//! Resolves a title against the arXiv API, gathers neighbor sets
//! published before and after the seed paper, indexes both sets into
//! similarity-searchable collections, and prints the papers most similar
//! to the seed from each set.
//!
//! # Examples
//!
//! Explore a paper with local embeddings:
//! ```bash
//! explore --title "Attention Is All You Need"
//! ```
//!
//! Persist the collections and use OpenAI embeddings:
//! ```bash
//! OPENAI_API_KEY=sk-... explore --title "Attention Is All You Need" \
//!     --embedding-provider openai --db-path papers.db
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use paperlens::{
    embedding::{
        fastembed::FastEmbedProvider, openai::OpenAiEmbedding, EmbeddingProvider, EmbeddingResult,
    },
    store::{
        memory::MemoryStore, sqlite::SqliteStore, QueryHit, StoreResult, StoredEntry, VectorStore,
    },
    ArxivClient, Direction, PaperIndex, PaperRecord, AFTER_COLLECTION, BEFORE_COLLECTION,
    DEFAULT_NEIGHBOR_LIMIT, DEFAULT_TOP_K,
};
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wrapper enum for embedding providers to allow dynamic dispatch
enum DynamicEmbeddingProvider {
    FastEmbed(FastEmbedProvider),
    OpenAi(OpenAiEmbedding),
}

#[async_trait]
impl EmbeddingProvider for DynamicEmbeddingProvider {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        match self {
            DynamicEmbeddingProvider::FastEmbed(p) => p.embed(text).await,
            DynamicEmbeddingProvider::OpenAi(p) => p.embed(text).await,
        }
    }

    async fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        match self {
            DynamicEmbeddingProvider::FastEmbed(p) => p.embed_batch(texts).await,
            DynamicEmbeddingProvider::OpenAi(p) => p.embed_batch(texts).await,
        }
    }

    fn dimension(&self) -> usize {
        match self {
            DynamicEmbeddingProvider::FastEmbed(p) => p.dimension(),
            DynamicEmbeddingProvider::OpenAi(p) => p.dimension(),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            DynamicEmbeddingProvider::FastEmbed(p) => p.model_name(),
            DynamicEmbeddingProvider::OpenAi(p) => p.model_name(),
        }
    }
}

/// Wrapper enum for vector stores to allow dynamic dispatch
enum DynamicStore {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

#[async_trait]
impl VectorStore for DynamicStore {
    async fn upsert(&self, collection: &str, entries: Vec<StoredEntry>) -> StoreResult<()> {
        match self {
            DynamicStore::Memory(s) => s.upsert(collection, entries).await,
            DynamicStore::Sqlite(s) => s.upsert(collection, entries).await,
        }
    }

    async fn query(&self, collection: &str, probe: &[f32], k: usize) -> StoreResult<Vec<QueryHit>> {
        match self {
            DynamicStore::Memory(s) => s.query(collection, probe, k).await,
            DynamicStore::Sqlite(s) => s.query(collection, probe, k).await,
        }
    }

    async fn count(&self, collection: &str) -> StoreResult<usize> {
        match self {
            DynamicStore::Memory(s) => s.count(collection).await,
            DynamicStore::Sqlite(s) => s.count(collection).await,
        }
    }
}

/// Embedding provider type
#[derive(Debug, Clone, ValueEnum)]
enum EmbeddingProviderType {
    /// Local embedding provider (default, no API key required)
    FastEmbed,
    /// OpenAI cloud-based embedding provider (requires OPENAI_API_KEY)
    OpenAi,
}

/// Explore a seed paper's temporal neighborhood
#[derive(Parser, Debug)]
#[command(
    name = "explore",
    version,
    about = "Fetch a paper, index its temporal neighbors, and rank the most similar ones",
    long_about = "Resolve a paper title against the arXiv API, gather papers published \
                  before and after it that share its categories and title keywords, index \
                  both sets into similarity-searchable collections, and print the closest \
                  matches from each.

EXAMPLES:
  Explore with local embeddings:
    explore --title \"Attention Is All You Need\"

  Persist collections across runs:
    explore --title \"Attention Is All You Need\" --db-path papers.db

  OpenAI embeddings, larger neighbor sets:
    OPENAI_API_KEY=sk-... explore --title \"...\" --embedding-provider open-ai --limit 100"
)]
struct Args {
    /// Seed paper title (prompted interactively when omitted)
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,

    /// Neighbor papers to request per direction
    #[arg(long, value_name = "N", default_value_t = DEFAULT_NEIGHBOR_LIMIT)]
    limit: usize,

    /// Similar papers to report per collection
    #[arg(long, value_name = "K", default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Persist collections to this SQLite database (in-memory when omitted)
    #[arg(long, value_name = "PATH")]
    db_path: Option<PathBuf>,

    /// Embedding provider to use
    #[arg(long, value_enum, default_value = "fast-embed")]
    embedding_provider: EmbeddingProviderType,

    /// Specific embedding model name (provider-dependent, optional)
    #[arg(long, value_name = "MODEL")]
    embedding_model: Option<String>,

    /// FastEmbed model cache directory
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<String>,

    /// Logging verbosity level
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

/// Initialize logging subsystem with the specified level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Create an embedding provider based on CLI arguments
fn create_embedding_provider(args: &Args) -> Result<DynamicEmbeddingProvider> {
    match args.embedding_provider {
        EmbeddingProviderType::FastEmbed => {
            info!("Initializing FastEmbed provider");
            let cache_dir = args.cache_dir.clone().or_else(|| {
                dirs::cache_dir().map(|p| p.join("fastembed").to_string_lossy().to_string())
            });
            let provider = FastEmbedProvider::new(None, cache_dir)
                .context("Failed to initialize FastEmbed provider")?;
            Ok(DynamicEmbeddingProvider::FastEmbed(provider))
        }
        EmbeddingProviderType::OpenAi => {
            info!("Initializing OpenAI embedding provider");
            let api_key = std::env::var("OPENAI_API_KEY").context(
                "OPENAI_API_KEY environment variable must be set when using the OpenAI provider",
            )?;
            Ok(DynamicEmbeddingProvider::OpenAi(OpenAiEmbedding::new(
                api_key,
                args.embedding_model.clone(),
            )))
        }
    }
}

fn create_store(db_path: Option<&PathBuf>) -> Result<DynamicStore> {
    match db_path {
        Some(path) => {
            debug!("Opening SQLite store at {path:?}");
            Ok(DynamicStore::Sqlite(
                SqliteStore::open(path).context("Failed to open SQLite store")?,
            ))
        }
        None => Ok(DynamicStore::Memory(MemoryStore::new())),
    }
}

fn prompt_for_title() -> Result<String> {
    let mut editor = DefaultEditor::new().context("Failed to start interactive prompt")?;
    let line = editor
        .readline("Enter the title of the research paper: ")
        .context("No title provided")?;
    Ok(line.trim().to_string())
}

fn results_table(hits: &[QueryHit]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Published").add_attribute(Attribute::Bold),
            Cell::new("Authors").add_attribute(Attribute::Bold),
        ]);
    for hit in hits {
        table.add_row(vec![
            hit.metadata.title.clone(),
            hit.metadata.published.clone(),
            hit.metadata.authors.clone(),
        ]);
    }
    table
}

fn indexing_progress(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} papers indexed")
            .expect("Invalid progress bar template")
            .progress_chars("##-"),
    );
    pb
}

async fn report_collection(
    index: &PaperIndex<DynamicEmbeddingProvider, DynamicStore>,
    collection: &str,
    label: &str,
    seed: &PaperRecord,
    top_k: usize,
) -> Result<()> {
    // An empty neighbor set never created its collection; report that
    // instead of querying into an error.
    let count = index
        .count(collection)
        .await
        .with_context(|| format!("Count of the {label} collection failed"))?;
    if count == 0 {
        println!("\nThe '{label}' set is empty.");
        return Ok(());
    }

    let hits = index
        .query_top_k(collection, &seed.probe_text(), top_k)
        .await
        .with_context(|| format!("Query against the {label} collection failed"))?;

    println!("\nTop {} similar papers from the '{label}' set:", hits.len());
    println!("{}", results_table(&hits));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!("CLI arguments: {args:?}");

    let title = match &args.title {
        Some(title) => title.trim().to_string(),
        None => prompt_for_title()?,
    };
    anyhow::ensure!(!title.is_empty(), "Paper title must not be empty");

    let client = ArxivClient::new().context("Failed to create arXiv client")?;

    info!("Searching for \"{title}\"");
    let seed = client
        .find_paper(&title)
        .await
        .context("Seed paper lookup failed")?;
    println!("\nMain paper: {}", seed.title);
    println!("Published on: {}", seed.published);

    let before = client
        .find_neighbors(&seed, Direction::Before, args.limit)
        .await
        .context("Neighbor search (before) failed")?;
    println!(
        "\nFound {} similar papers published before the main paper.",
        before.len()
    );

    let after = client
        .find_neighbors(&seed, Direction::After, args.limit)
        .await
        .context("Neighbor search (after) failed")?;
    println!(
        "Found {} similar papers published after the main paper.",
        after.len()
    );

    let embedder = create_embedding_provider(&args)?;
    let store = create_store(args.db_path.as_ref())?;
    let index = PaperIndex::new(embedder, store);

    let progress = indexing_progress(before.len() + after.len());
    let stats = index
        .index(BEFORE_COLLECTION, &before)
        .await
        .context("Indexing the before collection failed")?;
    progress.inc(stats.indexed as u64);
    let stats = index
        .index(AFTER_COLLECTION, &after)
        .await
        .context("Indexing the after collection failed")?;
    progress.inc(stats.indexed as u64);
    progress.finish();

    println!("\nPapers added to both collections.");

    report_collection(&index, BEFORE_COLLECTION, "before", &seed, args.top_k).await?;
    report_collection(&index, AFTER_COLLECTION, "after", &seed, args.top_k).await?;

    Ok(())
}
