//! PDF keyword/video finder binary.
//!
//! Extracts the top keywords from a paper PDF and looks up one video per
//! keyword.
//!
//! # Examples
//!
//! ```bash
//! videos --pdf 1706.03762v7.pdf
//! videos --pdf paper.pdf --num-keywords 5
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use paperlens::video::{map_keywords_to_videos, ScrapedVideoSearch};
use paperlens::DEFAULT_NUM_KEYWORDS;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Find videos for a paper's keywords
#[derive(Parser, Debug)]
#[command(
    name = "videos",
    version,
    about = "Extract keywords from a paper PDF and find one video per keyword",
    long_about = "Extract the Methods, Introduction, and Conclusion sections of a paper \
                  PDF, rank candidate phrases by tf-idf, and look up one video per \
                  keyword on the video-search page.

EXAMPLES:
  Default keyword count:
    videos --pdf 1706.03762v7.pdf

  Fewer keywords, verbose logging:
    videos --pdf paper.pdf --num-keywords 5 --log-level debug"
)]
struct Args {
    /// Paper PDF to extract keywords from
    #[arg(long, value_name = "FILE")]
    pdf: PathBuf,

    /// Number of keywords to extract
    #[arg(long, value_name = "N", default_value_t = DEFAULT_NUM_KEYWORDS)]
    num_keywords: usize,

    /// Logging verbosity level
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);
    debug!("CLI arguments: {args:?}");

    anyhow::ensure!(args.pdf.exists(), "PDF not found: {:?}", args.pdf);

    let lookup = ScrapedVideoSearch::new();

    let map = map_keywords_to_videos(&args.pdf, &lookup, args.num_keywords)
        .await
        .context("Keyword extraction failed")?;

    if map.is_empty() {
        println!("No keywords could be extracted from {:?}.", args.pdf);
        return Ok(());
    }

    let keywords: Vec<&str> = map.iter().map(|(k, _)| k.as_str()).collect();
    println!("Extracted keywords: {}", keywords.join(", "));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Keyword").add_attribute(Attribute::Bold),
            Cell::new("Video").add_attribute(Attribute::Bold),
        ]);
    for (keyword, video) in &map {
        table.add_row(vec![
            keyword.clone(),
            video.clone().unwrap_or_else(|| "(no video found)".to_string()),
        ]);
    }
    println!("{table}");

    Ok(())
}
