//! Crawldex Ingest - snapshot loading tool

use anyhow::Result;
use clap::Parser;
use crawldex_common::logging::{init_logging, LogConfig, LogLevel};
use crawldex_ingest::index::HttpIndexClient;
use crawldex_ingest::pipeline::{export_file, ExportOptions, DEFAULT_BATCH_SIZE};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "crawldex-ingest")]
#[command(author, version, about = "Load crawl snapshots into a search index")]
struct Cli {
    /// Gzip-compressed JSON-lines snapshot file
    file: PathBuf,

    /// Target index name
    index: String,

    /// Upsert actions per bulk call
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Stop after this many records have been submitted
    #[arg(long)]
    stop_after: Option<u64>,

    /// Submit a final undersized batch instead of dropping it
    #[arg(long)]
    flush_trailing: bool,

    /// Index service base URL (defaults to CRAWLDEX_INDEX_URL)
    #[arg(long)]
    index_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("crawldex-ingest".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    let client = match cli.index_url {
        Some(url) => HttpIndexClient::new(url)?,
        None => HttpIndexClient::from_env()?,
    };

    let options = ExportOptions {
        batch_size: cli.batch_size,
        stop_after: cli.stop_after,
        flush_trailing: cli.flush_trailing,
    };

    let successful = export_file(&client, &cli.file, &cli.index, &options).await?;

    info!(successful, index = %cli.index, "export complete");
    Ok(())
}
