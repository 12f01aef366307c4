//! Crawldex Ingest Library
//!
//! Loads gzip-compressed JSON-lines crawl snapshots into a document search
//! index in fixed-size bulk-upsert batches.
//!
//! # Pipeline
//!
//! snapshot file → [`decode`] → [`model`] normalization → [`pipeline`]
//! batching → [`index`] bulk upserts. Every document is keyed by its stable
//! `urlh`, so re-running a whole load is idempotent.
//!
//! # Example
//!
//! ```no_run
//! use crawldex_ingest::index::HttpIndexClient;
//! use crawldex_ingest::pipeline::{export_file, ExportOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = HttpIndexClient::from_env()?;
//!     let successful = export_file(
//!         &client,
//!         "t.json.gz",
//!         "todays-crawled-data-index",
//!         &ExportOptions::default(),
//!     )
//!     .await?;
//!     tracing::info!(successful, "snapshot indexed");
//!     Ok(())
//! }
//! ```

pub mod decode;
pub mod index;
pub mod model;
pub mod pipeline;

pub use index::{BulkIndex, HttpIndexClient, UpsertAction};
pub use model::{CrawledEntity, RawRecord};
pub use pipeline::{export_file, export_records, ExportOptions, DEFAULT_BATCH_SIZE};
