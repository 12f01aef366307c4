//! Chunked bulk-ingestion pipeline
//!
//! Drives one snapshot load end to end: pull decoded records, normalize
//! them, group them into fixed-size batches, submit each batch as one bulk
//! upsert, and keep count of what the index service accepted.
//!
//! Failure containment is deliberately blunt. A batch that is accepted only
//! partially stops the run cleanly with the count accumulated so far; the
//! remedy is to re-run the whole pipeline, which is safe because every
//! document is upserted under its stable `urlh`. Decode and normalization
//! errors abort the run with an error.

use crate::decode;
use crate::index::{BulkIndex, UpsertAction};
use crate::model::{CrawledEntity, RawRecord};
use crawldex_common::{CrawldexError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Default number of upsert actions per bulk call.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Tuning knobs for one export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Number of actions per bulk call. Only batches of exactly this size
    /// are submitted (but see `flush_trailing`).
    pub batch_size: usize,

    /// Stop pulling records once this many have been submitted. Checked
    /// against the post-batch submitted count, so stopping happens at batch
    /// boundaries and may overshoot by up to `batch_size - 1` records.
    pub stop_after: Option<u64>,

    /// Submit a final undersized batch when the input ends mid-batch.
    ///
    /// Off by default: the historical loader silently dropped up to
    /// `batch_size - 1` trailing records, and consumers of the success
    /// count rely on that boundary. Turn this on to index every record.
    pub flush_trailing: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            stop_after: None,
            flush_trailing: false,
        }
    }
}

/// Decode `path` and load its records into `index`.
///
/// Returns the number of records the index service accepted. A short count
/// (less than the file's record total) means the run stopped early on a
/// partial batch failure or a `stop_after` threshold and should be re-run
/// if completeness matters.
pub async fn export_file(
    client: &dyn BulkIndex,
    path: impl AsRef<Path>,
    index: &str,
    options: &ExportOptions,
) -> Result<u64> {
    let path = path.as_ref();
    info!(file = %path.display(), index, batch_size = options.batch_size, "starting export");

    let records = decode::snapshot_records(path)?;
    export_records(client, records, index, options).await
}

/// Load an already-decoded record sequence into `index`.
///
/// Split out from [`export_file`] so the batching behavior can be exercised
/// against in-memory record sequences and fake index services.
pub async fn export_records<I>(
    client: &dyn BulkIndex,
    records: I,
    index: &str,
    options: &ExportOptions,
) -> Result<u64>
where
    I: IntoIterator<Item = Result<RawRecord>>,
{
    if options.batch_size == 0 {
        return Err(CrawldexError::config("batch_size must be positive"));
    }

    let mut submitted: u64 = 0;
    let mut successful: u64 = 0;
    let mut batch: Vec<UpsertAction> = Vec::with_capacity(options.batch_size);

    for record in records {
        let entity = CrawledEntity::from_raw(&record?)?;
        batch.push(UpsertAction {
            id: entity.urlh.clone(),
            doc: serde_json::to_value(&entity)?,
        });

        if batch.len() == options.batch_size {
            let accepted = client.bulk_upsert(index, &batch).await?;
            if accepted != batch.len() {
                warn!(
                    accepted,
                    batch_size = batch.len(),
                    successful,
                    "bulk upsert partially accepted, stopping; re-run to recover"
                );
                return Ok(successful);
            }

            submitted += batch.len() as u64;
            successful += accepted as u64;
            debug!(submitted, "batch indexed");
            batch.clear();
        }

        if let Some(limit) = options.stop_after {
            if submitted >= limit {
                info!(submitted, limit, "stop threshold reached");
                return Ok(successful);
            }
        }
    }

    if options.flush_trailing && !batch.is_empty() {
        let accepted = client.bulk_upsert(index, &batch).await?;
        if accepted != batch.len() {
            warn!(
                accepted,
                batch_size = batch.len(),
                successful,
                "trailing bulk upsert partially accepted"
            );
            return Ok(successful);
        }
        successful += accepted as u64;
    }

    info!(successful, index, "export finished");
    Ok(successful)
}
