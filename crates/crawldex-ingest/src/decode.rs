//! Lazy decoding of gzip-compressed JSON-lines snapshot files
//!
//! A snapshot file is a gzip stream whose decompressed content is UTF-8
//! text with one JSON object per line. Decoding is lazy and single-pass:
//! records come out one at a time, in file order, and the file handle is
//! owned by the iterator and released when it is exhausted or dropped.

use crate::model::RawRecord;
use crawldex_common::{CrawldexError, Result};
use flate2::read::GzDecoder;
use serde_jsonlines::JsonLinesReader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open a snapshot file and return a lazy iterator over its records.
///
/// Fail-fast: a corrupted gzip stream or a line that is not a valid JSON
/// object surfaces as an `Err` item at the point of failure. Nothing after
/// a failed item should be consumed; the pipeline aborts the run instead.
pub fn snapshot_records(path: impl AsRef<Path>) -> Result<impl Iterator<Item = Result<RawRecord>>> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(GzDecoder::new(file));

    Ok(JsonLinesReader::new(reader)
        .read_all::<RawRecord>()
        .map(|item| item.map_err(decode_error)))
}

/// Split decode failures back into the parse/IO taxonomy.
///
/// `serde-jsonlines` folds JSON parse errors into `std::io::Error`; unwrap
/// them so malformed lines and broken streams stay distinguishable.
fn decode_error(err: std::io::Error) -> CrawldexError {
    match err.downcast::<serde_json::Error>() {
        Ok(json_err) => CrawldexError::Json(json_err),
        Err(io_err) => CrawldexError::Io(io_err),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_snapshot(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
        path
    }

    #[test]
    fn test_yields_records_in_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(
            &dir,
            "t.json.gz",
            "{\"urlh\":\"a\"}\n{\"urlh\":\"b\"}\n{\"urlh\":\"c\"}\n",
        );

        let records: Vec<RawRecord> = snapshot_records(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records.len(), 3);
        let ids: Vec<_> = records
            .iter()
            .map(|r| r.get("urlh").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_snapshot_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir, "empty.json.gz", "");

        assert_eq!(snapshot_records(&path).unwrap().count(), 0);
    }

    #[test]
    fn test_malformed_line_fails_at_point_of_failure() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(
            &dir,
            "bad.json.gz",
            "{\"urlh\":\"a\"}\nnot json at all\n{\"urlh\":\"c\"}\n",
        );

        let mut records = snapshot_records(&path).unwrap();
        assert!(records.next().unwrap().is_ok());
        let err = records.next().unwrap().unwrap_err();
        assert!(matches!(err, CrawldexError::Json(_)));
    }

    #[test]
    fn test_corrupt_stream_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.json.gz");
        std::fs::write(&path, b"this is not a gzip stream").unwrap();

        let mut records = snapshot_records(&path).unwrap();
        assert!(records.next().unwrap().is_err());
    }

    #[test]
    fn test_missing_file_fails_on_open() {
        let dir = TempDir::new().unwrap();
        let result = snapshot_records(dir.path().join("absent.json.gz"));
        assert!(matches!(result.err(), Some(CrawldexError::Io(_))));
    }
}
