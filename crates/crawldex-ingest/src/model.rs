//! Domain model for crawled retail records
//!
//! A snapshot file holds one JSON object per line. Each object is decoded
//! into a [`RawRecord`] and normalized into a [`CrawledEntity`] before it is
//! indexed.

use crawldex_common::{CrawldexError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One decoded snapshot line: an unordered map of loosely typed values.
///
/// Ephemeral; it only exists on the way from the decoder to the normalizer.
pub type RawRecord = serde_json::Map<String, Value>;

/// Normalized crawl record, immutable once built.
///
/// `urlh` uniquely identifies the document in the index: re-ingesting a
/// record with the same `urlh` overwrites the prior version instead of
/// duplicating it, which is what makes whole-file re-runs safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawledEntity {
    pub category: String,
    pub crawl_date: String,
    pub subcategory: String,
    pub title: String,
    pub mrp: f64,
    pub urlh: String,
    /// Status code as crawled; sources emit both `"200"` and `200`.
    pub http_status: Value,
    pub pack_size: String,
    pub available_price: f64,
}

impl CrawledEntity {
    /// Normalize one raw record into a typed entity.
    ///
    /// Pure and deterministic. A missing required key is a
    /// [`CrawldexError::MissingField`]; `mrp` and `available_price` default
    /// to `0.0` when missing, null, or empty, and any other non-numeric
    /// value is a [`CrawldexError::TypeConversion`]. There is no recovery
    /// upstream, so either error aborts the ingestion run.
    pub fn from_raw(raw: &RawRecord) -> Result<Self> {
        Ok(Self {
            category: text_field(raw, "category")?,
            crawl_date: text_field(raw, "crawl_date")?,
            subcategory: text_field(raw, "subcategory")?,
            title: text_field(raw, "title")?,
            mrp: float_field(raw, "mrp")?,
            urlh: text_field(raw, "urlh")?,
            http_status: required_field(raw, "http_status")?.clone(),
            pack_size: text_field(raw, "pack_size")?,
            available_price: float_field(raw, "available_price")?,
        })
    }
}

fn required_field<'a>(raw: &'a RawRecord, field: &str) -> Result<&'a Value> {
    raw.get(field)
        .ok_or_else(|| CrawldexError::missing_field(field))
}

fn text_field(raw: &RawRecord, field: &str) -> Result<String> {
    match required_field(raw, field)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(CrawldexError::type_conversion(field, other.to_string())),
    }
}

/// Coerce an optional numeric field.
///
/// Missing, null, and empty-string values all default to `0.0`, matching
/// how upstream crawlers emit unavailable prices. Numeric strings such as
/// `"12.5"` are accepted.
fn float_field(raw: &RawRecord, field: &str) -> Result<f64> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| CrawldexError::type_conversion(field, n.to_string())),
        Some(Value::String(s)) if s.is_empty() => Ok(0.0),
        Some(Value::String(s)) => s
            .parse::<f64>()
            .map_err(|_| CrawldexError::type_conversion(field, s.clone())),
        Some(other) => Err(CrawldexError::type_conversion(field, other.to_string())),
    }
}
