//! Crawldex Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging setup for the crawldex workspace.

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CrawldexError, Result};
