//! Reader adapters
//!
//! One adapter per supported e-reader turns that reader's sync
//! artifacts into [`UnifiedNote`] records. The aggregation layer only
//! ever talks to the trait, so new readers plug in without touching
//! the scan or shelf code.

mod moon;

pub use moon::{MoonReaderAdapter, BOOKS_SYNC_FILE, CACHE_DIR};

use crate::error::Result;
use crate::note::UnifiedNote;

/// A decoder for one e-reader's note files
pub trait ReaderAdapter: Send + Sync {
    /// Human-readable reader name
    fn name(&self) -> &'static str;

    /// Whether this adapter handles the given file name
    fn matches(&self, filename: &str) -> bool;

    /// Decode one sync file into unified notes
    fn parse(&self, bytes: &[u8], filename: &str) -> Result<Vec<UnifiedNote>>;
}
