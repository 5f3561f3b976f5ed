//! MoonReader adapter
//!
//! Decodes `.an` containers and enriches the result with titles and
//! authors from the `books.sync` sidecar when one is available.

use super::ReaderAdapter;
use crate::error::Result;
use crate::moon::{self, BookIndex};
use crate::note::UnifiedNote;

/// Directory under the sync root that holds the `.an` note cache
pub const CACHE_DIR: &str = ".Moon+/Cache";

/// Book metadata sidecar path under the sync root
pub const BOOKS_SYNC_FILE: &str = ".Moon+/books.sync";

/// MoonReader `.an` adapter
#[derive(Debug, Default)]
pub struct MoonReaderAdapter {
    index: BookIndex,
}

impl MoonReaderAdapter {
    /// Adapter without book metadata; titles fall back to the book
    /// path recorded inside each container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter with an already-parsed metadata index
    pub fn with_index(index: BookIndex) -> Self {
        Self { index }
    }

    /// Builds an adapter from raw `books.sync` bytes, degrading to an
    /// empty index when the sidecar is unreadable. Metadata is a
    /// best-effort enrichment, never a hard dependency.
    pub fn from_books_sync(bytes: &[u8]) -> Self {
        match BookIndex::parse(bytes) {
            Ok(index) => {
                tracing::debug!(books = index.len(), "loaded books.sync metadata");
                Self { index }
            }
            Err(err) => {
                tracing::warn!(%err, "books.sync unreadable, using path-derived titles");
                Self::default()
            }
        }
    }

    pub fn book_index(&self) -> &BookIndex {
        &self.index
    }
}

impl ReaderAdapter for MoonReaderAdapter {
    fn name(&self) -> &'static str {
        "MoonReader"
    }

    fn matches(&self, filename: &str) -> bool {
        moon::strip_suffix_ignore_ascii_case(filename, ".an").is_some()
    }

    fn parse(&self, bytes: &[u8], filename: &str) -> Result<Vec<UnifiedNote>> {
        let text = moon::decode_an_bytes(bytes);
        let parsed = moon::parse_an_text(&text);
        let mut notes = parsed.notes;

        if let Some(meta) = self.index.get(filename) {
            for note in &mut notes {
                note.book_title = meta.book_name.clone();
                if !meta.author.is_empty() {
                    note.author = Some(meta.author.clone());
                }
            }
        }

        tracing::debug!(file = filename, notes = notes.len(), "decoded MoonReader container");
        Ok(notes)
    }
}
