//! Sync-tree note scanner
//!
//! Walks one reader's sync tree through a [`SyncSource`], decodes
//! every matching note file and aggregates the results. A file that
//! fails to fetch or decode contributes zero notes and is logged; one
//! bad file must never abort the scan.

use std::time::Instant;

use super::{aggregate, Library};
use crate::adapter::{MoonReaderAdapter, ReaderAdapter, BOOKS_SYNC_FILE, CACHE_DIR};
use crate::error::Result;
use crate::storage::{EntryKind, SyncSource};

/// Scanner for a MoonReader sync tree
pub struct LibraryScanner<S: SyncSource> {
    source: S,
    sync_root: String,
}

impl<S: SyncSource> LibraryScanner<S> {
    pub fn new(source: S, sync_root: impl Into<String>) -> Self {
        Self {
            source,
            sync_root: sync_root.into(),
        }
    }

    /// Scans the tree and returns the aggregated library.
    ///
    /// `books.sync` is loaded best-effort; when it is missing or
    /// unreadable, titles fall back to the paths recorded inside the
    /// note containers.
    pub fn scan(&self) -> Result<Library> {
        tracing::info!(root = %self.sync_root, "starting note scan");
        let start = Instant::now();

        let adapter = match self.source.fetch_file(&self.join(BOOKS_SYNC_FILE)) {
            Ok(bytes) => MoonReaderAdapter::from_books_sync(&bytes),
            Err(err) => {
                tracing::warn!(%err, "books.sync unavailable, using path-derived titles");
                MoonReaderAdapter::new()
            }
        };

        let mut entries = self.source.list_directory(&self.cache_dir())?;
        // Newest first, entries without a timestamp last.
        entries.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        tracing::info!(entries = entries.len(), "listed note cache");

        let mut notes = Vec::new();
        let mut decoded = 0usize;
        let mut failed = 0usize;
        for entry in entries
            .iter()
            .filter(|e| e.kind == EntryKind::File && adapter.matches(&e.name))
        {
            match self
                .source
                .fetch_file(&entry.path)
                .and_then(|bytes| adapter.parse(&bytes, &entry.name))
            {
                Ok(mut file_notes) => {
                    decoded += 1;
                    notes.append(&mut file_notes);
                }
                Err(err) => {
                    failed += 1;
                    tracing::warn!(file = %entry.name, %err, "failed to decode note file, skipping");
                }
            }
        }

        tracing::info!(
            files = decoded,
            failed,
            notes = notes.len(),
            elapsed = ?start.elapsed(),
            "note scan complete"
        );
        Ok(aggregate(notes))
    }

    /// The `.an` cache directory; a root already pointing at the
    /// cache is used as-is.
    fn cache_dir(&self) -> String {
        let root = self.sync_root.trim_end_matches('/');
        if root.ends_with(CACHE_DIR) {
            root.to_string()
        } else {
            self.join(CACHE_DIR)
        }
    }

    fn join(&self, rel: &str) -> String {
        format!("{}/{}", self.sync_root.trim_end_matches('/'), rel)
    }
}
