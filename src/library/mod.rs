//! Library aggregation
//!
//! Folds decoded notes into a per-book shelf view: note counts,
//! authors, last-reading recency and the contributing source apps.
//! Notes sort newest first, books by most recent activity.

mod scanner;

pub use scanner::LibraryScanner;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::note::{SourceApp, UnifiedNote};

/// Per-book rollup of decoded notes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub note_count: usize,
    /// Most recent note timestamp (the epoch when none carried one)
    pub last_reading: DateTime<Utc>,
    /// Contributing apps, deduplicated, in first-seen order
    pub source_apps: Vec<SourceApp>,
}

/// Aggregated library: books by recency, notes newest first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub books: Vec<BookSummary>,
    pub notes: Vec<UnifiedNote>,
}

/// Groups notes into a [`Library`].
pub fn aggregate(mut notes: Vec<UnifiedNote>) -> Library {
    let mut books: Vec<BookSummary> = Vec::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();

    for note in &notes {
        let title = if note.book_title.is_empty() {
            "Unknown Book"
        } else {
            note.book_title.as_str()
        };
        let idx = *by_title.entry(title.to_string()).or_insert_with(|| {
            books.push(BookSummary {
                title: title.to_string(),
                author: None,
                note_count: 0,
                last_reading: note.created_at,
                source_apps: Vec::new(),
            });
            books.len() - 1
        });

        let book = &mut books[idx];
        book.note_count += 1;
        if note.created_at > book.last_reading {
            book.last_reading = note.created_at;
        }
        if book.author.is_none() {
            book.author = note.author.clone();
        }
        if !book.source_apps.contains(&note.source_app) {
            book.source_apps.push(note.source_app);
        }
    }

    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    books.sort_by(|a, b| b.last_reading.cmp(&a.last_reading));

    Library { books, notes }
}
