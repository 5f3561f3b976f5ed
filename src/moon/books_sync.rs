//! `books.sync` metadata sidecar
//!
//! MoonReader keeps a `books.sync` file next to the note cache with
//! one JSON object per book on the shelf. The `.an` container only
//! records a filesystem path, so this sidecar is the authoritative
//! source for the display title and author. It is always zlib
//! compressed; a single producer means no fallback cascade here.

use flate2::read::ZlibDecoder;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

use super::strip_suffix_ignore_ascii_case;
use crate::error::{NoteError, Result};

/// One book entry from `books.sync`. Fields beyond `filename`,
/// `bookName` and `author` pass through untouched for consumers that
/// render shelf details.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoonBookMetadata {
    pub add_time: String,
    pub author: String,
    pub book_name: String,
    pub category: String,
    pub description: String,
    pub download_url: String,
    pub filename: String,
    pub favorite: String,
    pub group_name: String,
    pub rate: String,
}

/// Lookup from normalized filename to book metadata
///
/// Keys are normalized with [`index_key`], so entries recorded as
/// `Title.epub` match cache files named `Title.epub.an`. The default
/// value is the empty index used when the sidecar is unavailable.
#[derive(Debug, Clone, Default)]
pub struct BookIndex {
    books: HashMap<String, MoonBookMetadata>,
}

impl BookIndex {
    /// Parses raw `books.sync` bytes: zlib inflate, then a JSON array
    /// of book objects. The last entry wins on duplicate filenames.
    ///
    /// Callers treat any error as "no metadata available" and fall
    /// back to path-derived titles; this is never fatal to a scan.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut text = String::new();
        ZlibDecoder::new(bytes)
            .read_to_string(&mut text)
            .map_err(|err| NoteError::Metadata(format!("books.sync inflate failed: {err}")))?;

        let books: Vec<MoonBookMetadata> = serde_json::from_str(&text)?;
        let mut map = HashMap::with_capacity(books.len());
        for book in books {
            map.insert(index_key(&book.filename).to_string(), book);
        }
        Ok(Self { books: map })
    }

    /// Looks up a book by any of its filename spellings (`Title`,
    /// `Title.epub`, `Title.epub.an`, with or without a leading path).
    pub fn get(&self, filename: &str) -> Option<&MoonBookMetadata> {
        self.books.get(index_key(filename))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Normalizes a filename to the index join key: basename with a
/// trailing `.an` and `.epub` stripped (ASCII case-insensitive).
fn index_key(filename: &str) -> &str {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    let base = strip_suffix_ignore_ascii_case(base, ".an").unwrap_or(base);
    strip_suffix_ignore_ascii_case(base, ".epub").unwrap_or(base)
}
