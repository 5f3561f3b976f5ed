//! MoonReader `.an` container decoding
//!
//! MoonReader syncs one `.an` file per book under `.Moon+/Cache/` on
//! the user's WebDAV share. The file is a compressed text container
//! with no format indicator byte; different app builds have shipped
//! raw-deflate, zlib and gzip framings, so decoding probes each in
//! turn before falling back to plain text.
//!
//! The decompressed text is a sequence of sections separated by a line
//! consisting solely of `#`:
//!
//! ```text
//! #
//! /storage/emulated/0/Books/My Book.epub     <- section 0: book path
//! <metadata>
//! #
//! 42137                                      <- line 0: record id seed
//! ...
//! 3                                          <- line 4: chapter index
//! ...
//! 4500                                       <- line 6: character offset
//! ...
//! 1700000000000                              <- line 9: epoch millis
//! 0                                          <- padding
//! A note the reader typed                    <- content block
//! The highlighted passage
//! #
//! ...
//! ```
//!
//! The number of padding lines between the fixed ten-line header and
//! the content block distinguishes a record with a typed annotation
//! from a plain highlight; see [`parse_an_text`] for the gap rule.
//!
//! A separate `books.sync` sidecar (always zlib) maps filenames to the
//! real book title and author; see [`BookIndex`].

mod books_sync;
mod decompress;
mod parser;

pub use books_sync::{BookIndex, MoonBookMetadata};
pub use decompress::decode_an_bytes;
pub use parser::{parse_an_text, ParsedAnFile};

/// Strips `suffix` from the end of `s`, ignoring ASCII case.
pub(crate) fn strip_suffix_ignore_ascii_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let (sb, xb) = (s.as_bytes(), suffix.as_bytes());
    if sb.len() >= xb.len() && sb[sb.len() - xb.len()..].eq_ignore_ascii_case(xb) {
        // The matched tail is ASCII, so the cut lands on a char boundary.
        Some(&s[..s.len() - suffix.len()])
    } else {
        None
    }
}
