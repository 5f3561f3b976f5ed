//! Error types for the luna-notes library

use thiserror::Error;

/// Library-wide result type
pub type Result<T> = std::result::Result<T, NoteError>;

/// Library error type
///
/// Decoding malformed note data is never an error: bad sections are
/// skipped and missing fields default. Errors cover the surrounding
/// plumbing only (sync sources, the metadata sidecar).
#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
