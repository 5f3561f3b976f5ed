//! Sync-source abstraction
//!
//! The application shell reaches the user's WebDAV share through an
//! authenticated proxy; that client stays outside this crate. The
//! scan layer only needs two operations, expressed here as a trait so
//! it can run against any file store: the real WebDAV client, a local
//! mirror of the sync tree, or an in-memory fixture in tests.

mod local;
mod memory;

pub use local::LocalSource;
pub use memory::MemorySource;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Entry kind reported by a sync source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// A directory listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    /// Base name of the entry
    pub name: String,
    /// Full path, usable with [`SyncSource::fetch_file`]
    pub path: String,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Read access to a sync tree
///
/// Implementations must be usable behind `&self` from multiple call
/// sites; the decoder holds no shared state across calls.
pub trait SyncSource: Send + Sync {
    /// Fetch the full content of one file
    fn fetch_file(&self, path: &str) -> Result<Vec<u8>>;

    /// List the entries of one directory (non-recursive)
    fn list_directory(&self, path: &str) -> Result<Vec<RemoteEntry>>;
}
