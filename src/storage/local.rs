//! Local-directory sync source
//!
//! Serves a sync tree from a directory on disk, e.g. a mounted or
//! mirrored copy of the WebDAV share. Used by the inspector binary.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

use super::{EntryKind, RemoteEntry, SyncSource};
use crate::error::Result;

/// Sync source over a local directory
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Paths from the scan layer are share-relative; a leading slash
    /// must not escape the root.
    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl SyncSource for LocalSource {
    fn fetch_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.resolve(path))?)
    }

    fn list_directory(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let dir = self.resolve(path);
        let base = path.trim_end_matches('/');

        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let metadata = entry.metadata()?;
            entries.push(RemoteEntry {
                path: format!("{base}/{name}"),
                kind: if metadata.is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                },
                last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                size: metadata.is_file().then(|| metadata.len()),
                name,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_and_list() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sync/.Moon+/Cache")).unwrap();
        fs::write(dir.path().join("sync/.Moon+/Cache/book.an"), b"bytes").unwrap();

        let source = LocalSource::new(dir.path());
        let entries = source.list_directory("sync/.Moon+/Cache").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "book.an");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[0].size, Some(5));
        assert!(entries[0].last_modified.is_some());

        let bytes = source.fetch_file(&entries[0].path).unwrap();
        assert_eq!(bytes, b"bytes");
    }

    #[test]
    fn test_leading_slash_stays_under_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("file.an"), b"x").unwrap();

        let source = LocalSource::new(dir.path());
        assert_eq!(source.fetch_file("/file.an").unwrap(), b"x");
    }

    #[test]
    fn test_directories_are_typed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tree/sub")).unwrap();
        fs::write(dir.path().join("tree/f"), b"x").unwrap();

        let source = LocalSource::new(dir.path());
        let mut entries = source.list_directory("tree").unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].kind, EntryKind::Directory);
        assert_eq!(entries[1].size, None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalSource::new(dir.path()).fetch_file("nope.an").is_err());
    }
}
