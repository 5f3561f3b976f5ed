//! In-memory sync source
//!
//! Holds a sync tree as a path → bytes map. Intended for tests and
//! fixtures of downstream crates; directory structure is implied by
//! `/`-separated keys.

use std::collections::{BTreeMap, BTreeSet};

use super::{EntryKind, RemoteEntry, SyncSource};
use crate::error::{NoteError, Result};

/// Sync source backed by an in-memory map
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file under a `/`-separated path
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files
            .insert(normalize(&path.into()).to_string(), bytes.into());
    }
}

fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

impl SyncSource for MemorySource {
    fn fetch_file(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(normalize(path))
            .cloned()
            .ok_or_else(|| NoteError::NotFound(path.to_string()))
    }

    fn list_directory(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let dir = normalize(path);
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut seen = BTreeSet::new();
        let mut entries = Vec::new();
        for (key, bytes) in &self.files {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                None => {
                    entries.push(RemoteEntry {
                        name: rest.to_string(),
                        path: format!("{prefix}{rest}"),
                        kind: EntryKind::File,
                        last_modified: None,
                        size: Some(bytes.len() as u64),
                    });
                }
                Some((child, _)) => {
                    if seen.insert(child.to_string()) {
                        entries.push(RemoteEntry {
                            name: child.to_string(),
                            path: format!("{prefix}{child}"),
                            kind: EntryKind::Directory,
                            last_modified: None,
                            size: None,
                        });
                    }
                }
            }
        }

        if entries.is_empty() {
            return Err(NoteError::NotFound(path.to_string()));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert(".Moon+/Cache/a.an", b"aa".to_vec());
        source.insert(".Moon+/Cache/b.an", b"b".to_vec());
        source.insert(".Moon+/books.sync", b"meta".to_vec());
        source
    }

    #[test]
    fn test_fetch_normalizes_leading_slash() {
        let source = sample();
        assert_eq!(source.fetch_file("/.Moon+/books.sync").unwrap(), b"meta");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        assert!(matches!(
            sample().fetch_file(".Moon+/Cache/c.an"),
            Err(NoteError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_direct_children_only() {
        let source = sample();
        let entries = source.list_directory(".Moon+/Cache").unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.kind == EntryKind::File));

        let parent = source.list_directory(".Moon+").unwrap();
        let names: Vec<_> = parent.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"Cache"));
        assert!(names.contains(&"books.sync"));
    }

    #[test]
    fn test_list_missing_directory_is_not_found() {
        assert!(sample().list_directory("elsewhere").is_err());
    }
}
