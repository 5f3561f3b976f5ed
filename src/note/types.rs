//! Unified note types
//!
//! Format-agnostic note records produced by reader adapters. Field
//! names serialize in camelCase for interchange with the web frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The e-reader application a note came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceApp {
    /// MoonReader (`.an` containers synced over WebDAV)
    MoonReader,
    /// AnxReader (SQLite database; adapter lives outside this crate)
    AnxReader,
}

impl fmt::Display for SourceApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceApp::MoonReader => write!(f, "MoonReader"),
            SourceApp::AnxReader => write!(f, "AnxReader"),
        }
    }
}

/// A single highlight/annotation in unified form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedNote {
    /// Identifier derived from the source record; unique within one
    /// decoded file, not globally
    pub id: String,
    /// Book display title; may be overwritten by metadata enrichment
    pub book_title: String,
    /// Chapter label; MoonReader stores only a numeric index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    /// Highlighted passage (may be empty when only a note was taken)
    pub highlight: String,
    /// Free-form annotation typed by the reader
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Coarse position estimate, not a true page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Book author from the metadata sidecar, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Creation time; the Unix epoch stands in for "no timestamp"
    pub created_at: DateTime<Utc>,
    /// Producing application
    pub source_app: SourceApp,
    /// Raw source lines kept for troubleshooting
    pub source_lines: Vec<String>,
}
