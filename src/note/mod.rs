//! Unified note model
//!
//! Every reader adapter decodes into the same note shape so the
//! aggregation layer can merge libraries across source applications.

mod types;

pub use types::{SourceApp, UnifiedNote};
