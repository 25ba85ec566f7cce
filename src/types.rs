//! Shared types used by the build, the persisted index, and queries.
//!
//! [`Section`] is serialized into the index document verbatim and must keep
//! the same field names between the writer and the loader.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One documentation unit: a markdown file below a version root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Hierarchical `/`-separated identifier, unique within a version.
    pub slug: String,
    /// On-disk location at build time. Never persisted.
    #[serde(skip)]
    pub path: PathBuf,
    /// Path relative to the version root, `/`-separated.
    pub rel_path: String,
    pub title: String,
    pub description: String,
    /// Sort priority among siblings (ascending, ties by title).
    pub weight: i64,
    /// Alternate slugs accepted as synonyms.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// First hierarchy segment, empty for root-level sections.
    pub category: String,
    pub hierarchy: Vec<String>,
    /// True for a directory's landing page.
    pub is_index: bool,
}

/// Canonical sibling order: weight ascending, then title ascending.
pub fn sort_sections(sections: &mut [Section]) {
    sections.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.title.cmp(&b.title)));
}
