//! Centralized path parsing for documentation files.
//!
//! Every section's identity is derived from where its file sits below the
//! version root. This module turns a relative path into the facts the indexer
//! and tree builder rely on, so slug rules live in exactly one place:
//!
//! ```text
//! get-started.md                       → slug "get-started", hierarchy []
//! using-k6/scenarios/_index.md         → slug "using-k6/scenarios", hierarchy ["using-k6", "scenarios"]
//! javascript-api/k6-http/request.md    → slug "javascript-api/k6-http/request"
//! ```
//!
//! ## Index pages
//!
//! A file whose stem equals the configured index name (`_index` by default)
//! is the landing page of its directory; its slug collapses to the directory's
//! slug. A root-level index file has no parent directory to collapse into and
//! keeps its own stem as slug (`_index`), so it never claims the empty slug
//! that the tree builder uses as the implicit top level.

use std::path::{Component, Path};

/// Path-derived facts for one documentation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPath {
    /// Relative path with `/` separators, extension included.
    pub rel_path: String,
    pub slug: String,
    /// Directory segments between the version root and the file.
    pub hierarchy: Vec<String>,
    /// First hierarchy segment, empty for root-level files.
    pub category: String,
    pub is_index: bool,
}

/// Derive slug, hierarchy, category and index flag from a path relative to
/// the version root.
///
/// `extension` is given without the leading dot.
pub fn parse_section_path(rel_path: &Path, extension: &str, index_name: &str) -> SectionPath {
    let segments: Vec<String> = rel_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let (file_name, dirs) = match segments.split_last() {
        Some((last, dirs)) => (last.as_str(), dirs),
        None => ("", &[][..]),
    };

    let stem = strip_extension(file_name, extension);
    let is_index = stem == index_name && file_name != stem;

    let slug = if is_index && !dirs.is_empty() {
        dirs.join("/")
    } else if dirs.is_empty() {
        stem.to_string()
    } else {
        format!("{}/{}", dirs.join("/"), stem)
    };

    SectionPath {
        rel_path: segments.join("/"),
        slug,
        hierarchy: dirs.to_vec(),
        category: dirs.first().cloned().unwrap_or_default(),
        is_index,
    }
}

fn strip_extension<'a>(file_name: &'a str, extension: &str) -> &'a str {
    file_name
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(file_name)
}

/// True when `path` carries the documentation extension (case-sensitive).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|e| e == extension)
}

/// Normalize an alias declared in frontmatter into a slug key.
///
/// Strips a single leading `/`, then the documentation-root prefix if present.
/// The result may be empty; callers skip empty keys.
pub fn normalize_alias<'a>(alias: &'a str, prefix: &str) -> &'a str {
    let alias = alias.strip_prefix('/').unwrap_or(alias);
    if prefix.is_empty() {
        return alias;
    }
    alias.strip_prefix(prefix).unwrap_or(alias)
}

/// Parent slug: everything before the final `/`, or `""` for top-level slugs.
pub fn parent_slug(slug: &str) -> &str {
    match slug.rfind('/') {
        Some(idx) => &slug[..idx],
        None => "",
    }
}
