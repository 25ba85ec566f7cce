//! Query façade over a [`SectionIndex`].
//!
//! Every query takes an optional version; an empty string means the index's
//! `latest`. The finder holds the snapshot behind an [`Arc`], so clones are
//! cheap and can be handed to concurrent callers. Replacing the index means
//! building a new one and a new finder, never mutating the old one.

use crate::index::SectionIndex;
use crate::tree::{self, SectionNode, TreeError};
use crate::types::Section;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("version not found: {0}")]
    VersionNotFound(String),
    #[error("section not found: {slug} (version {version})")]
    SectionNotFound { slug: String, version: String },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Outcome of mapping a client-reported version onto an indexed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionMatch {
    /// The string is an indexed version, or was empty and resolved to latest.
    Exact(String),
    /// `<major>.<minor>.x` built from the string is indexed.
    MajorMinor(String),
    /// Nothing matched; `latest` is used instead.
    Fallback { requested: String, latest: String },
}

impl VersionMatch {
    pub fn version(&self) -> &str {
        match self {
            Self::Exact(v) | Self::MajorMinor(v) => v,
            Self::Fallback { latest, .. } => latest,
        }
    }

    /// True when no indexed version matched and `latest` was substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Advisory message for callers that surface fallbacks.
    pub fn note(&self) -> Option<String> {
        match self {
            Self::Fallback { requested, latest } => Some(format!(
                "no exact match for version {requested}, using latest ({latest})"
            )),
            _ => None,
        }
    }
}

/// A depth-limited listing plus the number of sections it was built from.
#[derive(Debug)]
pub struct TreeListing<'a> {
    pub version: String,
    pub nodes: Vec<SectionNode<'a>>,
    /// Sections considered after the category filter.
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct Finder {
    index: Arc<SectionIndex>,
}

impl Finder {
    pub fn new(index: Arc<SectionIndex>) -> Self {
        Self { index }
    }

    /// Resolve an empty version to latest and check it is indexed.
    pub fn resolve_version(&self, version: &str) -> Result<&str, QueryError> {
        self.version_sections(version).map(|(version, _)| version)
    }

    fn version_sections(&self, version: &str) -> Result<(&str, &[Section]), QueryError> {
        let requested = if version.is_empty() {
            self.index.latest()
        } else {
            version
        };
        self.index
            .version_entry(requested)
            .ok_or_else(|| QueryError::VersionNotFound(requested.to_string()))
    }

    /// All sections of a version, in build order.
    pub fn get_all(&self, version: &str) -> Result<&[Section], QueryError> {
        self.version_sections(version).map(|(_, sections)| sections)
    }

    /// Alias-aware lookup.
    pub fn get_by_slug(&self, slug: &str, version: &str) -> Result<&Section, QueryError> {
        let version = self.resolve_version(version)?;
        self.index
            .by_slug(version, slug)
            .ok_or_else(|| QueryError::SectionNotFound {
                slug: slug.to_string(),
                version: version.to_string(),
            })
    }

    /// Lookup by path relative to the version root.
    pub fn get_by_path(&self, rel_path: &str, version: &str) -> Result<&Section, QueryError> {
        let version = self.resolve_version(version)?;
        self.index
            .by_path(version, rel_path)
            .ok_or_else(|| QueryError::SectionNotFound {
                slug: rel_path.to_string(),
                version: version.to_string(),
            })
    }

    /// Sections whose category equals `category`, in build order.
    pub fn get_by_category(
        &self,
        category: &str,
        version: &str,
    ) -> Result<Vec<&Section>, QueryError> {
        let sections = self.get_all(version)?;
        Ok(sections.iter().filter(|s| s.category == category).collect())
    }

    /// Case-insensitive substring match on title, description or slug.
    ///
    /// Unranked; a fallback for when no full-text engine is available.
    pub fn search(&self, query: &str, version: &str) -> Result<Vec<&Section>, QueryError> {
        let sections = self.get_all(version)?;
        let query = query.to_lowercase();
        Ok(sections
            .iter()
            .filter(|s| {
                s.title.to_lowercase().contains(&query)
                    || s.description.to_lowercase().contains(&query)
                    || s.slug.to_lowercase().contains(&query)
            })
            .collect())
    }

    /// Distinct non-empty categories in first-seen order.
    pub fn get_categories(&self, version: &str) -> Result<Vec<&str>, QueryError> {
        let sections = self.get_all(version)?;
        let mut seen = HashSet::new();
        Ok(sections
            .iter()
            .map(|s| s.category.as_str())
            .filter(|c| !c.is_empty() && seen.insert(*c))
            .collect())
    }

    pub fn get_versions(&self) -> &[String] {
        self.index.versions()
    }

    pub fn get_latest_version(&self) -> &str {
        self.index.latest()
    }

    /// Map a client-reported version (`v1.4.0`) onto an indexed one (`v1.4.x`).
    pub fn match_version(&self, client_version: &str) -> VersionMatch {
        if client_version.is_empty() {
            return VersionMatch::Exact(self.index.latest().to_string());
        }
        if self.index.has_version(client_version) {
            return VersionMatch::Exact(client_version.to_string());
        }

        let parts: Vec<&str> = client_version.split('.').collect();
        if parts.len() >= 2 {
            let candidate = format!("{}.{}.x", parts[0], parts[1]);
            if self.index.has_version(&candidate) {
                return VersionMatch::MajorMinor(candidate);
            }
        }

        VersionMatch::Fallback {
            requested: client_version.to_string(),
            latest: self.index.latest().to_string(),
        }
    }

    /// Tree listing for a version, optionally narrowed to one category first.
    ///
    /// With a category, slugs outside it are not candidates for `root_slug`.
    pub fn tree(
        &self,
        version: &str,
        category: Option<&str>,
        root_slug: &str,
        depth: usize,
    ) -> Result<TreeListing<'_>, QueryError> {
        let (version, sections) = self.version_sections(version)?;
        let version = version.to_string();

        let (nodes, total) = match category {
            Some(category) => {
                let in_category = |s: &&Section| s.category == category;
                let nodes = tree::build_tree(sections.iter().filter(in_category), root_slug, depth)?;
                (nodes, sections.iter().filter(in_category).count())
            }
            None => (tree::build_tree(sections, root_slug, depth)?, sections.len()),
        };

        Ok(TreeListing {
            version,
            nodes,
            total,
        })
    }
}
