//! The version-spanning section snapshot and its persisted form.
//!
//! A [`SectionIndex`] owns, per version, the ordered list of sections built by
//! the scanner. Two lookup tables (slug → section and relative path → section)
//! are derived from those lists in [`SectionIndex::new`], which every
//! construction path goes through: fresh builds, deserialization, and tests.
//! The tables hold positions into the section lists, are never serialized,
//! and are never touched after construction, so a snapshot can be shared
//! across threads (typically behind an `Arc`) without locking.
//!
//! ## Persisted document
//!
//! ```json
//! {
//!   "versions": ["v1.4.x", "v1.3.x"],
//!   "latest": "v1.4.x",
//!   "sections": {
//!     "v1.4.x": [{ "slug": "using-k6", "rel_path": "using-k6/_index.md", ... }]
//!   }
//! }
//! ```
//!
//! Loading is all-or-nothing: a malformed document, or one whose `latest` is
//! not among its versions, is rejected as a whole.
//!
//! ## Registration order
//!
//! Within each version, every primary slug is registered first, in section
//! order, then every alias. A slug or alias already claimed keeps its first
//! owner; later claims are dropped and reported as [`LookupCollision`]s.
//! Registering primaries first means an alias can never shadow another
//! section's primary slug, whatever the sort order.

use crate::naming;
use crate::types::Section;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("failed to read index {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write index {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed index document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid index: {0}")]
    Invalid(String),
}

/// A lookup key that was already claimed when a later section tried to
/// register it. The first registration stays in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupCollision {
    /// Two sections share a primary slug.
    DuplicateSlug {
        version: String,
        slug: String,
        kept: String,
        dropped: String,
    },
    /// An alias (after normalization) was already a slug or an earlier alias.
    Alias {
        version: String,
        alias: String,
        kept: String,
        dropped: String,
    },
}

impl std::fmt::Display for LookupCollision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSlug {
                version,
                slug,
                kept,
                dropped,
            } => write!(
                f,
                "{version}: slug '{slug}' of {dropped} already belongs to {kept}"
            ),
            Self::Alias {
                version,
                alias,
                kept,
                dropped,
            } => write!(
                f,
                "{version}: alias '{alias}' of {dropped} already resolves to {kept}"
            ),
        }
    }
}

/// Per-version lookup tables: key → position in the version's section list.
#[derive(Debug, Default)]
struct VersionLookup {
    by_slug: HashMap<String, usize>,
    by_path: HashMap<String, usize>,
}

impl VersionLookup {
    fn build(
        version: &str,
        sections: &[Section],
        alias_prefix: &str,
        collisions: &mut Vec<LookupCollision>,
    ) -> Self {
        let mut lookup = VersionLookup {
            by_slug: HashMap::with_capacity(sections.len()),
            by_path: HashMap::with_capacity(sections.len()),
        };

        for (i, section) in sections.iter().enumerate() {
            if let Some(&kept) = lookup.by_slug.get(&section.slug) {
                collisions.push(LookupCollision::DuplicateSlug {
                    version: version.to_string(),
                    slug: section.slug.clone(),
                    kept: sections[kept].rel_path.clone(),
                    dropped: section.rel_path.clone(),
                });
            } else {
                lookup.by_slug.insert(section.slug.clone(), i);
            }
            lookup.by_path.entry(section.rel_path.clone()).or_insert(i);
        }

        for (i, section) in sections.iter().enumerate() {
            for alias in &section.aliases {
                let key = naming::normalize_alias(alias, alias_prefix);
                if key.is_empty() {
                    continue;
                }
                match lookup.by_slug.get(key) {
                    Some(&kept) if kept != i => collisions.push(LookupCollision::Alias {
                        version: version.to_string(),
                        alias: key.to_string(),
                        kept: sections[kept].rel_path.clone(),
                        dropped: section.rel_path.clone(),
                    }),
                    Some(_) => {}
                    None => {
                        lookup.by_slug.insert(key.to_string(), i);
                    }
                }
            }
        }

        lookup
    }
}

/// An immutable, version-spanning snapshot of documentation sections.
#[derive(Debug)]
pub struct SectionIndex {
    versions: Vec<String>,
    latest: String,
    sections: BTreeMap<String, Vec<Section>>,
    lookups: HashMap<String, VersionLookup>,
    collisions: Vec<LookupCollision>,
}

impl SectionIndex {
    /// Assemble a snapshot and derive its lookup tables.
    ///
    /// `latest` is taken as given; builders pass the first discovered version.
    /// `alias_prefix` is stripped from aliases before registration.
    pub fn new(
        versions: Vec<String>,
        latest: String,
        sections: BTreeMap<String, Vec<Section>>,
        alias_prefix: &str,
    ) -> Self {
        let mut collisions = Vec::new();
        let lookups = sections
            .iter()
            .map(|(version, list)| {
                let lookup = VersionLookup::build(version, list, alias_prefix, &mut collisions);
                (version.clone(), lookup)
            })
            .collect();

        Self {
            versions,
            latest,
            sections,
            lookups,
            collisions,
        }
    }

    /// All versions, most recent first.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn latest(&self) -> &str {
        &self.latest
    }

    pub fn has_version(&self, version: &str) -> bool {
        self.sections.contains_key(version)
    }

    /// The ordered section list of a version.
    pub fn sections(&self, version: &str) -> Option<&[Section]> {
        self.sections.get(version).map(Vec::as_slice)
    }

    /// The index's own version key together with its section list.
    pub fn version_entry(&self, version: &str) -> Option<(&str, &[Section])> {
        self.sections
            .get_key_value(version)
            .map(|(key, list)| (key.as_str(), list.as_slice()))
    }

    /// Alias-aware slug lookup.
    pub fn by_slug(&self, version: &str, slug: &str) -> Option<&Section> {
        let idx = *self.lookups.get(version)?.by_slug.get(slug)?;
        self.sections.get(version)?.get(idx)
    }

    pub fn by_path(&self, version: &str, rel_path: &str) -> Option<&Section> {
        let idx = *self.lookups.get(version)?.by_path.get(rel_path)?;
        self.sections.get(version)?.get(idx)
    }

    /// Keys dropped while deriving the lookup tables.
    pub fn collisions(&self) -> &[LookupCollision] {
        &self.collisions
    }

    pub fn section_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub fn to_json(&self) -> Result<String, IndexError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the index as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<(), IndexError> {
        let json = self.to_json()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| IndexError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| IndexError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse an index document and rebuild its lookup tables.
    pub fn from_json(json: &str, alias_prefix: &str) -> Result<Self, IndexError> {
        let document: IndexDocument = serde_json::from_str(json)?;
        let index = document.into_index(alias_prefix)?;
        for collision in index.collisions() {
            log::warn!("{collision}");
        }
        Ok(index)
    }

    pub fn load_file(path: &Path, alias_prefix: &str) -> Result<Self, IndexError> {
        let json = fs::read_to_string(path).map_err(|source| IndexError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, alias_prefix)
    }
}

/// The persisted shape. Lookup tables are not part of it.
#[derive(Serialize)]
struct IndexDocumentRef<'a> {
    versions: &'a [String],
    latest: &'a str,
    sections: &'a BTreeMap<String, Vec<Section>>,
}

#[derive(Deserialize)]
struct IndexDocument {
    versions: Vec<String>,
    latest: String,
    sections: BTreeMap<String, Vec<Section>>,
}

impl IndexDocument {
    fn into_index(self, alias_prefix: &str) -> Result<SectionIndex, IndexError> {
        if !self.versions.contains(&self.latest) {
            return Err(IndexError::Invalid(format!(
                "latest version '{}' is not listed in versions",
                self.latest
            )));
        }
        if let Some(missing) = self.versions.iter().find(|v| !self.sections.contains_key(*v)) {
            return Err(IndexError::Invalid(format!(
                "version '{missing}' has no sections entry"
            )));
        }
        Ok(SectionIndex::new(
            self.versions,
            self.latest,
            self.sections,
            alias_prefix,
        ))
    }
}

impl Serialize for SectionIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        IndexDocumentRef {
            versions: &self.versions,
            latest: &self.latest,
            sections: &self.sections,
        }
        .serialize(serializer)
    }
}

/// Deserializing with serde uses the stock alias prefix; use
/// [`SectionIndex::from_json`] to pass a configured one.
impl<'de> Deserialize<'de> for SectionIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = IndexDocument::deserialize(deserializer)?;
        let prefix = crate::config::LayoutConfig::default().alias_prefix;
        document
            .into_index(&prefix)
            .map_err(serde::de::Error::custom)
    }
}
