//! Documentation tree scanning and index building.
//!
//! The build stage of the pipeline. Walks one subdirectory per version below
//! the documentation root, turns every markdown file into a [`Section`], and
//! assembles a [`SectionIndex`].
//!
//! ## Directory Structure
//!
//! ```text
//! docs/                              # Documentation root
//! ├── docs-index.toml                # Layout config (optional)
//! ├── next/                          # Unreleased docs, never discovered
//! ├── v1.4.x/                        # Version root (newest first)
//! │   ├── _index.md                  # slug "_index"
//! │   ├── get-started.md             # slug "get-started"
//! │   └── using-k6/
//! │       ├── _index.md              # slug "using-k6" (landing page)
//! │       └── scenarios/
//! │           ├── _index.md          # slug "using-k6/scenarios"
//! │           └── executors.md       # slug "using-k6/scenarios/executors"
//! └── v1.3.x/
//!     └── ...
//! ```
//!
//! ## Failure model
//!
//! A page with broken frontmatter must not block the rest of the docs: it is
//! skipped, logged, and recorded as a [`BuildWarning`] in the returned
//! [`BuildReport`]. The caller decides whether warnings are fatal (the CLI's
//! `--strict`). A version directory that was asked for but does not exist is
//! a hard error, as is a directory walk that fails.

use crate::config::{IndexConfig, LayoutConfig};
use crate::frontmatter::{self, FrontmatterError};
use crate::index::{LookupCollision, SectionIndex};
use crate::naming;
use crate::types::{self, Section};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("failed to walk {0}: {1}")]
    Walk(PathBuf, #[source] walkdir::Error),
    #[error("version directory not found: {0}")]
    MissingVersionDirectory(PathBuf),
    #[error("no versions to index in {0}")]
    NoVersions(PathBuf),
    #[error("failed to parse frontmatter for {path}: {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },
    #[error("{0} is not below its version root")]
    OutsideRoot(PathBuf),
}

/// A non-fatal problem found while building.
#[derive(Debug)]
pub enum BuildWarning {
    /// A file that could not be turned into a section and was left out.
    SkippedFile {
        version: String,
        path: PathBuf,
        reason: String,
    },
    /// A slug or alias that lost to an earlier registration.
    Collision(LookupCollision),
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkippedFile {
                version,
                path,
                reason,
            } => write!(f, "{version}: skipped {}: {reason}", path.display()),
            Self::Collision(collision) => write!(f, "{collision}"),
        }
    }
}

/// A built index together with everything that went wrong along the way.
#[derive(Debug)]
pub struct BuildReport {
    pub index: SectionIndex,
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Discover versions under `root` and index all of them.
///
/// Loads `docs-index.toml` from the root (stock defaults when absent).
pub fn scan(root: &Path) -> Result<BuildReport, ScanError> {
    let config = crate::config::load_config(root)?;
    scan_with_config(root, &config)
}

pub fn scan_with_config(root: &Path, config: &IndexConfig) -> Result<BuildReport, ScanError> {
    let versions = discover_versions(root, &config.layout)?;
    build_index(root, &versions, &config.layout)
}

/// List version directories below `root`, newest first.
///
/// Only directories matching the layout's version pattern count; excluded
/// names (`next`) are skipped. Ordering is by captured major, then minor,
/// both descending.
pub fn discover_versions(root: &Path, layout: &LayoutConfig) -> Result<Vec<String>, ScanError> {
    let pattern = layout.version_regex()?;

    let mut found: Vec<(u64, u64, String)> = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if layout.excluded.contains(&name) {
            log::debug!("skipping excluded version directory {name}");
            continue;
        }
        let Some(caps) = pattern.captures(&name) else {
            continue;
        };
        let (Some(major), Some(minor)) = (
            caps.get(1).and_then(|m| m.as_str().parse().ok()),
            caps.get(2).and_then(|m| m.as_str().parse().ok()),
        ) else {
            continue;
        };
        found.push((major, minor, name));
    }

    if found.is_empty() {
        return Err(ScanError::NoVersions(root.to_path_buf()));
    }

    found.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)).then_with(|| a.2.cmp(&b.2)));
    let versions: Vec<String> = found.into_iter().map(|(_, _, name)| name).collect();
    log::debug!("discovered versions: {}", versions.join(", "));
    Ok(versions)
}

/// Index the given versions, each read from `root/<version>`.
///
/// The first version becomes `latest`.
pub fn build_index(
    root: &Path,
    versions: &[String],
    layout: &LayoutConfig,
) -> Result<BuildReport, ScanError> {
    let Some(latest) = versions.first() else {
        return Err(ScanError::NoVersions(root.to_path_buf()));
    };

    let mut warnings = Vec::new();
    let mut sections = BTreeMap::new();

    for version in versions {
        let version_root = root.join(version);
        if !version_root.is_dir() {
            return Err(ScanError::MissingVersionDirectory(version_root));
        }
        let list = collect_sections(version, &version_root, layout, &mut warnings)?;
        log::info!("Indexed {} sections for version {}", list.len(), version);
        sections.insert(version.clone(), list);
    }

    Ok(finish(
        SectionIndex::new(
            versions.to_vec(),
            latest.clone(),
            sections,
            &layout.alias_prefix,
        ),
        warnings,
    ))
}

/// Index a single version directory on its own.
pub fn build_single_version(
    version_root: &Path,
    version: &str,
    layout: &LayoutConfig,
) -> Result<BuildReport, ScanError> {
    if !version_root.is_dir() {
        return Err(ScanError::MissingVersionDirectory(version_root.to_path_buf()));
    }
    let mut warnings = Vec::new();
    let list = collect_sections(version, version_root, layout, &mut warnings)?;
    log::info!("Indexed {} sections for version {}", list.len(), version);

    let mut sections = BTreeMap::new();
    sections.insert(version.to_string(), list);
    Ok(finish(
        SectionIndex::new(
            vec![version.to_string()],
            version.to_string(),
            sections,
            &layout.alias_prefix,
        ),
        warnings,
    ))
}

fn finish(index: SectionIndex, mut warnings: Vec<BuildWarning>) -> BuildReport {
    for collision in index.collisions() {
        log::warn!("{collision}");
        warnings.push(BuildWarning::Collision(collision.clone()));
    }
    BuildReport { index, warnings }
}

/// Walk one version root and return its sections in canonical order.
///
/// Files that fail to parse are pushed onto `warnings` and left out.
fn collect_sections(
    version: &str,
    version_root: &Path,
    layout: &LayoutConfig,
    warnings: &mut Vec<BuildWarning>,
) -> Result<Vec<Section>, ScanError> {
    let mut sections = Vec::new();

    for entry in WalkDir::new(version_root).sort_by_file_name() {
        let entry = entry.map_err(|e| ScanError::Walk(version_root.to_path_buf(), e))?;
        if entry.file_type().is_dir() || !naming::has_extension(entry.path(), &layout.extension) {
            continue;
        }

        match extract_section(entry.path(), version_root, layout) {
            Ok(section) => sections.push(section),
            Err(err) => {
                log::warn!(
                    "failed to parse {} (version {}): {}",
                    entry.path().display(),
                    version,
                    err
                );
                warnings.push(BuildWarning::SkippedFile {
                    version: version.to_string(),
                    path: entry.path().to_path_buf(),
                    reason: err.to_string(),
                });
            }
        }
    }

    types::sort_sections(&mut sections);
    Ok(sections)
}

/// Build one [`Section`] from a markdown file below `version_root`.
pub fn extract_section(
    path: &Path,
    version_root: &Path,
    layout: &LayoutConfig,
) -> Result<Section, ScanError> {
    let fm = frontmatter::parse_file(path).map_err(|source| ScanError::Frontmatter {
        path: path.to_path_buf(),
        source,
    })?;

    let rel = path
        .strip_prefix(version_root)
        .map_err(|_| ScanError::OutsideRoot(path.to_path_buf()))?;
    let parsed = naming::parse_section_path(rel, &layout.extension, &layout.index_name);

    Ok(Section {
        slug: parsed.slug,
        path: path.to_path_buf(),
        rel_path: parsed.rel_path,
        title: fm.title,
        description: fm.description,
        weight: fm.weight,
        aliases: fm.aliases,
        category: parsed.category,
        hierarchy: parsed.hierarchy,
        is_index: parsed.is_index,
    })
}
