//! # docs-index
//!
//! A section index for multi-version markdown documentation. The filesystem
//! is the data source: one directory per version, files become sections,
//! and directory landing pages (`_index.md`) stand for their directory.
//!
//! # Architecture: Build Once, Query Many
//!
//! ```text
//! 1. Build   docs/<version>/**.md  →  sections.json   (filesystem → structured data)
//! 2. Query   sections.json         →  Finder          (lookups, categories, trees)
//! ```
//!
//! The build writes a human-readable JSON document holding, per version, the
//! ordered section list. Lookup tables are derived from that list whenever an
//! index is constructed, never persisted, so a reloaded index answers every
//! query the way the freshly built one did.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Version discovery and the per-version directory walk; produces a [`scan::BuildReport`] |
//! | [`frontmatter`] | Tolerant YAML frontmatter extraction (duplicate keys, CRLF, missing blocks) |
//! | [`naming`] | Path → slug/hierarchy/category rules and alias normalization |
//! | [`index`] | [`index::SectionIndex`]: the snapshot, its lookup tables, and its JSON form |
//! | [`finder`] | Query façade: version resolution, slug/alias, category, search, version matching |
//! | [`tree`] | Depth-limited hierarchical views with truncation flags |
//! | [`config`] | `docs-index.toml` loading, validation, and stock defaults |
//! | [`types`] | The [`types::Section`] record shared by build, index, and queries |
//! | [`output`] | CLI text formatting for builds and queries |
//!
//! # Design Decisions
//!
//! ## Positions, Not References
//!
//! Slug and path lookups map to positions in the version's section list
//! rather than to copies of sections. The list stays the single owner of
//! section data, and an index never needs to be patched after construction:
//! it is immutable and shared behind an `Arc`.
//!
//! ## Primaries Before Aliases
//!
//! Aliases are registered only after every primary slug of the version. An
//! alias can therefore never hide another page, and whichever registration
//! loses a conflict is reported instead of silently vanishing.
//!
//! ## Warnings Are Data
//!
//! A page with broken frontmatter or a clashing alias does not abort the
//! build. It is recorded in the report so callers (and `build --strict`)
//! decide what is fatal.

pub mod config;
pub mod finder;
pub mod frontmatter;
pub mod index;
pub mod naming;
pub mod output;
pub mod scan;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
