//! Shared test utilities.
//!
//! Builders for in-memory sections and on-disk doc trees, plus lookups that
//! panic with the available keys on a miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = write_docs(&[
//!     ("v1.4.x/using-k6/_index.md", page("Using k6", 1)),
//!     ("v1.4.x/using-k6/scenarios.md", page("Scenarios", 2)),
//! ]);
//! let report = scan(tmp.path()).unwrap();
//! let using = find_section(&report.index, "v1.4.x", "using-k6");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::index::SectionIndex;
use crate::types::Section;

// =========================================================================
// Builders
// =========================================================================

/// A section as the scanner would produce it for `<slug>.md`.
pub fn section(slug: &str, title: &str, weight: i64) -> Section {
    let mut hierarchy: Vec<String> = slug.split('/').map(String::from).collect();
    hierarchy.pop();
    Section {
        slug: slug.to_string(),
        rel_path: format!("{slug}.md"),
        title: title.to_string(),
        weight,
        category: hierarchy.first().cloned().unwrap_or_default(),
        hierarchy,
        ..Section::default()
    }
}

/// A section as the scanner would produce it for `<slug>/_index.md`.
pub fn index_section(slug: &str, title: &str, weight: i64) -> Section {
    let hierarchy: Vec<String> = slug.split('/').map(String::from).collect();
    Section {
        slug: slug.to_string(),
        rel_path: format!("{slug}/_index.md"),
        title: title.to_string(),
        weight,
        category: hierarchy[0].clone(),
        hierarchy,
        is_index: true,
        ..Section::default()
    }
}

/// Markdown content with a title/weight frontmatter block.
pub fn page(title: &str, weight: i64) -> String {
    format!("---\ntitle: {title}\nweight: {weight}\n---\n\n# {title}\n")
}

/// Write `(relative path, content)` pairs below a fresh temp directory.
pub fn write_docs(files: &[(&str, String)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, content) in files {
        let path = tmp.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
    tmp
}

/// Copy `fixtures/docs/` into a temp directory.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Slugs in list order.
pub fn slugs(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.slug.as_str()).collect()
}

/// Find a section by slug (aliases included). Panics if not found.
pub fn find_section<'a>(index: &'a SectionIndex, version: &str, slug: &str) -> &'a Section {
    index.by_slug(version, slug).unwrap_or_else(|| {
        let available = index.sections(version).map(slugs).unwrap_or_default();
        panic!("section '{slug}' not found in {version}. Available: {available:?}")
    })
}
