//! CLI output formatting for builds and queries.
//!
//! # Information-First Display
//!
//! Every entity (version, section, tree node) leads with its positional index
//! and title. Slugs and source paths are secondary context on indented lines,
//! so the output reads as a table of contents while still pointing back at
//! the files it came from.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Versions
//! 001 v1.4.x (latest, 24 sections)
//! 002 v1.3.x (22 sections)
//!
//! Warnings
//!     v1.4.x: alias 'using-k6/old' of using-k6/new.md already resolves to using-k6/_index.md
//! ```
//!
//! ## Tree
//!
//! ```text
//! v1.4.x (24 sections)
//! 001 Get started (2 children)
//!     Slug: get-started
//!     001 Installation
//!         Slug: get-started/installation
//! 002 Using k6 (3 children, more)
//!     Slug: using-k6
//! ```
//!
//! ## Sections
//!
//! ```text
//! 001 Scenarios
//!     Slug: using-k6/scenarios
//!     Source: using-k6/scenarios/_index.md
//!     Model different workload patterns...
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::finder::{TreeListing, VersionMatch};
use crate::index::SectionIndex;
use crate::scan::BuildReport;
use crate::tree::SectionNode;
use crate::types::Section;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Child summary shown after a tree node's title.
///
/// ```text
/// Using k6 (3 children, more)
/// Installation
/// ```
fn child_summary(node: &SectionNode<'_>) -> String {
    match (node.child_count, node.has_more_children) {
        (0, _) => String::new(),
        (1, false) => " (1 child)".to_string(),
        (1, true) => " (1 child, more)".to_string(),
        (n, false) => format!(" ({} children)", n),
        (n, true) => format!(" ({} children, more)", n),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Versions of an index, most recent first, with section counts.
pub fn format_versions(index: &SectionIndex) -> Vec<String> {
    let mut lines = vec!["Versions".to_string()];
    for (i, version) in index.versions().iter().enumerate() {
        let count = index.sections(version).map_or(0, <[Section]>::len);
        let marker = if version == index.latest() {
            "latest, "
        } else {
            ""
        };
        lines.push(format!(
            "{} {} ({}{} sections)",
            format_index(i + 1),
            version,
            marker,
            count
        ));
    }
    lines
}

/// Build summary: every version, then the warnings (if any).
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = format_versions(&report.index);
    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &report.warnings {
            lines.push(format!("    {}", warning));
        }
    }
    lines
}

pub fn print_build_report(report: &BuildReport) {
    print_lines(format_build_report(report));
}

pub fn print_versions(index: &SectionIndex) {
    print_lines(format_versions(index));
}

// ============================================================================
// Queries
// ============================================================================

/// Depth-limited tree listing with per-level positional indices.
pub fn format_tree(listing: &TreeListing<'_>) -> Vec<String> {
    let mut lines = vec![format!("{} ({} sections)", listing.version, listing.total)];
    format_tree_level(&listing.nodes, 0, &mut lines);
    lines
}

fn format_tree_level(nodes: &[SectionNode<'_>], depth: usize, lines: &mut Vec<String>) {
    let base_indent = indent(depth);
    for (i, node) in nodes.iter().enumerate() {
        lines.push(format!(
            "{}{} {}{}",
            base_indent,
            format_index(i + 1),
            node.section.title,
            child_summary(node)
        ));
        lines.push(format!("{}    Slug: {}", base_indent, node.section.slug));
        format_tree_level(&node.children, depth + 1, lines);
    }
}

pub fn print_tree(listing: &TreeListing<'_>) {
    print_lines(format_tree(listing));
}

/// Full detail for one section.
pub fn format_section(section: &Section) -> Vec<String> {
    let mut lines = vec![
        section.title.clone(),
        format!("    Slug: {}", section.slug),
        format!("    Source: {}", section.rel_path),
    ];
    if !section.category.is_empty() {
        lines.push(format!("    Category: {}", section.category));
    }
    lines.push(format!("    Weight: {}", section.weight));
    if !section.aliases.is_empty() {
        lines.push(format!("    Aliases: {}", section.aliases.join(", ")));
    }
    if !section.description.is_empty() {
        lines.push(format!("    {}", section.description));
    }
    lines
}

pub fn print_section(section: &Section) {
    print_lines(format_section(section));
}

/// Numbered section list (search hits, category members).
pub fn format_section_list(sections: &[&Section]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), section.title));
        lines.push(format!("    Slug: {}", section.slug));
        let desc = truncate_desc(section.description.trim(), 60);
        if !desc.is_empty() {
            lines.push(format!("    {}", desc));
        }
    }
    if lines.is_empty() {
        lines.push("No matching sections".to_string());
    }
    lines
}

pub fn print_section_list(sections: &[&Section]) {
    print_lines(format_section_list(sections));
}

pub fn format_categories(categories: &[&str]) -> Vec<String> {
    categories
        .iter()
        .enumerate()
        .map(|(i, category)| format!("{} {}", format_index(i + 1), category))
        .collect()
}

pub fn print_categories(categories: &[&str]) {
    print_lines(format_categories(categories));
}

/// Resolved version, plus the advisory note on fallback.
pub fn format_version_match(matched: &VersionMatch) -> Vec<String> {
    let mut lines = vec![matched.version().to_string()];
    if let Some(note) = matched.note() {
        lines.push(format!("    Note: {}", note));
    }
    lines
}

pub fn print_version_match(matched: &VersionMatch) {
    print_lines(format_version_match(matched));
}
