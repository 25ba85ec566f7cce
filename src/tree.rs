//! Depth-limited tree views over a flat section list.
//!
//! Sections are grouped under the slug obtained by dropping the last
//! `/`-segment of their own slug; top-level sections hang off the empty slug.
//! [`build_tree`] returns the children of a root (or of the top level) down to
//! a requested depth:
//!
//! ```text
//! depth = 1               depth = 2
//! using-k6  (3, more)     using-k6  (3)
//!                         ├── scenarios  (2, more)
//!                         ├── thresholds (0)
//!                         └── metrics    (0)
//! ```
//!
//! A node on the last permitted level that still has children is flagged
//! `has_more_children`; a follow-up call with a deeper depth, or rooted at
//! that node, reveals them. Children appear in the order of the input list,
//! which for indexed sections is the canonical weight/title order.
//!
//! Clamping a requested depth into an application range is the caller's job
//! (see [`crate::config::TreeConfig::clamp_depth`]); here `depth == 0` is an
//! error.

use crate::naming::parent_slug;
use crate::types::Section;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("depth must be at least 1")]
    InvalidDepth,
    #[error("root slug not found: {0}")]
    RootNotFound(String),
}

/// A section with its (possibly truncated) subtree.
#[derive(Debug, Clone)]
pub struct SectionNode<'a> {
    pub section: &'a Section,
    /// Materialized children, empty when none or beyond the depth limit.
    pub children: Vec<SectionNode<'a>>,
    /// Number of direct children, expanded or not.
    pub child_count: usize,
    /// Children exist but were cut off by the depth limit.
    pub has_more_children: bool,
}

impl SectionNode<'_> {
    pub fn has_children(&self) -> bool {
        self.child_count > 0
    }
}

/// Build the children of `root_slug` (top level when empty) as a tree of at
/// most `depth` levels.
///
/// `root_slug` must be the primary slug of a section in `sections`. Any
/// iterator of sections works, so callers can pre-filter without copying.
pub fn build_tree<'a>(
    sections: impl IntoIterator<Item = &'a Section>,
    root_slug: &str,
    depth: usize,
) -> Result<Vec<SectionNode<'a>>, TreeError> {
    if depth < 1 {
        return Err(TreeError::InvalidDepth);
    }

    let mut known: HashSet<&str> = HashSet::new();
    let mut children_by_parent: HashMap<&str, Vec<&'a Section>> = HashMap::new();
    for section in sections {
        known.insert(section.slug.as_str());
        children_by_parent
            .entry(parent_slug(&section.slug))
            .or_default()
            .push(section);
    }

    if !root_slug.is_empty() && !known.contains(root_slug) {
        return Err(TreeError::RootNotFound(root_slug.to_string()));
    }

    let roots = children_by_parent
        .get(root_slug)
        .map(Vec::as_slice)
        .unwrap_or_default();

    Ok(roots
        .iter()
        .map(|section| build_node(section, &children_by_parent, depth, 1))
        .collect())
}

fn build_node<'a>(
    section: &'a Section,
    children_by_parent: &HashMap<&str, Vec<&'a Section>>,
    max_depth: usize,
    current_depth: usize,
) -> SectionNode<'a> {
    // The empty slug is the implicit top level, never a real parent.
    let child_sections = if section.slug.is_empty() {
        &[][..]
    } else {
        children_by_parent
            .get(section.slug.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    };

    let expand = current_depth < max_depth;
    let children = if expand {
        child_sections
            .iter()
            .map(|child| build_node(child, children_by_parent, max_depth, current_depth + 1))
            .collect()
    } else {
        Vec::new()
    };

    SectionNode {
        section,
        children,
        child_count: child_sections.len(),
        has_more_children: !expand && !child_sections.is_empty(),
    }
}

// =============================================================================
// External shape
// =============================================================================

/// Compact node for consumers with little room: internal fields such as the
/// relative path, weight, aliases and hierarchy are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub child_count: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl From<&SectionNode<'_>> for TreeNode {
    fn from(node: &SectionNode<'_>) -> Self {
        Self {
            slug: node.section.slug.clone(),
            title: node.section.title.clone(),
            description: node.section.description.clone(),
            child_count: node.child_count,
            has_more: node.has_more_children,
            children: to_tree_nodes(&node.children),
        }
    }
}

pub fn to_tree_nodes(nodes: &[SectionNode<'_>]) -> Vec<TreeNode> {
    nodes.iter().map(TreeNode::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::section;

    fn chain() -> Vec<Section> {
        vec![
            section("root", "Root", 0),
            section("root/child", "Child", 0),
            section("root/child/grand", "Grandchild", 0),
        ]
    }

    #[test]
    fn depth_one_never_nests() {
        let sections = chain();
        let nodes = build_tree(&sections, "", 1).unwrap();
        assert_eq!(nodes.len(), 1);

        let root = &nodes[0];
        assert_eq!(root.section.slug, "root");
        assert!(root.has_children());
        assert!(root.has_more_children);
        assert!(root.children.is_empty());
        assert_eq!(root.child_count, 1);
    }

    #[test]
    fn depth_two_expands_one_level() {
        let sections = chain();
        let nodes = build_tree(&sections, "", 2).unwrap();
        let root = &nodes[0];
        assert!(!root.has_more_children);
        assert_eq!(root.children.len(), 1);

        let child = &root.children[0];
        assert_eq!(child.section.slug, "root/child");
        assert!(child.children.is_empty());
        assert!(child.has_more_children);
    }

    #[test]
    fn rooted_tree_lists_children_of_root() {
        let sections = chain();
        let nodes = build_tree(&sections, "root/child", 2).unwrap();
        assert_eq!(nodes.len(), 1);

        let grand = &nodes[0];
        assert_eq!(grand.section.slug, "root/child/grand");
        assert!(grand.children.is_empty());
        assert!(!grand.has_more_children);
        assert!(!grand.has_children());
    }

    #[test]
    fn leaf_root_yields_empty_list() {
        let sections = chain();
        assert!(build_tree(&sections, "root/child/grand", 3).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_error() {
        let sections = vec![section("root", "Root", 0)];
        assert_eq!(
            build_tree(&sections, "missing", 1).unwrap_err(),
            TreeError::RootNotFound("missing".to_string())
        );
    }

    #[test]
    fn zero_depth_is_error() {
        let sections = vec![section("root", "Root", 0)];
        assert_eq!(
            build_tree(&sections, "", 0).unwrap_err(),
            TreeError::InvalidDepth
        );
    }

    #[test]
    fn children_keep_input_order() {
        let sections = vec![
            section("guide", "Guide", 0),
            section("guide/zeta", "Zeta", 1),
            section("guide/alpha", "Alpha", 2),
            section("guide/mid", "Mid", 3),
        ];
        let nodes = build_tree(&sections, "guide", 1).unwrap();
        let order: Vec<&str> = nodes.iter().map(|n| n.section.title.as_str()).collect();
        assert_eq!(order, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn orphans_hang_off_their_missing_parent() {
        // "api/http" has no "api" section: it is neither top level nor reachable.
        let sections = vec![section("intro", "Intro", 0), section("api/http", "HTTP", 0)];
        let nodes = build_tree(&sections, "", 3).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].section.slug, "intro");
    }

    #[test]
    fn tree_node_shape_omits_empty_fields() {
        let mut root = section("root", "Root", 0);
        root.description = "desc".to_string();
        let sections = vec![root, section("root/child", "Child", 0)];

        let nodes = to_tree_nodes(&build_tree(&sections, "", 2).unwrap());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].description, "desc");
        assert_eq!(nodes[0].child_count, 1);
        assert!(!nodes[0].has_more);
        assert_eq!(nodes[0].children[0].slug, "root/child");

        let json = serde_json::to_value(&nodes).unwrap();
        let child = &json[0]["children"][0];
        assert!(child.get("description").is_none());
        assert!(child.get("has_more").is_none());
        assert!(child.get("children").is_none());
        assert_eq!(child["child_count"], 0);
        assert!(json[0].get("rel_path").is_none());
    }

    #[test]
    fn has_more_serialized_when_set() {
        let sections = chain();
        let nodes = to_tree_nodes(&build_tree(&sections, "", 1).unwrap());
        let json = serde_json::to_value(&nodes).unwrap();
        assert_eq!(json[0]["has_more"], true);
    }
}
