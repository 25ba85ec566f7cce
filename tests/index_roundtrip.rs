//! End-to-end checks over `fixtures/docs`: build, persist, reload, query.

use docs_index::config::LayoutConfig;
use docs_index::finder::{Finder, VersionMatch};
use docs_index::index::{LookupCollision, SectionIndex};
use docs_index::naming;
use docs_index::scan::{self, BuildReport, BuildWarning};
use docs_index::types::Section;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs")
}

fn build() -> BuildReport {
    scan::scan(&fixtures()).unwrap()
}

fn slugs(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.slug.as_str()).collect()
}

/// The persisted fields of a section list; the build-time path is not one.
fn persisted(sections: &[Section]) -> serde_json::Value {
    serde_json::to_value(sections).unwrap()
}

#[test]
fn fixture_versions_newest_first() {
    let report = build();
    assert_eq!(report.index.versions(), ["v1.4.x", "v1.3.x"]);
    assert_eq!(report.index.latest(), "v1.4.x");
    assert!(!report.index.has_version("next"));
}

#[test]
fn fixture_sections_in_canonical_order() {
    let report = build();
    assert_eq!(
        slugs(report.index.sections("v1.4.x").unwrap()),
        vec![
            "using-k6/thresholds",
            "_index",
            "using-k6/scenarios/executors",
            "get-started",
            "using-k6/http-requests",
            "get-started/installation",
            "get-started/running-k6",
            "using-k6",
            "using-k6/scenarios",
        ]
    );
    assert_eq!(
        slugs(report.index.sections("v1.3.x").unwrap()),
        vec!["_index", "get-started", "get-started/installation", "using-k6"]
    );
}

#[test]
fn fixture_warnings_cover_broken_page_and_alias_clash() {
    let report = build();
    assert!(!report.is_clean());
    assert_eq!(report.warnings.len(), 2);

    match &report.warnings[0] {
        BuildWarning::SkippedFile { version, path, .. } => {
            assert_eq!(version, "v1.3.x");
            assert!(path.ends_with("using-k6/broken.md"));
        }
        other => panic!("expected a skipped file, got {other:?}"),
    }

    match &report.warnings[1] {
        BuildWarning::Collision(LookupCollision::Alias {
            version,
            alias,
            kept,
            dropped,
        }) => {
            assert_eq!(version, "v1.4.x");
            assert_eq!(alias, "using-k6/http");
            assert_eq!(kept, "using-k6/scenarios/executors.md");
            assert_eq!(dropped, "using-k6/http-requests.md");
        }
        other => panic!("expected an alias collision, got {other:?}"),
    }
}

#[test]
fn fixture_frontmatter_edge_cases() {
    let report = build();
    let index = &report.index;

    let thresholds = index.by_slug("v1.4.x", "using-k6/thresholds").unwrap();
    assert_eq!(thresholds.title, "");
    assert_eq!(thresholds.weight, 0);
    assert!(!thresholds.is_index);

    let scenarios = index.by_slug("v1.4.x", "using-k6/scenarios").unwrap();
    assert_eq!(scenarios.title, "Scenarios");
    assert_eq!(scenarios.description, "Model diverse workloads");
    assert!(scenarios.is_index);
    assert_eq!(scenarios.rel_path, "using-k6/scenarios/_index.md");
    assert_eq!(scenarios.hierarchy, vec!["using-k6", "scenarios"]);
    assert_eq!(scenarios.category, "using-k6");

    let root = index.by_slug("v1.4.x", "_index").unwrap();
    assert!(root.is_index);
    assert_eq!(root.category, "");
    assert!(root.hierarchy.is_empty());
}

#[test]
fn every_primary_slug_and_path_resolves_to_itself() {
    let report = build();
    let index = &report.index;
    for version in index.versions() {
        for section in index.sections(version).unwrap() {
            assert_eq!(index.by_slug(version, &section.slug).unwrap().slug, section.slug);
            assert_eq!(
                index.by_path(version, &section.rel_path).unwrap().slug,
                section.slug
            );
        }
    }
}

#[test]
fn roundtrip_preserves_every_query() {
    let report = build();
    let built = &report.index;

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("dist/nested/sections.json");
    built.write_json(&path).unwrap();

    let prefix = LayoutConfig::default().alias_prefix;
    let loaded = SectionIndex::load_file(&path, &prefix).unwrap();
    assert_eq!(loaded.versions(), built.versions());
    assert_eq!(loaded.latest(), built.latest());

    let before = Finder::new(Arc::new(build().index));
    let after = Finder::new(Arc::new(loaded));

    for version in before.get_versions() {
        assert_eq!(
            persisted(before.get_all(version).unwrap()),
            persisted(after.get_all(version).unwrap())
        );

        for section in before.get_all(version).unwrap() {
            let mut keys = vec![section.slug.as_str()];
            keys.extend(
                section
                    .aliases
                    .iter()
                    .map(|a| naming::normalize_alias(a, &prefix)),
            );
            for key in keys {
                assert_eq!(
                    before.get_by_slug(key, version).unwrap().slug,
                    after.get_by_slug(key, version).unwrap().slug,
                    "{version}: {key}"
                );
            }
        }

        for category in before.get_categories(version).unwrap() {
            let by_category = |finder: &Finder| -> Vec<String> {
                finder
                    .get_by_category(category, version)
                    .unwrap()
                    .iter()
                    .map(|s| s.slug.clone())
                    .collect()
            };
            assert_eq!(by_category(&before), by_category(&after));
        }
    }
}

#[test]
fn persisted_document_has_no_lookup_tables() {
    let report = build();
    let value: serde_json::Value = serde_json::from_str(&report.index.to_json().unwrap()).unwrap();

    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3);
    for key in ["versions", "latest", "sections"] {
        assert!(keys.contains(&key));
    }

    let first = &value["sections"]["v1.4.x"][0];
    assert_eq!(first["slug"], "using-k6/thresholds");
    assert!(first.get("path").is_none());
    assert!(first.get("aliases").is_none());
}

#[test]
fn aliases_resolve_after_reload() {
    let report = build();
    let json = report.index.to_json().unwrap();
    let loaded = SectionIndex::from_json(&json, "docs/k6/").unwrap();
    let finder = Finder::new(Arc::new(loaded));

    let installation = finder.get_by_slug("getting-started/installation", "").unwrap();
    assert_eq!(installation.slug, "get-started/installation");
    let executors = finder.get_by_slug("executors", "").unwrap();
    assert_eq!(executors.slug, "using-k6/scenarios/executors");
    assert!(finder.get_by_slug("getting-started/installation", "v1.3.x").is_err());
}

#[test]
fn tree_over_fixtures() {
    let finder = Finder::new(Arc::new(build().index));

    let top = finder.tree("", None, "", 1).unwrap();
    let top_slugs: Vec<&str> = top.nodes.iter().map(|n| n.section.slug.as_str()).collect();
    assert_eq!(top_slugs, vec!["_index", "get-started", "using-k6"]);
    assert!(!top.nodes[0].has_children());
    assert_eq!(top.nodes[1].child_count, 2);
    assert!(top.nodes[2].has_more_children);

    let using = finder.tree("", Some("using-k6"), "using-k6", 2).unwrap();
    assert_eq!(using.total, 5);
    let child_slugs: Vec<&str> = using.nodes.iter().map(|n| n.section.slug.as_str()).collect();
    assert_eq!(
        child_slugs,
        vec![
            "using-k6/thresholds",
            "using-k6/http-requests",
            "using-k6/scenarios",
        ]
    );
    let scenarios = &using.nodes[2];
    assert_eq!(scenarios.children.len(), 1);
    assert!(!scenarios.has_more_children);
}

#[test]
fn client_versions_map_onto_fixture_versions() {
    let finder = Finder::new(Arc::new(build().index));
    assert_eq!(
        finder.match_version("v1.3.2"),
        VersionMatch::MajorMinor("v1.3.x".to_string())
    );
    assert!(finder.match_version("v0.9.0").is_fallback());
}
