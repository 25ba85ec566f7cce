//! Index configuration.
//!
//! An optional `docs-index.toml` in the documentation root overrides the stock
//! defaults. Files are sparse: only the keys being changed need to appear.
//!
//! ```toml
//! [layout]
//! extension = "md"                        # Markdown file extension (no dot)
//! index_name = "_index"                   # Stem of a directory's landing page
//! alias_prefix = "docs/k6/"               # Stripped from aliases before registration
//! excluded = ["next"]                     # Version directories never discovered
//! version_pattern = '^v(\d+)\.(\d+)\.x$'  # Captures major and minor
//!
//! [tree]
//! default_depth = 1                       # Depth when a caller gives none (or 0)
//! max_depth = 5                           # Requested depths are clamped to this
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "docs-index.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub layout: LayoutConfig,
    pub tree: TreeConfig,
}

/// How a documentation tree is laid out on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub extension: String,
    pub index_name: String,
    pub alias_prefix: String,
    pub excluded: Vec<String>,
    pub version_pattern: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
            index_name: "_index".to_string(),
            alias_prefix: "docs/k6/".to_string(),
            excluded: vec!["next".to_string()],
            version_pattern: r"^v(\d+)\.(\d+)\.x$".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Compile the version pattern. Validated configs always compile.
    pub fn version_regex(&self) -> Result<Regex, ConfigError> {
        let re = Regex::new(&self.version_pattern).map_err(|e| {
            ConfigError::Validation(format!("layout.version_pattern is not a valid regex: {e}"))
        })?;
        if re.captures_len() < 3 {
            return Err(ConfigError::Validation(
                "layout.version_pattern must capture major and minor".into(),
            ));
        }
        Ok(re)
    }
}

/// Caller-side depth policy for tree listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    pub default_depth: usize,
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            default_depth: 1,
            max_depth: 5,
        }
    }
}

impl TreeConfig {
    /// Cap a requested depth at `max_depth`. A missing or zero depth means
    /// `default_depth`.
    pub fn clamp_depth(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(depth) if depth >= 1 => depth.min(self.max_depth),
            _ => self.default_depth,
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.extension.is_empty() || self.layout.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "layout.extension must be non-empty and given without a dot".into(),
            ));
        }
        if self.layout.index_name.is_empty() {
            return Err(ConfigError::Validation(
                "layout.index_name must not be empty".into(),
            ));
        }
        self.layout.version_regex()?;
        if self.tree.default_depth < 1 || self.tree.default_depth > self.tree.max_depth {
            return Err(ConfigError::Validation(
                "tree.default_depth must be between 1 and tree.max_depth".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Stock defaults as a TOML table, the base layer for user overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(IndexConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`. Tables merge key by key,
/// anything else in the overlay replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `docs-index.toml` from `dir` as a raw value, `None` if absent.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the config for a documentation root: stock defaults, overlaid by
/// the root's `docs-index.toml` if present, then validated.
pub fn load_config(root: &Path) -> Result<IndexConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: IndexConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// A fully commented stock `docs-index.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# docs-index configuration
# ========================
# All settings are optional. Values shown are the defaults.
# Place this file at the documentation root as docs-index.toml.
# Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Documentation layout
# ---------------------------------------------------------------------------
[layout]
# Extension of markdown files, without the dot. Other files are ignored.
extension = "md"

# File stem of a directory's landing page. Its slug collapses to the
# directory's slug (using-k6/_index.md -> using-k6).
index_name = "_index"

# Prefix stripped from frontmatter aliases (after one leading slash).
alias_prefix = "docs/k6/"

# Version directories that are never discovered.
excluded = ["next"]

# Version directory names. Must capture major and minor, which order
# discovered versions newest first.
version_pattern = '^v(\d+)\.(\d+)\.x$'

# ---------------------------------------------------------------------------
# Tree listings
# ---------------------------------------------------------------------------
[tree]
# Depth used when a listing does not ask for one, or asks for 0.
default_depth = 1

# Requested depths above this are clamped down.
max_depth = 5
"#
}
