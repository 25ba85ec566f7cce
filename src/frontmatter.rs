//! YAML frontmatter extraction.
//!
//! A metadata block is recognized only when the file starts with a `---` line.
//! Everything up to the next line consisting of exactly `---` (or the end of
//! the file) is handed to the YAML parser:
//!
//! ```text
//! ---
//! title: Scenarios
//! weight: 20
//! aliases:
//!   - /docs/k6/using-k6/scenarios-old
//! ---
//! # Body starts here
//! ```
//!
//! ## Duplicate keys
//!
//! Hand-maintained pages sometimes declare the same top-level key twice, for
//! example re-stating `weight` further down to override it. Strict YAML rejects
//! that. When the first parse fails on a duplicate key, the block is cut into
//! spans starting at each unindented `key:` line, every key keeps only its
//! last span, and the reduced text is parsed again. Any other failure, such
//! as a syntax error, is reported as is.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DELIMITER: &str = "---";

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse frontmatter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("frontmatter is not valid UTF-8: {0}")]
    Utf8(std::str::Utf8Error),
}

/// Metadata from a markdown file's frontmatter block.
///
/// Missing keys (and explicit `null`s) come back as zero values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    pub title: String,
    pub description: String,
    /// Sort priority among siblings, lower first.
    pub weight: i64,
    pub aliases: Vec<String>,
    /// Alternative title for navigation menus (`menuTitle`).
    pub menu_title: String,
}

#[derive(Deserialize)]
struct RawFrontmatter {
    title: Option<String>,
    description: Option<String>,
    weight: Option<i64>,
    aliases: Option<Vec<String>>,
    #[serde(rename = "menuTitle")]
    menu_title: Option<String>,
}

impl From<RawFrontmatter> for Frontmatter {
    fn from(raw: RawFrontmatter) -> Self {
        Self {
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            weight: raw.weight.unwrap_or_default(),
            aliases: raw.aliases.unwrap_or_default(),
            menu_title: raw.menu_title.unwrap_or_default(),
        }
    }
}

/// Read a markdown file and parse its frontmatter.
///
/// Only the frontmatter block has to be UTF-8; the body is never decoded.
pub fn parse_file(path: &Path) -> Result<Frontmatter, FrontmatterError> {
    let content = fs::read(path).map_err(|source| FrontmatterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes(&content)
}

pub fn parse_str(content: &str) -> Result<Frontmatter, FrontmatterError> {
    parse_bytes(content.as_bytes())
}

/// Parse the frontmatter at the head of `content`.
///
/// Returns an empty [`Frontmatter`] when the content does not open with a
/// delimiter line.
pub fn parse_bytes(content: &[u8]) -> Result<Frontmatter, FrontmatterError> {
    let Some(block) = extract_block(content)? else {
        return Ok(Frontmatter::default());
    };

    let err = match parse_block(&block) {
        Ok(fm) => return Ok(fm),
        Err(err) => err,
    };
    if !is_duplicate_key_error(&err) {
        return Err(err.into());
    }

    let reduced = dedupe_top_level_keys(&block);
    if reduced == block {
        return Err(err.into());
    }
    log::debug!("frontmatter had duplicate keys, retrying with last occurrence of each");
    parse_block(&reduced).map_err(FrontmatterError::from)
}

/// Duplicate struct fields (serde) or mapping keys (serde_yaml).
fn is_duplicate_key_error(err: &serde_yaml::Error) -> bool {
    let message = err.to_string();
    message.contains("duplicate field") || message.contains("duplicate entry")
}

/// The text between the opening and closing delimiter lines, or `None` when
/// the content has no frontmatter.
fn extract_block(content: &[u8]) -> Result<Option<String>, FrontmatterError> {
    let Some(rest) = content
        .strip_prefix(b"---\n")
        .or_else(|| content.strip_prefix(b"---\r\n"))
    else {
        return Ok(None);
    };

    let lines: Vec<&[u8]> = rest
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .take_while(|line| *line != DELIMITER.as_bytes())
        .collect();
    let block = String::from_utf8(lines.join(&b'\n'))
        .map_err(|e| FrontmatterError::Utf8(e.utf8_error()))?;
    Ok(Some(block))
}

fn parse_block(block: &str) -> Result<Frontmatter, serde_yaml::Error> {
    let is_blank = block
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    if is_blank {
        return Ok(Frontmatter::default());
    }
    let raw: Option<RawFrontmatter> = serde_yaml::from_str(block)?;
    Ok(raw.map(Frontmatter::from).unwrap_or_default())
}

/// A span of lines owned by one top-level key (or by nothing, for leading
/// lines before the first key).
struct Block<'a> {
    key: Option<&'a str>,
    start: usize,
    end: usize,
}

/// Keep only the last span of every repeated top-level key.
///
/// Lines before the first key are kept as-is. Output order follows the
/// position of the kept spans in the original text.
fn dedupe_top_level_keys(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();

    let key_lines: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| top_level_key(line).map(|key| (i, key)))
        .collect();

    if key_lines.is_empty() {
        return raw.to_string();
    }

    let mut blocks = Vec::with_capacity(key_lines.len() + 1);
    if key_lines[0].0 > 0 {
        blocks.push(Block {
            key: None,
            start: 0,
            end: key_lines[0].0,
        });
    }
    for (i, &(start, key)) in key_lines.iter().enumerate() {
        let end = key_lines.get(i + 1).map_or(lines.len(), |next| next.0);
        blocks.push(Block {
            key: Some(key),
            start,
            end,
        });
    }

    let mut last_block = std::collections::HashMap::new();
    for (i, block) in blocks.iter().enumerate() {
        if let Some(key) = block.key {
            last_block.insert(key, i);
        }
    }

    let kept: Vec<&str> = blocks
        .iter()
        .enumerate()
        .filter(|(i, block)| block.key.is_none_or(|key| last_block[key] == *i))
        .flat_map(|(_, block)| lines[block.start..block.end].iter().copied())
        .collect();

    kept.join("\n")
}

/// The key of an unindented `key: value` line.
///
/// Comments, sequence items and keys containing whitespace are not keys.
fn top_level_key(line: &str) -> Option<&str> {
    if line.is_empty() || line.starts_with(' ') || line.starts_with('\t') {
        return None;
    }
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('-') {
        return None;
    }
    let (key, _) = trimmed.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains([' ', '\t']) {
        return None;
    }
    Some(key)
}
