//! Fixture header/body parsing.
//!
//! A fixture looks like:
//!
//! ```text
//! title: Integer addition
//! author: Jane Doe
//! # comments and blank lines are ignored
//! *****
//! <body: one or more cases separated by @@@@ lines>
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::FixtureError;

/// Tags every fixture header must define.
pub const MANDATORY_TAGS: [&str; 2] = ["title", "author"];

lazy_static! {
    static ref HEADER_DELIMITER: Regex = Regex::new(r"(?m)^\*{5,}\n").unwrap();
}

/// Header tags, keyed by lower-cased tag name.
pub type Tags = BTreeMap<String, String>;

/// A parsed fixture file.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub path: PathBuf,
    pub tags: Tags,
    pub body: String,
    /// Line number of the first body line in the original file.
    pub body_line: usize,
}

impl Fixture {
    /// Reads and parses the fixture at `path`.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = fs::read_to_string(path).map_err(|source| FixtureError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parses raw fixture text attributed to `path`.
    pub fn parse(path: &Path, content: &str) -> Result<Self, FixtureError> {
        let (header, body) = split_header(content)?;
        let tags = parse_header(header)?;
        Ok(Fixture {
            path: path.to_path_buf(),
            tags,
            body: body.to_string(),
            body_line: header.split('\n').count() + 1,
        })
    }

    pub fn title(&self) -> &str {
        self.tags.get("title").map(String::as_str).unwrap_or_default()
    }
}

/// Splits fixture text into header and body on the `*****` delimiter line.
///
/// At most four pieces are produced; anything but exactly two is rejected.
pub fn split_header(content: &str) -> Result<(&str, &str), FixtureError> {
    let parts: Vec<&str> = HEADER_DELIMITER.splitn(content, 4).collect();
    match parts.as_slice() {
        [header, body] => Ok((header, body)),
        _ => Err(FixtureError::MalformedFixture { parts: parts.len() }),
    }
}

/// Parses `key: value` header lines and validates the mandatory tags.
pub fn parse_header(header: &str) -> Result<Tags, FixtureError> {
    let mut tags = Tags::new();

    for (idx, line) in header.split('\n').enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or(FixtureError::MissingTagSeparator { line: idx + 1 })?;
        tags.insert(key.to_lowercase(), value.trim().to_string());
    }

    let present: BTreeSet<&str> = tags.keys().map(String::as_str).collect();
    let missing: Vec<String> = MANDATORY_TAGS
        .iter()
        .filter(|tag| !present.contains(*tag))
        .map(|tag| tag.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(FixtureError::MissingMandatoryTags { missing });
    }

    Ok(tags)
}
