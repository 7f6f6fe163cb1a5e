//! Output comparison strategies.
//!
//! Two modes are supported, selected by the delimiter that introduces a
//! case's expected output:
//!
//! - [`MatchMode::Strict`] (`=====`): line-by-line, order-sensitive, with the
//!   shorter side padded with empty lines. A pair of lines also matches when
//!   the expected line is non-empty and occurs (case-insensitively) inside the
//!   actual line.
//! - [`MatchMode::Fuzzy`] (`~~~~~`): the trimmed expected text must occur
//!   somewhere in the trimmed actual text.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::sanitize::sanitize_line;

/// How captured output is matched against the expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Strict,
    Fuzzy,
}

impl MatchMode {
    /// Maps the repeated character of a mode delimiter line to its mode.
    pub fn from_delimiter(c: char) -> Option<Self> {
        match c {
            '=' => Some(MatchMode::Strict),
            '~' => Some(MatchMode::Fuzzy),
            _ => None,
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Strict => write!(f, "strict"),
            MatchMode::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// Result of comparing actual output with an expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    matched: bool,
    /// Mismatching pairs as `+++ '<actual>'` / `--- '<expected>'` lines.
    /// Always empty in fuzzy mode.
    pub diff: Vec<String>,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        self.matched
    }
}

/// Compares two texts line by line.
pub fn compare_strict(actual: &str, expected: &str) -> Comparison {
    let mut actual_lines: Vec<&str> = actual.split_inclusive('\n').collect();
    let mut expected_lines: Vec<&str> = expected.split_inclusive('\n').collect();

    let len = actual_lines.len().max(expected_lines.len());
    actual_lines.resize(len, "");
    expected_lines.resize(len, "");

    let mut diff = Vec::new();
    for (actual_line, expected_line) in actual_lines.iter().zip(&expected_lines) {
        let actual_line = sanitize_line(actual_line);
        let expected_line = sanitize_line(expected_line);

        if actual_line == expected_line {
            continue;
        }
        if expected_line.is_empty() || !contains_ignore_case(&actual_line, &expected_line) {
            diff.push(format!("+++ '{}'", actual_line));
            diff.push(format!("--- '{}'", expected_line));
        }
    }

    Comparison {
        matched: diff.is_empty(),
        diff,
    }
}

/// Checks whether the trimmed expectation occurs anywhere in the trimmed output.
pub fn compare_fuzzy(actual: &str, expected: &str) -> Comparison {
    Comparison {
        matched: actual.trim().contains(expected.trim()),
        diff: Vec::new(),
    }
}

/// Compares the contents of two files. Unreadable files count as empty.
pub fn compare_files(actual: &Path, expected: &Path, mode: MatchMode) -> Comparison {
    let actual = read_or_empty(actual);
    let expected = read_or_empty(expected);
    match mode {
        MatchMode::Strict => compare_strict(&actual, &expected),
        MatchMode::Fuzzy => compare_fuzzy(&actual, &expected),
    }
}

fn read_or_empty(path: &Path) -> String {
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
