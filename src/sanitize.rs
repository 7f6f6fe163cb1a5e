//! Line normalization applied before strict comparison.
//!
//! Interpreters under test prefix runtime errors with a line number that
//! depends on the temp file layout, so those prefixes are removed before the
//! expected and actual lines are compared.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ERROR_PREFIX: Regex = Regex::new(r"^Error: line \d+: ").unwrap();
    static ref ERROR_IN_PREFIX: Regex = Regex::new(r"^Error in line \d+: ").unwrap();
}

/// Strips known error prefixes and a single trailing newline from `line`.
pub fn sanitize_line(line: &str) -> String {
    let line = ERROR_PREFIX.replace(line, "");
    let line = ERROR_IN_PREFIX.replace(&line, "");
    line.strip_suffix('\n').unwrap_or(&line).to_string()
}
