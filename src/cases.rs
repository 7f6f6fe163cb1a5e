//! Splitting a fixture body into individual case blocks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CASE_DELIMITER: Regex = Regex::new(r"(?m)^@{4,}\n").unwrap();
}

/// One raw case taken from a fixture body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseBlock {
    /// 1-based position within the fixture.
    pub index: usize,
    /// Line in the fixture file where the block starts. Diagnostic only.
    pub line: usize,
    pub text: String,
}

/// Splits `body` on `@@@@` lines. `first_line` is the file line the body starts on.
///
/// A body without delimiters yields a single block.
pub fn split_cases(body: &str, first_line: usize) -> Vec<CaseBlock> {
    let mut line = first_line;
    CASE_DELIMITER
        .split(body)
        .enumerate()
        .map(|(idx, text)| {
            let block = CaseBlock {
                index: idx + 1,
                line,
                text: text.to_string(),
            };
            line += count_newlines(text) + 1;
            block
        })
        .collect()
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}
