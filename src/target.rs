//! Locating and probing the binary under test.

use std::path::{Path, PathBuf};
use std::process::Command;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::TargetError;

/// Environment variable naming the binary under test.
pub const BINARY_ENV: &str = "FIXTURE_TEST_BIN";

lazy_static! {
    static ref VERSION: Regex = Regex::new(r"[0-9.]+").unwrap();
}

/// A binary that answered `version --long`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBinary {
    pub path: PathBuf,
    pub version: String,
}

impl TargetBinary {
    /// Runs `<path> version --long` and extracts the version number from the
    /// first line of its output.
    pub fn probe(path: Option<&Path>) -> Result<Self, TargetError> {
        let path = path.ok_or(TargetError::NotConfigured)?;

        let output = Command::new(path)
            .args(["version", "--long"])
            .output()
            .map_err(|e| TargetError::Unreachable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(TargetError::Unreachable {
                path: path.to_path_buf(),
                reason: format!("exited with {}", output.status),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = parse_version(&stdout)?;
        Ok(TargetBinary {
            path: path.to_path_buf(),
            version,
        })
    }
}

/// Finds the first version-like token on the first line of `output`.
pub fn parse_version(output: &str) -> Result<String, TargetError> {
    let first_line = output.lines().next().unwrap_or_default();
    VERSION
        .find(first_line)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| TargetError::VersionUnparseable {
            output: first_line.to_string(),
        })
}
