//! Shared helpers for integration tests.
//!
//! Fixtures in these tests use `/bin/sh` as the interpreter under test, so
//! each case's source is a small shell script.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fixture_harness::output::BufferSink;
use fixture_harness::{CaseRunner, Harness, HarnessConfig, RunResults};

pub const SHELL: &str = "/bin/sh";

/// Writes a fixture with the standard header followed by `body`.
pub fn write_fixture(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("title: {name}\nauthor: Tests\n*****\n{body}")).unwrap();
    path
}

/// Config placing scratch files in `scratch`.
pub fn config_in(scratch: &Path) -> HarnessConfig {
    HarnessConfig {
        temp_dir: scratch.to_path_buf(),
        ..HarnessConfig::default()
    }
}

/// Runs `fixtures` through the shell and returns the results and captured output.
pub fn run_with_shell(config: &HarnessConfig, fixtures: &[PathBuf]) -> (RunResults, String) {
    let harness = Harness::new(CaseRunner::new(SHELL, config));
    let mut out = BufferSink::new();
    let results = harness.run(fixtures, &mut out);
    (results, out.buffer)
}

pub fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}
