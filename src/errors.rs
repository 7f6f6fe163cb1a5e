//! Error types for the harness.
//!
//! Fixture and case errors are recoverable: they are rendered into the run
//! report and iteration continues. [`TargetError`] is the only category that
//! stops a run, and it can only happen before the first fixture is processed.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use crate::compare::MatchMode;

/// Reasons a fixture cannot produce any test cases.
#[derive(Debug, Error, Diagnostic)]
pub enum FixtureError {
    #[error("Error finding header in file (expected header and body, found {parts} part(s))")]
    #[diagnostic(
        code(fixture::malformed),
        help("separate the header from the body with a single line of five or more '*'")
    )]
    MalformedFixture { parts: usize },

    #[error("Cannot find tag on line {line}")]
    #[diagnostic(
        code(fixture::missing_tag_separator),
        help("header lines must look like `key: value`")
    )]
    MissingTagSeparator { line: usize },

    #[error("Error finding mandatory headers: {}", .missing.join(", "))]
    #[diagnostic(code(fixture::missing_mandatory_tags))]
    MissingMandatoryTags { missing: Vec<String> },

    #[error("Cannot read fixture {}: {source}", .path.display())]
    #[diagnostic(code(fixture::unreadable))]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single case was classified as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseFailure {
    #[error("Expected exitcode 0, got exitcode {code}")]
    ExitMismatch { code: i32 },

    #[error("{}", render_mismatch(.mode, .diff))]
    OutputMismatch { mode: MatchMode, diff: Vec<String> },

    #[error("Cannot execute test binary: {message}")]
    LaunchFailed { message: String },

    #[error("Test binary did not finish within {} seconds", .after.as_secs())]
    TimedOut { after: Duration },
}

fn render_mismatch(mode: &MatchMode, diff: &[String]) -> String {
    match mode {
        MatchMode::Strict => diff.join("\n"),
        MatchMode::Fuzzy => "Expected output not found in actual output".to_string(),
    }
}

/// Problems with the binary under test, detected before the run starts.
#[derive(Debug, Error, Diagnostic)]
pub enum TargetError {
    #[error("No binary under test configured")]
    #[diagnostic(
        code(target::not_configured),
        help("pass --bin <path> or set the FIXTURE_TEST_BIN environment variable")
    )]
    NotConfigured,

    #[error("Cannot run {} version --long: {reason}", .path.display())]
    #[diagnostic(
        code(target::unreachable),
        help("check that the binary exists, is executable and supports `version --long`")
    )]
    Unreachable { path: PathBuf, reason: String },

    #[error("Cannot find a version number in {output:?}")]
    #[diagnostic(code(target::version_unparseable))]
    VersionUnparseable { output: String },
}

/// Failures writing the optional JSON report.
#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("Cannot write report to {}", .path.display())]
    #[diagnostic(code(report::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot serialize run results")]
    #[diagnostic(code(report::serialize))]
    Serialize(#[from] serde_json::Error),
}
