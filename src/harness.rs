//! Run orchestration and result aggregation.
//!
//! The harness walks the fixture paths in order, parses each fixture, splits
//! it into cases, runs them one at a time and records every verdict in a
//! [`RunResults`]. Progress and the final summary go to an [`OutputSink`].
//!
//! Per fixture the progress line looks like:
//!
//! ```text
//! tests/strings.sft : String concatenation : [----------][-XI-S]
//! ```
//!
//! Fixtures that fail to parse are reported on their progress line, count as
//! a test file, and contribute no tests. Fixtures that cannot be read also
//! make the run exit with status 1.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::cases::split_cases;
use crate::errors::{FixtureError, ReportError};
use crate::fixture::Fixture;
use crate::output::{OutputSink, Style};
use crate::runner::{CaseOutcome, CaseRunner, Verdict};

/// Progress symbols are grouped in brackets of this size.
const GROUP_SIZE: usize = 10;

const REPORT_SEPARATOR: &str = "=============================\n";

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Settings passed from the command line into the core.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Upper bound on a single case's run time. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Directory that receives per-case scratch files.
    pub temp_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            temp_dir: std::env::temp_dir(),
        }
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Counters and error reports for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResults {
    pub total_files: usize,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub skipped: usize,
    /// Fixtures that could not be read. Not part of the verdict buckets.
    pub unreadable_files: usize,
    pub errors: Vec<String>,
}

impl RunResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_file(&mut self) {
        self.total_files += 1;
    }

    pub fn record_unreadable(&mut self) {
        self.unreadable_files += 1;
    }

    /// Counts one case outcome and keeps its report, if any.
    pub fn record(&mut self, outcome: CaseOutcome) {
        self.total_tests += 1;
        match outcome.verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail => self.failed += 1,
            Verdict::Ignore => self.ignored += 1,
            Verdict::Skip => self.skipped += 1,
        }
        if let Some(report) = outcome.report {
            self.errors.push(report);
        }
    }

    /// Folds the results of a partial run into this one.
    pub fn merge(&mut self, other: RunResults) {
        self.total_files += other.total_files;
        self.total_tests += other.total_tests;
        self.passed += other.passed;
        self.failed += other.failed;
        self.ignored += other.ignored;
        self.skipped += other.skipped;
        self.unreadable_files += other.unreadable_files;
        self.errors.extend(other.errors);
    }

    /// Process exit status for this run: 1 when a case failed or a fixture
    /// could not be read.
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 || self.unreadable_files > 0 {
            1
        } else {
            0
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `part` as a percentage of `total`, with two decimals.
pub fn percentage(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", part as f64 / total as f64 * 100.0)
}

// =============================================================================
// HARNESS
// =============================================================================

pub struct Harness {
    runner: CaseRunner,
    version: Option<String>,
}

impl Harness {
    pub fn new(runner: CaseRunner) -> Self {
        Self {
            runner,
            version: None,
        }
    }

    /// Version of the binary under test, shown in the banner.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Runs every fixture in `paths`, writing progress and a summary to `out`.
    pub fn run<I, P>(&self, paths: I, out: &mut dyn OutputSink) -> RunResults
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut results = RunResults::new();
        self.write_banner(out);

        let start = Instant::now();
        for path in paths {
            self.run_fixture(path.as_ref(), &mut results, out);
        }

        write_summary(&results, start.elapsed(), out);
        results
    }

    fn write_banner(&self, out: &mut dyn OutputSink) {
        out.write_str(&format!(
            "Fixture harness v{} - testing {}",
            env!("CARGO_PKG_VERSION"),
            self.runner.binary().display()
        ));
        if let Some(version) = &self.version {
            out.write_str(&format!(" (version {})", version));
        }
        out.write_str("\n");
    }

    /// Processes one fixture file.
    pub fn run_fixture(&self, path: &Path, results: &mut RunResults, out: &mut dyn OutputSink) {
        results.record_file();
        out.write_str(&format!("{} : ", path.display()));

        let fixture = match Fixture::load(path) {
            Ok(fixture) => fixture,
            Err(e) => {
                if matches!(e, FixtureError::Unreadable { .. }) {
                    results.record_unreadable();
                }
                out.write_str(&format!("{}\n", e));
                return;
            }
        };

        out.write_str(&format!("{} : [", fixture.title()));
        for block in split_cases(&fixture.body, fixture.body_line) {
            let outcome = self.runner.run(&fixture.path, &block);
            if block.index > 1 && (block.index - 1) % GROUP_SIZE == 0 {
                out.write_str("][");
            }
            out.write_styled(outcome.verdict.symbol(), verdict_style(outcome.verdict));
            results.record(outcome);
        }
        out.write_str("]\n");
    }
}

fn verdict_style(verdict: Verdict) -> Style {
    match verdict {
        Verdict::Pass => Style::Pass,
        Verdict::Fail => Style::Fail,
        Verdict::Ignore => Style::Ignore,
        Verdict::Skip => Style::Skip,
    }
}

fn write_summary(results: &RunResults, elapsed: Duration, out: &mut dyn OutputSink) {
    let total = results.total_tests;
    out.write_str(&format!(
        "Finished in {:.2} seconds\n",
        elapsed.as_secs_f64()
    ));
    out.write_str("Status\n");
    out.write_str(&format!("    Test files  : {:5}\n", results.total_files));
    out.write_str(&format!("    Total tests : {:5}\n", total));

    let passed = format!(
        "    Passed      : {:5} ({})",
        results.passed,
        percentage(results.passed, total)
    );
    if results.exit_code() == 0 {
        out.write_styled(&passed, Style::Success);
    } else {
        out.write_str(&passed);
    }
    out.write_str("\n");

    let failed = format!(
        "    Failed      : {:5} ({})",
        results.failed,
        percentage(results.failed, total)
    );
    if results.failed > 0 {
        out.write_styled(&failed, Style::Failure);
    } else {
        out.write_str(&failed);
    }
    out.write_str("\n");

    out.write_str(&format!(
        "    Ignored     : {:5} ({})\n",
        results.ignored,
        percentage(results.ignored, total)
    ));
    out.write_str(&format!(
        "    Skipped     : {:5} ({})\n",
        results.skipped,
        percentage(results.skipped, total)
    ));
    if results.unreadable_files > 0 {
        out.write_styled(
            &format!("    Unreadable  : {:5} file(s)", results.unreadable_files),
            Style::Failure,
        );
        out.write_str("\n");
    }
    out.write_str("\n");

    for error in &results.errors {
        out.write_str(REPORT_SEPARATOR);
        out.write_str(error);
        out.write_str("\n");
    }
}
