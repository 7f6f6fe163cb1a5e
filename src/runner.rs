//! Execution of a single case against the binary under test.
//!
//! A case block is parsed into a [`TestCase`], its source (and expectation, if
//! any) is written to scratch files, the binary is run with the source file as
//! its only argument, and the captured output decides the [`Verdict`].

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::cases::CaseBlock;
use crate::compare::{compare_files, MatchMode};
use crate::errors::CaseFailure;
use crate::harness::HarnessConfig;

lazy_static! {
    static ref MODE_DELIMITER: Regex = Regex::new(r"(?m)^(=+|~+)$").unwrap();
}

/// Suffixes of every scratch path a case may leave behind, including the
/// bare base name and the interpreter's compiled cache (`.sfc`).
pub const ARTIFACT_SUFFIXES: [&str; 6] = ["", ".sf", ".sfc", ".exp", ".out", ".diff"];

const POLL_INTERVAL: Duration = Duration::from_millis(10);

// =============================================================================
// CORE TYPES
// =============================================================================

/// Classification of one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    Ignore,
    Skip,
}

impl Verdict {
    /// Progress symbol written for this verdict.
    pub fn symbol(self) -> &'static str {
        match self {
            Verdict::Pass => "-",
            Verdict::Fail => "X",
            Verdict::Ignore => "I",
            Verdict::Skip => "S",
        }
    }
}

/// A case block with its directives and sections separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub index: usize,
    pub line: usize,
    pub skip: bool,
    pub ignore_result: bool,
    pub source: String,
    /// Trimmed expected output; `None` when the case only checks the exit code.
    pub expected: Option<String>,
    pub mode: MatchMode,
}

impl TestCase {
    pub fn from_block(block: &CaseBlock) -> Self {
        let text = block.text.as_str();
        let leading = text.trim_start();
        let skip = has_directive(leading, "!skip");
        let ignore_result = !skip && has_directive(leading, "!ignore");

        let (source, expected, mode) = match MODE_DELIMITER.captures(text) {
            Some(caps) => {
                let delimiter = caps.get(0).map_or(0..0, |m| m.range());
                let mode = caps[1]
                    .chars()
                    .next()
                    .and_then(MatchMode::from_delimiter)
                    .unwrap_or(MatchMode::Strict);
                let rest = &text[delimiter.end..];
                let rest = rest.strip_prefix('\n').unwrap_or(rest).trim();
                let expected = (!rest.is_empty()).then(|| rest.to_string());
                (&text[..delimiter.start], expected, mode)
            }
            None => (text, None, MatchMode::Strict),
        };

        TestCase {
            index: block.index,
            line: block.line,
            skip,
            ignore_result,
            source: source.to_string(),
            expected,
            mode,
        }
    }

    pub fn output_expected(&self) -> bool {
        self.expected.is_some()
    }
}

fn has_directive(text: &str, directive: &str) -> bool {
    text.get(..directive.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(directive))
}

/// Verdict of one case plus the formatted report when it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub verdict: Verdict,
    pub failure: Option<CaseFailure>,
    pub report: Option<String>,
}

// =============================================================================
// SCRATCH FILES
// =============================================================================

/// Scratch files for one case, removed when dropped.
#[derive(Debug)]
pub struct TempArtifacts {
    base: PathBuf,
}

impl TempArtifacts {
    /// Reserves a unique base name inside `dir`.
    pub fn create(dir: &Path) -> io::Result<Self> {
        let base = tempfile::Builder::new()
            .prefix("fixture_test")
            .tempfile_in(dir)?
            .into_temp_path()
            .keep()
            .map_err(|e| e.error)?;
        Ok(TempArtifacts { base })
    }

    pub fn source(&self) -> PathBuf {
        self.with_suffix(".sf")
    }

    pub fn expected(&self) -> PathBuf {
        self.with_suffix(".exp")
    }

    pub fn output(&self) -> PathBuf {
        self.with_suffix(".out")
    }

    /// Every path this case may have produced.
    pub fn paths(&self) -> Vec<PathBuf> {
        ARTIFACT_SUFFIXES
            .iter()
            .map(|suffix| self.with_suffix(suffix))
            .collect()
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.base.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        for path in self.paths() {
            let _ = fs::remove_file(path);
        }
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Runs cases against one binary.
#[derive(Debug, Clone)]
pub struct CaseRunner {
    binary: PathBuf,
    timeout: Option<Duration>,
    temp_dir: PathBuf,
}

impl CaseRunner {
    pub fn new(binary: impl Into<PathBuf>, config: &HarnessConfig) -> Self {
        CaseRunner {
            binary: binary.into(),
            timeout: config.timeout,
            temp_dir: config.temp_dir.clone(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Runs one case block of the fixture at `fixture`.
    pub fn run(&self, fixture: &Path, block: &CaseBlock) -> CaseOutcome {
        let case = TestCase::from_block(block);
        if case.skip {
            return CaseOutcome {
                verdict: Verdict::Skip,
                failure: None,
                report: None,
            };
        }

        let failure = self.execute(&case).err();
        let report = failure
            .as_ref()
            .map(|failure| format_report(fixture, &case, failure));
        let verdict = match (&failure, case.ignore_result) {
            (_, true) => Verdict::Ignore,
            (Some(_), false) => Verdict::Fail,
            (None, false) => Verdict::Pass,
        };

        CaseOutcome {
            verdict,
            failure,
            report,
        }
    }

    /// Runs the binary and compares its output. Scratch files are removed on
    /// every return path when `artifacts` goes out of scope.
    fn execute(&self, case: &TestCase) -> Result<(), CaseFailure> {
        let artifacts = TempArtifacts::create(&self.temp_dir).map_err(launch_failed)?;

        fs::write(artifacts.source(), &case.source).map_err(launch_failed)?;
        if let Some(expected) = &case.expected {
            fs::write(artifacts.expected(), expected).map_err(launch_failed)?;
        }

        let code = self.invoke(&artifacts.source(), &artifacts.output())?;

        match &case.expected {
            None if code != 0 => Err(CaseFailure::ExitMismatch { code }),
            None => Ok(()),
            Some(_) => {
                let comparison =
                    compare_files(&artifacts.output(), &artifacts.expected(), case.mode);
                if comparison.is_match() {
                    Ok(())
                } else {
                    Err(CaseFailure::OutputMismatch {
                        mode: case.mode,
                        diff: comparison.diff,
                    })
                }
            }
        }
    }

    /// Runs `<binary> <source>` with stdout and stderr both sent to `capture`.
    fn invoke(&self, source: &Path, capture: &Path) -> Result<i32, CaseFailure> {
        let stdout = File::create(capture).map_err(launch_failed)?;
        let stderr = stdout.try_clone().map_err(launch_failed)?;

        let mut child = Command::new(&self.binary)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(launch_failed)?;

        let Some(limit) = self.timeout else {
            let status = child.wait().map_err(launch_failed)?;
            return Ok(exit_code(status));
        };

        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(exit_code(status)),
                Ok(None) if start.elapsed() > limit => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CaseFailure::TimedOut { after: limit });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(launch_failed(e)),
            }
        }
    }
}

fn launch_failed(err: io::Error) -> CaseFailure {
    CaseFailure::LaunchFailed {
        message: err.to_string(),
    }
}

/// Exit code as a shell would report it: signals map to `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

/// Formats the report collected for a failed case.
pub fn format_report(fixture: &Path, case: &TestCase, failure: &CaseFailure) -> String {
    format!(
        "Error in {} (test {}, line {})\n{}\n",
        fixture.display(),
        case.index,
        case.line,
        failure
    )
}
