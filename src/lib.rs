//! A conformance-test harness for command-line interpreters.
//!
//! Fixture files carry a tag header and one or more cases. Each case is run
//! through the binary under test and its exit code or output is compared
//! against the expectation embedded in the fixture.

pub mod cases;
pub mod cli;
pub mod compare;
pub mod discovery;
pub mod errors;
pub mod fixture;
pub mod harness;
pub mod output;
pub mod runner;
pub mod sanitize;
pub mod target;

pub use crate::errors::{CaseFailure, FixtureError, TargetError};
pub use crate::harness::{Harness, HarnessConfig, RunResults};
pub use crate::runner::{CaseRunner, Verdict};
