//! Defines the command-line arguments for the harness.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::discovery::DEFAULT_EXTENSION;
use crate::target::BINARY_ENV;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "fixture-harness",
    version,
    about = "Runs an interpreter binary against fixture files and reports the results."
)]
pub struct HarnessArgs {
    /// Fixture files or directories to search for fixtures.
    #[arg(default_value = "tests")]
    pub paths: Vec<PathBuf>,

    /// The binary under test.
    #[arg(long = "bin", env = BINARY_ENV)]
    pub binary: Option<PathBuf>,

    /// Extension of fixture files when searching directories.
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Abort a case after this many seconds.
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// When to color terminal output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Also write the plain-text report to this file.
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Write the final counters and error reports as JSON.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}
