//! The harness command-line interface.
//!
//! Wires the environment collaborators (binary probe, fixture discovery,
//! output sinks) to the core harness and maps the run to an exit status.

use std::process;
use std::time::Duration;

use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use termcolor::ColorChoice;

use crate::cli::args::{ColorMode, HarnessArgs};
use crate::discovery::discover_fixtures;
use crate::harness::{Harness, HarnessConfig};
use crate::output::{FileSink, MultiSink, TerminalSink};
use crate::runner::CaseRunner;
use crate::target::TargetBinary;

pub mod args;

/// The main entry point for the CLI.
pub fn run() {
    let args = HarnessArgs::parse();
    match execute(args) {
        Ok(code) => process::exit(code),
        Err(report) => {
            eprintln!("{:?}", report);
            process::exit(1);
        }
    }
}

/// Runs the harness for parsed arguments and returns the process exit status.
pub fn execute(args: HarnessArgs) -> miette::Result<i32> {
    let target = TargetBinary::probe(args.binary.as_deref())?;

    let config = HarnessConfig {
        timeout: args.timeout.map(Duration::from_secs),
        ..HarnessConfig::default()
    };

    let mut outputs = MultiSink::new();
    outputs.add_output(Box::new(terminal_sink(args.color)));
    if let Some(path) = &args.log {
        let sink = FileSink::create(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Cannot open log file {}", path.display()))?;
        outputs.add_output(Box::new(sink));
    }

    let fixtures = discover_fixtures(&args.paths, &args.extension);
    let harness =
        Harness::new(CaseRunner::new(&target.path, &config)).with_version(&target.version);
    let results = harness.run(&fixtures, &mut outputs);

    if let Some(path) = &args.json {
        results.write_json(path)?;
    }
    Ok(results.exit_code())
}

fn terminal_sink(mode: ColorMode) -> TerminalSink {
    match mode {
        ColorMode::Auto => TerminalSink::auto(),
        ColorMode::Always => TerminalSink::new(ColorChoice::Always),
        ColorMode::Never => TerminalSink::new(ColorChoice::Never),
    }
}
