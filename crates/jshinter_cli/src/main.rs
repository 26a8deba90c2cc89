//! jshinter CLI
//!
//! Lints a JavaScript source tree once and writes QUnit-style test files.

use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

use jshinter_core::{CycleReport, HinterError, IncrementalProcessor};

mod cli;
mod options;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Runs one cycle. Returns `Ok(true)` when `--fail-on-any-error` tripped.
fn run(cli: &Cli) -> Result<bool> {
    let options = options::load_options(cli)?;
    let log = options.log;
    let mut processor = IncrementalProcessor::new(options).into_diagnostic()?;

    match processor.run_cycle(&cli.source, &cli.dest) {
        Ok(report) => {
            if log {
                output_summary(&report);
            }
            Ok(false)
        }
        Err(HinterError::LintFailed { failed }) => {
            error!("JSHint failed: {} file(s) did not pass", failed);
            Ok(true)
        }
        Err(e) => Err(e).into_diagnostic(),
    }
}

fn output_summary(report: &CycleReport) {
    println!(
        "Checked {} files ({} from cache), {} failed, wrote {} files",
        report.files,
        report.reused,
        report.failed,
        report.outputs.len()
    );
}
