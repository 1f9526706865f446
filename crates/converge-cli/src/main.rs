//! converge CLI
//!
//! Reconciles one path to a declared state and prints the result as JSON.

mod cli;
mod error;
mod logging;
mod output;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use converge_core::{FileParams, InvocationOptions, Reconciler};

use cli::Cli;
use error::{CliError, Result};
use output::Failure;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }

    let params = match cli.to_params() {
        Ok(params) => params,
        Err(e) => fail(&e, None),
    };

    if let Err(e) = run(&params, cli.check) {
        fail(&e, fallback_path(&params));
    }
}

/// The path a failure is reported against when the error names none.
fn fallback_path(params: &FileParams) -> Option<PathBuf> {
    let target = if params.peek {
        params.target()
    } else {
        params.effective_target()
    };
    target.ok()
}

fn run(params: &FileParams, check_mode: bool) -> Result<()> {
    let options = InvocationOptions::detect(check_mode);
    tracing::debug!(check_mode, security_labels = options.capabilities.security_labels, "starting");

    let outcome = Reconciler::system(options).run(params)?;
    output::emit(&outcome)
}

/// Print the failure payload and exit 1.
fn fail(err: &CliError, target: Option<PathBuf>) -> ! {
    if let Err(e) = output::emit(&Failure::new(err, target)) {
        tracing::error!(error = %e, "could not write failure payload");
    }
    eprintln!("{}: {}", "error".red().bold(), err);
    std::process::exit(1);
}
