//! Extcheck - extension compatibility checker
//!
//! A command line tool that detects compatibility conflicts between a custom
//! platform extension archive (.amp, .jar) and baseline platform releases:
//! overwritten files and beans, classpath collisions, and usage of internal
//! or bundled code that may change between releases.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod analyser;
mod cli;
mod commands;
mod error;
mod inventory;
mod model;
mod report;
mod version;

use cli::{Cli, Commands};
use error::ExtcheckError;

/// Exit code when the analysed extension has conflicts.
const EXIT_CONFLICTS: i32 = 1;
/// Exit code for fatal errors (bad archive, bad store, bad configuration).
const EXIT_ERROR: i32 = 2;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Analyse(args) => match commands::analyse::run(args) {
            Ok(true) => {
                std::process::exit(EXIT_CONFLICTS);
            }
            Ok(false) => Ok(()),
            Err(e) => Err(e),
        },
        Commands::Inventory(args) => commands::inventory::run(args),
        Commands::ListVersions(args) => commands::list_versions::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(EXIT_ERROR);
    }
}

fn report_error(error: &ExtcheckError) {
    eprintln!("Error: {error}");
    if let Some(help) = miette::Diagnostic::help(error) {
        eprintln!("  help: {help}");
    }
}
