// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! `tailor-measure` command-line entry point.

use std::process;

use clap::Parser;

use tailor_measure::cli::args::{Cli, Commands};
use tailor_measure::cli::{check, measure, quality};
use tailor_measure::error;

fn main() {
    let cli = Cli::parse();

    let outcome = match &cli.command {
        Commands::Measure(args) => measure::run_measure(args).map(|_| ()),
        Commands::Check(args) => check::run_check(args).map(|_| ()),
        Commands::Quality(args) => quality::run_quality(args).map(|_| ()),
    };

    if let Err(e) = outcome {
        error!("{e}");
        process::exit(1);
    }
}
