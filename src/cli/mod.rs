// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Command-line interface for the `tailor-measure` binary.
//!
//! Argument parsing lives in [`args`]; each subcommand has its own runner
//! module that returns a [`crate::Result`] so `main` can report failures
//! uniformly.

/// CLI arguments.
pub mod args;

/// Console logging macros and verbosity flag.
pub mod logging;

/// `measure` command.
pub mod measure;

/// `check` command.
pub mod check;

/// `quality` command.
pub mod quality;
