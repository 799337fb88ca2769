//! Command-line interface for the classroom points engine
//!
//! Exposes the parsed argument surface (input file, processing strategy,
//! batch tuning, rankings limit) to the binary.

mod args;

pub use args::{CliArgs, StrategyType};

use clap::Parser;

/// Parse command-line arguments
///
/// On invalid or missing arguments (or `--help`/`--version`), clap prints
/// the appropriate message and exits the process, so callers only ever see
/// a fully-validated `CliArgs`.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
