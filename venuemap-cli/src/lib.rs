//! Command-line interface for the venuemap engine.
//!
//! - `venuemap score` ranks, and with `--place` places, the hits in a JSON
//!   request.
//! - `venuemap states` lists the U.S. states closest to a name.
//! - `venuemap resolve` shows how a query's location would be rewritten.
//!
//! Every command writes JSON to stdout. Diagnostics go to stderr, filtered
//! by `VENUEMAP_LOG`.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

mod error;
mod fs;
mod logging;
mod lookup;
mod score;

pub use error::CliError;
use lookup::{ResolveArgs, StatesArgs, run_resolve, run_states};
use score::{ScoreArgs, run_score};

pub(crate) const ARG_SCORE_REQUEST: &str = "request";
pub(crate) const ARG_SCORE_PLACE: &str = "place";
pub(crate) const ENV_SCORE_REQUEST: &str = "VENUEMAP_CMDS_SCORE_REQUEST_PATH";
pub(crate) const ARG_STATES_STATE: &str = "state";
pub(crate) const ARG_STATES_COUNT: &str = "count";
pub(crate) const ARG_STATES_BY: &str = "by";
pub(crate) const ENV_STATES_STATE: &str = "VENUEMAP_CMDS_STATES_STATE";

/// Run the venuemap CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration or input are invalid,
/// or when output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init()?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Score(args) => run_score(args, writer),
        Command::States(args) => run_states(args, writer),
        Command::Resolve(args) => run_resolve(&args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "venuemap",
    about = "Rank, correct and place geographic search hits",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score hits from a JSON request and print the ranking.
    Score(ScoreArgs),
    /// List the U.S. states closest to a name.
    States(StatesArgs),
    /// Show how a search query's location would be rewritten.
    Resolve(ResolveArgs),
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
