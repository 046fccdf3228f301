//! Diagnostic logging on stderr.
//!
//! The library crates log through the `log` facade; the subscriber installed
//! here forwards those records alongside any `tracing` events.

use tracing_subscriber::EnvFilter;

use crate::CliError;

/// Environment variable holding the log filter, e.g. `venuemap_scorer=debug`.
pub(crate) const LOG_ENV: &str = "VENUEMAP_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber.
pub(crate) fn init() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(CliError::InitLogging)
}
