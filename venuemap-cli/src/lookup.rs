//! Reference-table lookups: related states and query location rewrites.

use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use venuemap_core::states::{nearest_us_states, neighbouring_us_states, resolve_us_state};
use venuemap_resolver::{ParsedLocation, resolve_query_location};

use crate::{
    ARG_STATES_BY, ARG_STATES_COUNT, ARG_STATES_STATE, CliError, ENV_STATES_STATE, write_json,
};

const DEFAULT_STATE_COUNT: usize = 5;

/// How `states` ranks candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StatesBy {
    /// Textual similarity to the supplied name.
    #[default]
    Name,
    /// Distance between state centroids.
    Distance,
}

/// CLI arguments for the `states` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank the fifty U.S. states against a name. By default states \
                 are ordered by how closely their names match, which helps \
                 recover from typos; with --by distance the other states are \
                 ordered by how far their centroids lie from the named one.",
    about = "List the U.S. states closest to a name"
)]
#[ortho_config(prefix = "VENUEMAP")]
pub(crate) struct StatesArgs {
    /// State name or postal abbreviation.
    #[arg(value_name = "state")]
    #[serde(default)]
    pub(crate) state: Option<String>,
    /// Number of states to list.
    #[arg(long = ARG_STATES_COUNT, value_name = "n")]
    #[serde(default)]
    pub(crate) count: Option<usize>,
    /// Ranking to apply.
    #[arg(long = ARG_STATES_BY, value_enum)]
    #[serde(default)]
    pub(crate) by: Option<StatesBy>,
}

/// Resolved `states` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatesConfig {
    pub(crate) state: String,
    pub(crate) count: usize,
    pub(crate) by: StatesBy,
}

impl TryFrom<StatesArgs> for StatesConfig {
    type Error = CliError;

    fn try_from(args: StatesArgs) -> Result<Self, Self::Error> {
        let state = args.state.ok_or(CliError::MissingArgument {
            field: ARG_STATES_STATE,
            env: ENV_STATES_STATE,
        })?;
        Ok(Self {
            state,
            count: args.count.unwrap_or(DEFAULT_STATE_COUNT),
            by: args.by.unwrap_or_default(),
        })
    }
}

pub(crate) fn list_states(config: &StatesConfig) -> Result<Vec<&'static str>, CliError> {
    match config.by {
        StatesBy::Name => Ok(nearest_us_states(&config.state, config.count)),
        StatesBy::Distance => {
            if resolve_us_state(&config.state).is_none() {
                return Err(CliError::UnknownState {
                    name: config.state.clone(),
                });
            }
            Ok(neighbouring_us_states(&config.state, config.count))
        }
    }
}

impl StatesArgs {
    pub(crate) fn into_config(self) -> Result<StatesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        StatesConfig::try_from(merged)
    }
}

pub(crate) fn run_states(args: StatesArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    write_json(writer, &list_states(&config)?)
}

/// CLI arguments for the `resolve` subcommand.
#[derive(Debug, Clone, Parser)]
#[command(about = "Show how a search query's location would be rewritten")]
pub(crate) struct ResolveArgs {
    /// Raw search query, e.g. "comedy clubs in nyc".
    #[arg(value_name = "query")]
    pub(crate) query: String,
    /// City already parsed from the query.
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// State already parsed from the query.
    #[arg(long)]
    pub(crate) state: Option<String>,
    /// Country already parsed from the query.
    #[arg(long)]
    pub(crate) country: Option<String>,
}

impl ResolveArgs {
    fn parsed_location(&self) -> ParsedLocation {
        ParsedLocation {
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            rest_of_query: self.query.clone(),
        }
    }
}

pub(crate) fn run_resolve(args: &ResolveArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let overrides = resolve_query_location(&args.query, &args.parsed_location());
    if let Some(alias) = overrides.matched_alias {
        log::info!("query matched override alias {alias:?}");
    }
    write_json(writer, &overrides)
}
