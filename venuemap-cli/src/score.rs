//! Score command implementation for the venuemap CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};
use venuemap_core::{ErrorKind, Hit, HitError};
use venuemap_scorer::{ScoreOutcome, ScoredHit, ScoringConfig, ScoringEngine};

use crate::{
    ARG_SCORE_PLACE, ARG_SCORE_REQUEST, CliError, ENV_SCORE_REQUEST,
    fs::{file_is_file, open_utf8_file},
    write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score a batch of hits. The request is a JSON object with a \
                 `config` (weights, threshold_px, world_size, max_results, \
                 viewport and optional tuning) and a `hits` array. Prints the \
                 ranked hits and any per-hit errors as JSON.",
    about = "Rank hits from a JSON request"
)]
#[ortho_config(prefix = "VENUEMAP")]
pub(crate) struct ScoreArgs {
    /// Path to a JSON file containing the score request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Also select a viewport-stable, non-overlapping subset to draw.
    #[arg(long = ARG_SCORE_PLACE)]
    #[serde(default)]
    pub(crate) place: bool,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Whether to place the ranked hits.
    pub(crate) place: bool,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match file_is_file(&self.request_path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_SCORE_REQUEST,
                path: self.request_path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_SCORE_REQUEST,
                    path: self.request_path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_SCORE_REQUEST,
                path: self.request_path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SCORE_REQUEST,
            env: ENV_SCORE_REQUEST,
        })?;
        Ok(Self {
            request_path,
            place: args.place,
        })
    }
}

/// A scoring configuration and the hits to score with it.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) config: ScoringConfig,
    #[serde(default)]
    pub(crate) hits: Vec<Hit>,
}

#[derive(Debug, Serialize)]
struct RowError<'a> {
    index: usize,
    id: &'a str,
    kind: ErrorKind,
    message: String,
}

impl<'a> From<&'a HitError> for RowError<'a> {
    fn from(err: &'a HitError) -> Self {
        Self {
            index: err.index,
            id: &err.id,
            kind: err.kind(),
            message: err.error.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ScoreResponse<'a> {
    hits: &'a [ScoredHit],
    errors: Vec<RowError<'a>>,
}

impl<'a> From<&'a ScoreOutcome> for ScoreResponse<'a> {
    fn from(outcome: &'a ScoreOutcome) -> Self {
        Self {
            hits: &outcome.hits,
            errors: outcome.errors.iter().map(RowError::from).collect(),
        }
    }
}

pub(crate) fn run_score(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_score_config(args)?;
    let request = load_score_request(&config.request_path)?;
    let outcome = execute_score(&config, request)?;
    write_json(writer, &ScoreResponse::from(&outcome))
}

pub(crate) fn resolve_score_config(args: ScoreArgs) -> Result<ScoreConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_score(
    config: &ScoreConfig,
    request: ScoreRequest,
) -> Result<ScoreOutcome, CliError> {
    let ScoreRequest {
        config: scoring,
        hits,
    } = request;
    let submitted = hits.len();
    let engine = ScoringEngine::new(scoring)?;
    let outcome = if config.place {
        engine.score_and_place(hits)?
    } else {
        engine.score_hits(hits)?
    };
    log::info!(
        "{} of {submitted} hits returned, {} rejected",
        outcome.hits.len(),
        outcome.errors.len()
    );
    Ok(outcome)
}

/// Loads a JSON-encoded [`ScoreRequest`] from disk.
pub(crate) fn load_score_request(path: &Utf8Path) -> Result<ScoreRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenScoreRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseScoreRequest {
        path: path.to_path_buf(),
        source,
    })
}
