//! Scoring configuration and its validation.
//!
//! Hosts send configuration as JSON. Every field is optional at the parsing
//! stage so that a missing required field can be reported by name rather
//! than as a generic decoding failure. Unknown fields are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use venuemap_core::{
    EngineError, GeoPoint, Viewport,
    boundary::validate_threshold,
    geo_math::validate_world_size,
};
use venuemap_placer::DEFAULT_CELL_SIZE_PX;
use venuemap_resolver::ParsedLocation;

use crate::weights::ScoreWeights;

/// Default e-folding length of the distance component.
pub const DEFAULT_DISTANCE_DECAY_KM: f64 = 25.0;

/// Location the query asked for; compared against each hit's location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLocation {
    /// Requested city.
    pub city: Option<String>,
    /// Requested state.
    pub state: Option<String>,
    /// Requested country.
    pub country: Option<String>,
}

impl From<&ParsedLocation> for QueryLocation {
    fn from(parsed: &ParsedLocation) -> Self {
        Self {
            city: parsed.city.clone(),
            state: parsed.state.clone(),
            country: parsed.country.clone(),
        }
    }
}

/// Terms and cities that push a hit down the ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Cities whose hits are penalised.
    pub cities: Vec<String>,
    /// Terms penalised when found in a hit's headline, title or company.
    pub terms: Vec<String>,
    /// Apply the heavier term penalties.
    pub strict: bool,
}

/// Validated configuration for one scoring call.
///
/// Deserialising goes through the same checks as
/// [`ScoringConfig::from_json`], so a config embedded in a larger document
/// is validated too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawScoringConfig")]
pub struct ScoringConfig {
    /// Weight per score component.
    pub weights: ScoreWeights,
    /// Minimum on-screen separation between placed markers.
    pub threshold_px: f64,
    /// Side of the projected canvas.
    pub world_size: f64,
    /// Maximum number of hits returned.
    pub max_results: usize,
    /// Visible region of the canvas.
    pub viewport: Viewport,
    /// Location the query asked for.
    pub query: Option<QueryLocation>,
    /// Skip the location component even when a query location is present.
    pub skip_location_boost: bool,
    /// Penalised cities and terms.
    pub penalties: PenaltyConfig,
    /// Reference point for the distance component.
    pub origin: Option<GeoPoint>,
    /// E-folding length of the distance component.
    pub distance_decay_km: f64,
    /// Cell size of the stable viewport sample.
    pub sample_cell_px: f64,
    /// Spend unused sample slots on busy cells.
    pub fill_remaining: bool,
    /// Hits already on screen, kept in place when still valid.
    pub locked_ids: Vec<String>,
}

impl ScoringConfig {
    /// Build a configuration from its required fields, with defaults for the
    /// rest.
    #[must_use]
    pub fn new(
        weights: ScoreWeights,
        threshold_px: f64,
        world_size: f64,
        max_results: usize,
        viewport: Viewport,
    ) -> Self {
        Self {
            weights,
            threshold_px,
            world_size,
            max_results,
            viewport,
            query: None,
            skip_location_boost: false,
            penalties: PenaltyConfig::default(),
            origin: None,
            distance_decay_km: DEFAULT_DISTANCE_DECAY_KM,
            sample_cell_px: DEFAULT_CELL_SIZE_PX,
            fill_remaining: false,
            locked_ids: Vec::new(),
        }
    }

    /// Set the query location.
    #[must_use]
    pub fn with_query(mut self, query: QueryLocation) -> Self {
        self.query = Some(query);
        self
    }

    /// Set the penalty lists.
    #[must_use]
    pub fn with_penalties(mut self, penalties: PenaltyConfig) -> Self {
        self.penalties = penalties;
        self
    }

    /// Set the distance origin.
    #[must_use]
    pub fn with_origin(mut self, origin: GeoPoint) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] for malformed JSON, a missing
    /// required field, or a value out of range.
    ///
    /// # Examples
    /// ```
    /// use venuemap_scorer::ScoringConfig;
    ///
    /// let config = ScoringConfig::from_json(r#"{
    ///     "weights": {"text": 1.0},
    ///     "threshold_px": 12,
    ///     "world_size": 1024,
    ///     "max_results": 50,
    ///     "viewport": {"xmin": 0, "ymin": 0, "xmax": 800, "ymax": 600}
    /// }"#).expect("valid configuration");
    /// assert_eq!(config.max_results, 50);
    ///
    /// let err = ScoringConfig::from_json(r#"{"weights": {"text": 1.0}}"#).expect_err("incomplete");
    /// assert!(err.to_string().contains("threshold_px"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let raw: RawScoringConfig = serde_json::from_str(json)
            .map_err(|err| EngineError::invalid_config("config", err.to_string()))?;
        Self::try_from(raw)
    }

    /// Check every field against its constraints.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.weights.validate()?;
        validate_threshold(self.threshold_px)?;
        validate_world_size(self.world_size)?;
        self.viewport.validate()?;
        positive("distance_decay_km", self.distance_decay_km)?;
        positive("sample_cell_px", self.sample_cell_px)?;
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid_config(
            field,
            format!("must be finite and > 0, got {value}"),
        ))
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, EngineError> {
    value.ok_or_else(|| EngineError::invalid_config(field, "missing required field"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawViewport {
    xmin: Option<f64>,
    ymin: Option<f64>,
    xmax: Option<f64>,
    ymax: Option<f64>,
}

impl TryFrom<RawViewport> for Viewport {
    type Error = EngineError;

    fn try_from(raw: RawViewport) -> Result<Self, Self::Error> {
        Ok(Self::new(
            required("viewport.xmin", raw.xmin)?,
            required("viewport.ymin", raw.ymin)?,
            required("viewport.xmax", raw.xmax)?,
            required("viewport.ymax", raw.ymax)?,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawScoringConfig {
    weights: Option<BTreeMap<String, f64>>,
    threshold_px: Option<f64>,
    world_size: Option<f64>,
    max_results: Option<usize>,
    viewport: Option<RawViewport>,
    query: Option<QueryLocation>,
    skip_location_boost: bool,
    penalties: PenaltyConfig,
    origin: Option<GeoPoint>,
    distance_decay_km: Option<f64>,
    sample_cell_px: Option<f64>,
    fill_remaining: bool,
    locked_ids: Vec<String>,
}

impl TryFrom<RawScoringConfig> for ScoringConfig {
    type Error = EngineError;

    fn try_from(raw: RawScoringConfig) -> Result<Self, Self::Error> {
        let weights = ScoreWeights::from_map(&required("weights", raw.weights)?);
        let threshold_px = required("threshold_px", raw.threshold_px)?;
        let world_size = required("world_size", raw.world_size)?;
        let max_results = required("max_results", raw.max_results)?;
        let viewport = Viewport::try_from(required("viewport", raw.viewport)?)?;
        let config = Self {
            weights,
            threshold_px,
            world_size,
            max_results,
            viewport,
            query: raw.query,
            skip_location_boost: raw.skip_location_boost,
            penalties: raw.penalties,
            origin: raw.origin,
            distance_decay_km: raw.distance_decay_km.unwrap_or(DEFAULT_DISTANCE_DECAY_KM),
            sample_cell_px: raw.sample_cell_px.unwrap_or(DEFAULT_CELL_SIZE_PX),
            fill_remaining: raw.fill_remaining,
            locked_ids: raw.locked_ids,
        };
        config.validate()?;
        Ok(config)
    }
}
