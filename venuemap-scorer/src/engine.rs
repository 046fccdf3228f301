//! The scoring pipeline: overrides, scoring, ranking and placement.

use serde::Serialize;
use venuemap_core::{EngineError, GeoPoint, Hit, HitError, WorldPixel};
use venuemap_placer::{
    PlacementOptions, SampleOptions, pick_non_overlapping_indices, stable_viewport_sample,
};
use venuemap_resolver::{Correction, ResolveOutcome, apply_hardcoded_location_overrides};

use crate::{
    config::ScoringConfig,
    scorer::{HitScorer, WeightedScorer},
};

/// A hit with its score, rank and trusted position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredHit {
    /// The hit as supplied.
    pub hit: Hit,
    /// Final score; higher is better.
    pub score: f64,
    /// Position in the ranking, starting at 1.
    pub rank: usize,
    /// Position after any override.
    pub point: GeoPoint,
    /// `point` projected onto the canvas.
    pub pixel: WorldPixel,
    /// Present when the position came from the override table.
    pub correction: Option<Correction>,
}

impl ScoredHit {
    /// Whether the position came from the override table.
    #[must_use]
    pub const fn corrected(&self) -> bool {
        self.correction.is_some()
    }
}

/// Ranked hits plus the hits that were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreOutcome {
    /// Ranked hits, best first.
    pub hits: Vec<ScoredHit>,
    /// Hits that could not be scored, in input order.
    pub errors: Vec<HitError>,
}

/// Ranks and places hits for one validated configuration.
///
/// # Examples
/// ```
/// use venuemap_core::{Hit, Viewport};
/// use venuemap_scorer::{ScoreWeights, ScoringConfig, ScoringEngine};
///
/// let config = ScoringConfig::new(
///     ScoreWeights::default(),
///     12.0,
///     1024.0,
///     10,
///     Viewport::new(0.0, 0.0, 1024.0, 1024.0),
/// );
/// let engine = ScoringEngine::new(config).expect("valid configuration");
/// let outcome = engine
///     .score_hits(vec![Hit::new("a", Some(40.7), Some(-74.0))])
///     .expect("scored");
/// assert_eq!(outcome.hits[0].rank, 1);
/// ```
#[derive(Debug)]
pub struct ScoringEngine<S = WeightedScorer> {
    config: ScoringConfig,
    scorer: S,
}

impl ScoringEngine {
    /// Validate `config` and prepare the default scorer.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] when `config` is invalid.
    pub fn new(config: ScoringConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let scorer = WeightedScorer::new(&config);
        Ok(Self { config, scorer })
    }
}

impl<S: HitScorer> ScoringEngine<S> {
    /// Validate `config` and score with `scorer` instead of the default.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] when `config` is invalid.
    pub fn with_scorer(config: ScoringConfig, scorer: S) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config, scorer })
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Apply overrides, score, and rank `hits`.
    ///
    /// The result is sorted by descending score with ties broken by
    /// ascending id, truncated to `max_results`, and ranked from 1. Hits
    /// whose position cannot be trusted are reported in
    /// [`ScoreOutcome::errors`] and do not stop the others.
    ///
    /// # Errors
    /// Only configuration errors fail the call.
    pub fn score_hits(&self, hits: Vec<Hit>) -> Result<ScoreOutcome, EngineError> {
        let ResolveOutcome { hits: resolved, errors } =
            apply_hardcoded_location_overrides(hits, self.config.world_size)?;
        let mut scored: Vec<ScoredHit> = resolved
            .into_iter()
            .map(|resolved| ScoredHit {
                score: self.scorer.score(&resolved),
                rank: 0,
                point: resolved.point,
                pixel: resolved.pixel,
                correction: resolved.correction,
                hit: resolved.hit,
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.hit.id.cmp(&b.hit.id))
        });
        scored.truncate(self.config.max_results);
        for (rank, hit) in (1..).zip(scored.iter_mut()) {
            hit.rank = rank;
        }
        log::debug!(
            "scored {} hits, rejected {}",
            scored.len(),
            errors.len()
        );
        Ok(ScoreOutcome {
            hits: scored,
            errors,
        })
    }

    /// Choose the ranked hits to draw on the current viewport.
    ///
    /// Candidates come from the stable viewport sample and are thinned so
    /// no two lie closer than `threshold_px`. Hits named in `locked_ids` are
    /// placed first when they are candidates. The result keeps rank order.
    ///
    /// # Errors
    /// Propagates placement errors, which only arise from invalid
    /// configuration or non-finite scores.
    pub fn place(&self, scored: &[ScoredHit]) -> Result<Vec<ScoredHit>, EngineError> {
        let xy = interleave(scored.iter());
        let scores: Vec<f64> = scored.iter().map(|hit| hit.score).collect();
        let sample = SampleOptions {
            cell_size_px: self.config.sample_cell_px,
            fill_remaining: self.config.fill_remaining,
        };
        let candidates: Vec<&ScoredHit> = stable_viewport_sample(
            &xy,
            &scores,
            &self.config.viewport,
            self.config.world_size,
            self.config.max_results,
            &sample,
        )?
        .into_iter()
        .filter_map(|index| scored.get(index))
        .collect();

        let candidate_xy = interleave(candidates.iter().copied());
        let priorities: Vec<f64> = candidates.iter().map(|hit| hit.score).collect();
        let locked = self
            .config
            .locked_ids
            .iter()
            .filter_map(|id| candidates.iter().position(|hit| &hit.hit.id == id))
            .collect();
        let options = PlacementOptions {
            max_accepted: Some(self.config.max_results),
            locked,
        };
        let accepted = pick_non_overlapping_indices(
            &candidate_xy,
            &priorities,
            self.config.threshold_px,
            &options,
        )?;

        let mut placed: Vec<ScoredHit> = accepted
            .into_iter()
            .filter_map(|index| candidates.get(index).copied())
            .cloned()
            .collect();
        placed.sort_by_key(|hit| hit.rank);
        log::debug!(
            "placed {} of {} candidates from {} ranked hits",
            placed.len(),
            candidates.len(),
            scored.len()
        );
        Ok(placed)
    }

    /// [`Self::score_hits`] followed by [`Self::place`].
    ///
    /// # Errors
    /// Only configuration errors fail the call.
    pub fn score_and_place(&self, hits: Vec<Hit>) -> Result<ScoreOutcome, EngineError> {
        let ScoreOutcome { hits: ranked, errors } = self.score_hits(hits)?;
        let placed = self.place(&ranked)?;
        Ok(ScoreOutcome {
            hits: placed,
            errors,
        })
    }
}

fn interleave<'a>(hits: impl Iterator<Item = &'a ScoredHit>) -> Vec<f64> {
    hits.flat_map(|hit| [hit.pixel.x, hit.pixel.y]).collect()
}

/// Score and rank `hits` with the default scorer.
///
/// # Errors
/// Returns [`EngineError::InvalidConfig`] when `config` is invalid.
pub fn score_hits(hits: Vec<Hit>, config: &ScoringConfig) -> Result<ScoreOutcome, EngineError> {
    ScoringEngine::new(config.clone())?.score_hits(hits)
}

/// Choose the ranked hits to draw with the default scorer's configuration.
///
/// # Errors
/// Returns [`EngineError::InvalidConfig`] when `config` is invalid.
pub fn place(scored: &[ScoredHit], config: &ScoringConfig) -> Result<Vec<ScoredHit>, EngineError> {
    ScoringEngine::new(config.clone())?.place(scored)
}

/// Score, rank and place `hits` in one call.
///
/// # Errors
/// Returns [`EngineError::InvalidConfig`] when `config` is invalid.
pub fn score_and_place(
    hits: Vec<Hit>,
    config: &ScoringConfig,
) -> Result<ScoreOutcome, EngineError> {
    ScoringEngine::new(config.clone())?.score_and_place(hits)
}
