//! Ranking and placement of venuemap hits.
//!
//! [`ScoringEngine`] is the composition root. For each call it:
//!
//! 1. corrects known-bad geocodes with the override table,
//! 2. scores every hit as a weighted sum of its components minus penalties,
//! 3. ranks hits by descending score (ties by ascending id), and
//! 4. optionally selects a viewport-stable, non-overlapping subset to draw.
//!
//! Before hydration, raw index results can be curated with
//! [`apply_post_training`] and [`filter_by_title_prefixes`].
//!
//! Configuration arrives as [`ScoringConfig`], usually parsed from JSON with
//! [`ScoringConfig::from_json`]. The combination function sits behind the
//! [`HitScorer`] trait so hosts can substitute their own.

#![forbid(unsafe_code)]

mod config;
mod engine;
mod penalty;
mod post_training;
mod scorer;
mod search_match;
mod weights;

pub use config::{DEFAULT_DISTANCE_DECAY_KM, PenaltyConfig, QueryLocation, ScoringConfig};
pub use engine::{ScoreOutcome, ScoredHit, ScoringEngine, place, score_and_place, score_hits};
pub use post_training::{PostTrainingProfile, apply_post_training};
pub use scorer::{HitScorer, WeightedScorer};
pub use search_match::{SearchMatch, filter_by_title_prefixes};
pub use weights::{ScoreComponent, ScoreWeights};
