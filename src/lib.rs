//! Facade crate for the venuemap scoring and map-placement engine.
//!
//! This crate re-exports the public surface of the workspace crates so hosts
//! can depend on a single package:
//!
//! - [`venuemap_core`]: coordinates, hits, errors, distance and projection
//!   maths, region tests and the U.S. state table.
//! - [`venuemap_resolver`]: the location override table and query rewriting.
//! - [`venuemap_placer`]: non-overlap selection and viewport-stable sampling.
//! - The scoring pipeline, re-exported at the root.

#![forbid(unsafe_code)]

pub use venuemap_core;
pub use venuemap_placer;
pub use venuemap_resolver;

pub use venuemap_core::{EngineError, ErrorKind, GeoPoint, Hit, HitError, MatchAttributes, Viewport};
pub use venuemap_scorer::{
    HitScorer, PenaltyConfig, PostTrainingProfile, QueryLocation, ScoreComponent, ScoreOutcome,
    ScoreWeights, ScoredHit, ScoringConfig, ScoringEngine, SearchMatch, WeightedScorer,
    apply_post_training, filter_by_title_prefixes, place, score_and_place, score_hits,
};
