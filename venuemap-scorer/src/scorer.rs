//! The score combination function.

use venuemap_core::{geo_math::haversine_between, states::resolve_us_state};
use venuemap_resolver::ResolvedHit;

use crate::{
    config::{QueryLocation, ScoringConfig},
    penalty::Penalties,
    weights::{ScoreComponent, ScoreWeights},
};

const EXACT_MATCH: f64 = 1.0;
const FUZZY_STATE_MATCH: f64 = 0.5;
const MAX_LOCATION_CREDIT: f64 = 3.5;

/// Assign a ranking score to a resolved hit.
///
/// Higher is better. Scores may be negative once penalties apply.
/// Implementations must be thread-safe (`Send` + `Sync`) and must return
/// finite values; use [`HitScorer::sanitise`] to enforce the latter.
///
/// # Examples
///
/// ```
/// use venuemap_resolver::ResolvedHit;
/// use venuemap_scorer::HitScorer;
///
/// struct Relevance;
///
/// impl HitScorer for Relevance {
///     fn score(&self, hit: &ResolvedHit) -> f64 {
///         Self::sanitise(hit.hit.attributes.text_relevance)
///     }
/// }
/// ```
pub trait HitScorer: Send + Sync {
    /// Return a score for `hit`.
    fn score(&self, hit: &ResolvedHit) -> f64;

    /// Replace non-finite scores with zero.
    #[must_use]
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if score.is_finite() { score } else { 0.0 }
    }
}

/// Weighted sum of score components minus penalties.
///
/// The components are:
///
/// - `text`: the hit's text relevance as supplied.
/// - `category`, `freshness`: the matching signals clamped to `[0, 1]`.
/// - `distance`: `exp(-d / decay)` for the distance `d` in kilometres from
///   the configured origin, or zero without one.
/// - `location`: one point each for an exact city, state and country match
///   against the query location and half a point for a state sharing its
///   first two letters, divided by the maximum of 3.5. States are compared
///   by full name, so `TX` matches `Texas`.
#[derive(Debug)]
pub struct WeightedScorer {
    weights: ScoreWeights,
    query: Option<NormalisedQuery>,
    origin: Option<venuemap_core::GeoPoint>,
    distance_decay_km: f64,
    penalties: Penalties,
}

#[derive(Debug)]
struct NormalisedQuery {
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

fn lower_non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(|text| text.trim().to_lowercase())
        .filter(|text| !text.is_empty())
}

impl NormalisedQuery {
    fn new(query: &QueryLocation) -> Self {
        Self {
            city: lower_non_empty(query.city.as_deref()),
            state: lower_non_empty(query.state.as_deref()).map(canonical_state),
            country: lower_non_empty(query.country.as_deref()),
        }
    }
}

/// Full lowercase state name where `state` is a recognised US state.
fn canonical_state(state: String) -> String {
    resolve_us_state(&state).map_or(state, |known| known.name.to_lowercase())
}

fn share_prefix(a: &str, b: &str) -> bool {
    let mut left = a.chars();
    let mut right = b.chars();
    (0..2).all(|_| matches!((left.next(), right.next()), (Some(x), Some(y)) if x == y))
}

impl WeightedScorer {
    /// Prepare a scorer for `config`.
    #[must_use]
    pub fn new(config: &ScoringConfig) -> Self {
        let query = if config.skip_location_boost {
            None
        } else {
            config.query.as_ref().map(NormalisedQuery::new)
        };
        Self {
            weights: config.weights,
            query,
            origin: config.origin,
            distance_decay_km: config.distance_decay_km,
            penalties: Penalties::compile(&config.penalties),
        }
    }

    /// Value of every component for `hit`, in [`ScoreComponent::ALL`] order.
    #[must_use]
    pub fn components(&self, hit: &ResolvedHit) -> [f64; 5] {
        let attributes = &hit.hit.attributes;
        ScoreComponent::ALL.map(|component| match component {
            ScoreComponent::Text => finite_or_zero(attributes.text_relevance),
            ScoreComponent::Category => unit(attributes.category_match),
            ScoreComponent::Freshness => unit(attributes.freshness),
            ScoreComponent::Distance => self.distance(hit),
            ScoreComponent::Location => self.location(hit),
        })
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "exponential decay divides distance by the decay length"
    )]
    fn distance(&self, hit: &ResolvedHit) -> f64 {
        self.origin.map_or(0.0, |origin| {
            (-haversine_between(origin, hit.point) / self.distance_decay_km).exp()
        })
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "location credit sums matches and normalises by the maximum"
    )]
    fn location(&self, hit: &ResolvedHit) -> f64 {
        let Some(query) = &self.query else {
            return 0.0;
        };
        let place = hit.correction.map(|correction| correction.place);
        let attributes = &hit.hit.attributes;
        let city = lower_non_empty(attributes.city.as_deref().or(place.and_then(|p| p.city)));
        let state = lower_non_empty(attributes.state.as_deref().or(place.map(|p| p.state)))
            .map(canonical_state);
        let country = lower_non_empty(attributes.country.as_deref().or(place.map(|p| p.country)));

        let exact = |wanted: &Option<String>, found: &Option<String>| match (wanted, found) {
            (Some(w), Some(f)) if w == f => EXACT_MATCH,
            _ => 0.0,
        };
        let mut credit = exact(&query.city, &city) + exact(&query.country, &country);
        if let (Some(wanted), Some(found)) = (&query.state, &state) {
            if wanted == found {
                credit += EXACT_MATCH;
            }
            if share_prefix(wanted, found) {
                credit += FUZZY_STATE_MATCH;
            }
        }
        credit / MAX_LOCATION_CREDIT
    }
}

impl HitScorer for WeightedScorer {
    #[expect(clippy::float_arithmetic, reason = "penalties subtract from the sum")]
    fn score(&self, hit: &ResolvedHit) -> f64 {
        let combined = self.weights.combine(&self.components(hit));
        let city = hit
            .hit
            .attributes
            .city
            .as_deref()
            .or_else(|| hit.correction.and_then(|correction| correction.place.city));
        Self::sanitise(combined - self.penalties.of(city, &hit.hit.attributes))
    }
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

const fn unit(value: f64) -> f64 {
    finite_or_zero(value).clamp(0.0, 1.0)
}
