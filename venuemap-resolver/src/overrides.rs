//! Correction of known-bad geocodes on individual hits.

use venuemap_core::{
    EngineError, GeoPoint, Hit, HitError, WorldPixel,
    geo_math::{haversine_between, project_point, validate_world_size},
    states::state_synonyms,
};

use crate::{
    matcher::{AliasHit, find_alias, find_alias_in_state},
    places::Place,
};

/// Why a hit's coordinates were replaced.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "reason", rename_all = "snake_case")
)]
pub enum CorrectionReason {
    /// The hit carried no coordinates.
    Missing,
    /// The hit carried the `(0, 0)` placeholder.
    Placeholder,
    /// The coordinates were non-finite or outside the WGS84 range.
    OutOfRange,
    /// The coordinates lay outside the place's tolerance radius.
    BeyondRadius {
        /// Distance from the place's anchor.
        distance_km: f64,
    },
}

/// Record of an override applied to a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Correction {
    /// Alias that matched the hit's location text.
    pub alias: &'static str,
    /// Place whose anchor replaced the coordinates.
    pub place: &'static Place,
    /// Why the original coordinates were rejected.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub reason: CorrectionReason,
}

/// A hit with a trusted position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedHit {
    /// The hit as supplied.
    pub hit: Hit,
    /// Position after any override.
    pub point: GeoPoint,
    /// `point` projected onto the canvas.
    pub pixel: WorldPixel,
    /// Present when the position came from the override table.
    pub correction: Option<Correction>,
}

/// Outcome of resolving a batch of hits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveOutcome {
    /// Hits with trusted positions, in input order.
    pub hits: Vec<ResolvedHit>,
    /// Hits that could not be placed.
    pub errors: Vec<HitError>,
}

enum RawPosition {
    Missing,
    Placeholder,
    OutOfRange(EngineError),
    Valid(GeoPoint),
}

fn classify(hit: &Hit) -> Result<RawPosition, EngineError> {
    match hit.coordinates() {
        Ok(None) => Ok(RawPosition::Missing),
        Ok(Some(point)) if point.is_placeholder() => Ok(RawPosition::Placeholder),
        Ok(Some(point)) => Ok(RawPosition::Valid(point)),
        Err(err @ EngineError::InvalidCoordinate { .. }) => Ok(RawPosition::OutOfRange(err)),
        Err(err) => Err(err),
    }
}

/// Replace bad coordinates with the anchor of the place the hit names.
///
/// A hit's match text is its location key, or its `"city, state"` pair.
/// When the hit states its state, either in its attributes or as the last
/// comma-separated part of its location key, only places in that state are
/// considered. When that text names a known place and the hit's coordinates are
/// missing, the `(0, 0)` placeholder, out of range, or farther than the
/// place's radius from its anchor, the anchor is substituted. Every
/// surviving hit is projected onto a `world_size` canvas.
///
/// Hits without a usable position and without a rescuing alias, and hits
/// with only one coordinate, are reported in [`ResolveOutcome::errors`]; the
/// rest of the batch continues.
///
/// # Errors
/// Returns [`EngineError::InvalidConfig`] when `world_size` is not finite
/// and positive.
///
/// # Examples
/// ```
/// use venuemap_core::Hit;
/// use venuemap_resolver::apply_hardcoded_location_overrides;
///
/// let hits = vec![Hit::new("a", Some(0.0), Some(0.0)).with_location_key("Philly")];
/// let outcome = apply_hardcoded_location_overrides(hits, 256.0).expect("valid world size");
/// let resolved = &outcome.hits[0];
/// assert!(resolved.correction.is_some());
/// assert!((resolved.point.lat() - 39.95).abs() < 0.01);
/// ```
pub fn apply_hardcoded_location_overrides(
    hits: Vec<Hit>,
    world_size: f64,
) -> Result<ResolveOutcome, EngineError> {
    validate_world_size(world_size)?;
    let mut outcome = ResolveOutcome::default();
    for (index, hit) in hits.into_iter().enumerate() {
        match resolve_one(&hit) {
            Ok((point, correction)) => {
                if let Some(fix) = correction {
                    log::debug!(
                        "hit {} moved to {:?} via alias {:?} ({:?})",
                        hit.id,
                        fix.place.anchor,
                        fix.alias,
                        fix.reason
                    );
                }
                outcome.hits.push(ResolvedHit {
                    pixel: project_point(point, world_size),
                    hit,
                    point,
                    correction,
                });
            }
            Err(error) => {
                log::debug!("hit {} rejected: {error}", hit.id);
                outcome.errors.push(HitError::new(index, hit.id, error));
            }
        }
    }
    Ok(outcome)
}

/// Canonical name of the state a hit claims to be in.
fn stated_state(hit: &Hit) -> Option<&'static str> {
    let from_key = || {
        hit.location_key
            .as_deref()
            .and_then(|key| key.rsplit_once(','))
            .map(|(_, tail)| tail)
    };
    hit.attributes
        .state
        .as_deref()
        .or_else(from_key)
        .and_then(|state| state_synonyms(state).first().copied())
}

fn alias_for(hit: &Hit) -> Option<AliasHit> {
    let key = hit.match_key()?;
    match stated_state(hit) {
        Some(state) => find_alias_in_state(&key, state),
        None => find_alias(&key),
    }
}

fn resolve_one(hit: &Hit) -> Result<(GeoPoint, Option<Correction>), EngineError> {
    let raw = classify(hit)?;
    let alias = alias_for(hit);
    let Some(alias) = alias else {
        return match raw {
            RawPosition::Valid(point) => Ok((point, None)),
            RawPosition::Missing => Err(EngineError::invalid_input(
                "hit has no coordinates and no recognised location",
            )),
            RawPosition::Placeholder => Err(EngineError::invalid_coordinate(
                0.0,
                0.0,
                "placeholder coordinate with no recognised location",
            )),
            RawPosition::OutOfRange(err) => Err(err),
        };
    };
    let place = alias.place;
    let reason = match raw {
        RawPosition::Missing => CorrectionReason::Missing,
        RawPosition::Placeholder => CorrectionReason::Placeholder,
        RawPosition::OutOfRange(_) => CorrectionReason::OutOfRange,
        RawPosition::Valid(point) => {
            let distance_km = haversine_between(point, place.anchor);
            if distance_km <= place.radius_km {
                return Ok((point, None));
            }
            CorrectionReason::BeyondRadius { distance_km }
        }
    };
    Ok((
        place.anchor,
        Some(Correction {
            alias: alias.key,
            place,
            reason,
        }),
    ))
}
