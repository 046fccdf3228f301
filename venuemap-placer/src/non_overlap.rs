//! Greedy selection of markers that do not overlap on screen.

use venuemap_core::{EngineError, boundary::validate_threshold, geo_math::pixels_from_flat};

use crate::grid::SpatialHash;

/// Tuning for [`pick_non_overlapping_indices`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PlacementOptions {
    /// Stop after this many markers have been accepted.
    pub max_accepted: Option<usize>,
    /// Indices considered before any other, in the given order. Typically the
    /// markers already on screen, so they do not flicker when new data
    /// arrives. Locked markers still obey the separation rule.
    pub locked: Vec<usize>,
}

/// Select markers so that no two accepted markers are closer than
/// `threshold_px`.
///
/// `xy` holds interleaved pixel positions and `priorities` one value per
/// position. Candidates are visited locked indices first, then by descending
/// priority with ties broken by ascending index; each is accepted when it is
/// at least `threshold_px` from every marker accepted so far. The result
/// lists accepted indices in acceptance order.
///
/// # Errors
/// - [`EngineError::InvalidConfig`] when `threshold_px` is not finite and
///   positive.
/// - [`EngineError::InvalidInput`] for an odd or non-finite `xy` buffer, a
///   priority count that differs from the point count, a NaN priority, or a
///   locked index out of range.
///
/// # Examples
/// ```
/// use venuemap_placer::{PlacementOptions, pick_non_overlapping_indices};
///
/// let xy = [0.0, 0.0, 3.0, 0.0, 50.0, 50.0];
/// let priorities = [0.2, 0.9, 0.5];
/// let picked = pick_non_overlapping_indices(&xy, &priorities, 10.0, &PlacementOptions::default())
///     .expect("valid input");
/// assert_eq!(picked, vec![1, 2]);
/// ```
pub fn pick_non_overlapping_indices(
    xy: &[f64],
    priorities: &[f64],
    threshold_px: f64,
    options: &PlacementOptions,
) -> Result<Vec<usize>, EngineError> {
    validate_threshold(threshold_px)?;
    let pixels = pixels_from_flat(xy)?;
    if priorities.len() != pixels.len() {
        return Err(EngineError::invalid_input(format!(
            "{} priorities for {} points",
            priorities.len(),
            pixels.len()
        )));
    }
    if let Some(index) = priorities.iter().position(|p| p.is_nan()) {
        return Err(EngineError::invalid_input(format!(
            "priority {index} is NaN"
        )));
    }
    if let Some(index) = options.locked.iter().find(|&&index| index >= pixels.len()) {
        return Err(EngineError::invalid_input(format!(
            "locked index {index} is out of range for {} points",
            pixels.len()
        )));
    }

    let limit = options.max_accepted.unwrap_or(pixels.len());
    let mut visited = vec![false; pixels.len()];
    let mut hash = SpatialHash::new(threshold_px);
    let mut accepted = Vec::new();
    for index in options.locked.iter().copied().chain(priority_order(priorities)) {
        if accepted.len() >= limit {
            break;
        }
        let (Some(seen), Some(pixel)) = (visited.get_mut(index), pixels.get(index)) else {
            continue;
        };
        if *seen {
            continue;
        }
        *seen = true;
        if hash.is_clear(*pixel) {
            hash.insert(*pixel);
            accepted.push(index);
        }
    }
    log::debug!(
        "accepted {} of {} markers at {threshold_px}px separation",
        accepted.len(),
        pixels.len()
    );
    Ok(accepted)
}

fn priority_order(priorities: &[f64]) -> impl Iterator<Item = usize> + use<> {
    let mut order: Vec<(usize, f64)> = priorities.iter().copied().enumerate().collect();
    order.sort_by(|(ia, pa), (ib, pb)| pb.total_cmp(pa).then(ia.cmp(ib)));
    order.into_iter().map(|(index, _)| index)
}
