//! Budgeted marker selection in stages.
//!
//! A map with a locked region (the state a search was pinned to) fills its
//! marker budget in order: markers that must stay put, then candidates inside
//! the region, then candidates outside it. Every stage shares one separation
//! grid, so later stages only fill gaps left by earlier ones.

use venuemap_core::{
    EngineError, WorldPixel, boundary::validate_threshold, geo_math::pixels_from_flat,
};

use crate::grid::SpatialHash;

/// Candidate orders and budgets for [`pick_staged_indices`].
///
/// The three orders are visited as given; callers sort them beforehand.
/// A zero `max_primary_dots` selects nothing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StagedPlan {
    /// Markers kept before any budget split, such as those already visible.
    pub priority_order: Vec<usize>,
    /// Candidates inside the locked region.
    pub in_locked_order: Vec<usize>,
    /// Candidates outside the locked region. Only visited when
    /// `in_locked_share` is set.
    pub out_locked_order: Vec<usize>,
    /// Per-point flag marking points inside the locked region. May be empty.
    pub in_locked_mask: Vec<bool>,
    /// Total number of markers to select.
    pub max_primary_dots: usize,
    /// Fraction of the budget left after the priority stage that goes to
    /// `in_locked_order`. `None` means no region is locked and the whole
    /// remainder goes to `in_locked_order`.
    pub in_locked_share: Option<f64>,
    /// Never select more markers outside the locked region than were
    /// selected inside it.
    pub hard_cap_outside_by_in_locked: bool,
}

/// Fill a marker budget from a [`StagedPlan`] so that no two selected
/// markers are closer than `threshold_px`.
///
/// The priority stage runs first with the whole budget. With a locked
/// region, the remainder is split by rounding `remainder * share` for the
/// inside stage and giving the rest to the outside stage, which the hard cap
/// may shrink to the count of selected in-region markers (priority picks
/// included). Each index is considered at most once across stages.
///
/// # Errors
/// - [`EngineError::InvalidConfig`] when `threshold_px` is not finite and
///   positive or `in_locked_share` lies outside `[0, 1]`.
/// - [`EngineError::InvalidInput`] for an odd or non-finite `xy` buffer, an
///   index out of range, or a non-empty mask whose length differs from the
///   point count.
///
/// # Examples
/// ```
/// use venuemap_placer::{StagedPlan, pick_staged_indices};
///
/// let xy = [0.0, 0.0, 50.0, 0.0, 100.0, 0.0, 150.0, 0.0];
/// let plan = StagedPlan {
///     in_locked_order: vec![0, 1],
///     out_locked_order: vec![2, 3],
///     in_locked_mask: vec![true, true, false, false],
///     max_primary_dots: 2,
///     in_locked_share: Some(0.5),
///     ..StagedPlan::default()
/// };
/// let picked = pick_staged_indices(&xy, &plan, 10.0).expect("valid plan");
/// assert_eq!(picked, vec![0, 2]);
/// ```
pub fn pick_staged_indices(
    xy: &[f64],
    plan: &StagedPlan,
    threshold_px: f64,
) -> Result<Vec<usize>, EngineError> {
    validate_threshold(threshold_px)?;
    let pixels = pixels_from_flat(xy)?;
    validate_plan(plan, pixels.len())?;

    let mut stages = Stages {
        pixels: &pixels,
        mask: &plan.in_locked_mask,
        cap: plan.max_primary_dots,
        hash: SpatialHash::new(threshold_px),
        visited: vec![false; pixels.len()],
        picked: Vec::new(),
        in_locked_picked: 0,
    };
    stages.pick_from(&plan.priority_order, plan.max_primary_dots);

    let remaining = plan.max_primary_dots.saturating_sub(stages.picked.len());
    if let Some(share) = plan.in_locked_share {
        let in_budget = share_of(remaining, share);
        let mut out_budget = remaining.saturating_sub(in_budget);
        stages.pick_from(&plan.in_locked_order, in_budget);
        if plan.hard_cap_outside_by_in_locked {
            out_budget = out_budget.min(stages.in_locked_picked);
        }
        stages.pick_from(&plan.out_locked_order, out_budget);
    } else {
        stages.pick_from(&plan.in_locked_order, remaining);
    }

    log::debug!(
        "staged selection kept {} of {} markers ({} in the locked region)",
        stages.picked.len(),
        pixels.len(),
        stages.in_locked_picked
    );
    Ok(stages.picked)
}

struct Stages<'a> {
    pixels: &'a [WorldPixel],
    mask: &'a [bool],
    cap: usize,
    hash: SpatialHash,
    visited: Vec<bool>,
    picked: Vec<usize>,
    in_locked_picked: usize,
}

impl Stages<'_> {
    fn pick_from(&mut self, order: &[usize], budget: usize) {
        let mut left = budget;
        for &index in order {
            if left == 0 || self.picked.len() >= self.cap {
                break;
            }
            let (Some(seen), Some(pixel)) = (self.visited.get_mut(index), self.pixels.get(index))
            else {
                continue;
            };
            if *seen {
                continue;
            }
            *seen = true;
            if !self.hash.is_clear(*pixel) {
                continue;
            }
            self.hash.insert(*pixel);
            self.picked.push(index);
            if self.mask.get(index).copied().unwrap_or(false) {
                self.in_locked_picked += 1;
            }
            left -= 1;
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "budgets are small counts and the share is validated to [0, 1]"
)]
fn share_of(remaining: usize, share: f64) -> usize {
    ((remaining as f64 * share).round() as usize).min(remaining)
}

fn validate_plan(plan: &StagedPlan, len: usize) -> Result<(), EngineError> {
    if let Some(share) = plan.in_locked_share
        && !(0.0..=1.0).contains(&share)
    {
        return Err(EngineError::invalid_config(
            "in_locked_share",
            format!("{share} is outside [0, 1]"),
        ));
    }
    if !plan.in_locked_mask.is_empty() && plan.in_locked_mask.len() != len {
        return Err(EngineError::invalid_input(format!(
            "in-locked mask has {} entries for {len} points",
            plan.in_locked_mask.len()
        )));
    }
    let orders = [
        ("priority", &plan.priority_order),
        ("in-locked", &plan.in_locked_order),
        ("out-locked", &plan.out_locked_order),
    ];
    for (name, order) in orders {
        if let Some(index) = order.iter().find(|&&index| index >= len) {
            return Err(EngineError::invalid_input(format!(
                "{name} index {index} is out of range for {len} points"
            )));
        }
    }
    Ok(())
}
