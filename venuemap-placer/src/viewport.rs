//! Viewport sampling that stays put while the map pans.
//!
//! Points are binned into a grid anchored at the world origin rather than at
//! the viewport, so a cell's membership never depends on where the viewport
//! sits. A cell is sampled while any part of it overlaps the viewport; panning
//! changes the sample only when a cell crosses the viewport edge.

use std::collections::BTreeMap;

use venuemap_core::{
    EngineError, Viewport, WorldPixel,
    geo_math::{pixels_from_flat, validate_world_size},
};

use crate::grid::CellKey;

/// Default side of a sampling cell in pixels.
pub const DEFAULT_CELL_SIZE_PX: f64 = 32.0;

/// Tuning for [`stable_viewport_sample`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SampleOptions {
    /// Side of a grid cell in pixels.
    pub cell_size_px: f64,
    /// Spend unused slots on cells with more than one member.
    pub fill_remaining: bool,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            cell_size_px: DEFAULT_CELL_SIZE_PX,
            fill_remaining: false,
        }
    }
}

/// One scored point in a cell.
#[derive(Debug, Clone, Copy)]
struct Member {
    index: usize,
    score: f64,
}

fn by_rank(a: &Member, b: &Member) -> std::cmp::Ordering {
    b.score.total_cmp(&a.score).then(a.index.cmp(&b.index))
}

/// Pick a stable, spatially spread subset of the points inside a viewport.
///
/// Points are binned into square cells of `options.cell_size_px`. For each
/// occupied cell that overlaps the viewport the highest-scoring point (ties
/// by lower index) represents the cell; representatives are returned in
/// descending score order, capped at `max_results`. A viewport whose `xmin`
/// exceeds `xmax` covers `[xmin, world_size]` and `[0, xmax]`.
///
/// With `options.fill_remaining`, slots left over after one point per cell
/// are shared among cells in proportion to their extra members, using the
/// largest-remainder rule with ties going to the better-ranked cell. Within
/// a cell, extra points are taken by score.
///
/// # Errors
/// - [`EngineError::InvalidConfig`] for a bad `world_size`, viewport or cell
///   size.
/// - [`EngineError::InvalidInput`] for an odd or non-finite `xy` buffer, a
///   score count that differs from the point count, or a NaN score.
///
/// # Examples
/// ```
/// use venuemap_core::Viewport;
/// use venuemap_placer::{SampleOptions, stable_viewport_sample};
///
/// let xy = [5.0, 5.0, 10.0, 10.0, 100.0, 100.0, 900.0, 900.0];
/// let scores = [0.1, 0.8, 0.5, 1.0];
/// let viewport = Viewport::new(0.0, 0.0, 200.0, 200.0);
/// let picked = stable_viewport_sample(&xy, &scores, &viewport, 1024.0, 10, &SampleOptions::default())
///     .expect("valid input");
/// assert_eq!(picked, vec![1, 2]);
/// ```
pub fn stable_viewport_sample(
    xy: &[f64],
    scores: &[f64],
    viewport: &Viewport,
    world_size: f64,
    max_results: usize,
    options: &SampleOptions,
) -> Result<Vec<usize>, EngineError> {
    validate_world_size(world_size)?;
    viewport.validate()?;
    let cell_size = options.cell_size_px;
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(EngineError::invalid_config(
            "sample_cell_px",
            format!("must be finite and > 0, got {cell_size}"),
        ));
    }
    let pixels = pixels_from_flat(xy)?;
    if scores.len() != pixels.len() {
        return Err(EngineError::invalid_input(format!(
            "{} scores for {} points",
            scores.len(),
            pixels.len()
        )));
    }
    if let Some(index) = scores.iter().position(|s| s.is_nan()) {
        return Err(EngineError::invalid_input(format!("score {index} is NaN")));
    }

    let mut cells: BTreeMap<CellKey, Vec<Member>> = BTreeMap::new();
    for (index, (pixel, score)) in pixels.iter().zip(scores).enumerate() {
        cells
            .entry(CellKey::of(*pixel, cell_size))
            .or_default()
            .push(Member {
                index,
                score: *score,
            });
    }
    let mut visible: Vec<Vec<Member>> = cells
        .into_iter()
        .filter(|(key, _)| overlaps(key.origin(cell_size), cell_size, viewport, world_size))
        .map(|(_, mut members)| {
            members.sort_by(by_rank);
            members
        })
        .collect();
    visible.sort_by(|a, b| match (a.first(), b.first()) {
        (Some(x), Some(y)) => by_rank(x, y),
        _ => b.len().cmp(&a.len()),
    });

    let mut picked: Vec<Member> = visible
        .iter()
        .filter_map(|members| members.first().copied())
        .take(max_results)
        .collect();
    if options.fill_remaining && picked.len() < max_results {
        let spare = max_results.saturating_sub(picked.len());
        picked.extend(fill(&visible, spare));
        picked.sort_by(by_rank);
    }
    log::debug!(
        "sampled {} of {} points from {} visible cells",
        picked.len(),
        pixels.len(),
        visible.len()
    );
    Ok(picked.into_iter().map(|member| member.index).collect())
}

#[expect(
    clippy::float_arithmetic,
    reason = "interval overlap compares cell edges offset by the cell size"
)]
fn overlaps(origin: WorldPixel, cell_size: f64, viewport: &Viewport, world_size: f64) -> bool {
    let spans = |lo: f64, hi: f64, min: f64, max: f64| lo <= max && hi > min;
    let vertical = spans(origin.y, origin.y + cell_size, viewport.ymin, viewport.ymax);
    if !vertical {
        return false;
    }
    if viewport.wraps() {
        spans(origin.x, origin.x + cell_size, viewport.xmin, world_size)
            || spans(origin.x, origin.x + cell_size, 0.0, viewport.xmax)
    } else {
        spans(origin.x, origin.x + cell_size, viewport.xmin, viewport.xmax)
    }
}

/// Share `spare` slots among cells by their extra members.
fn fill(cells: &[Vec<Member>], spare: usize) -> Vec<Member> {
    let extras: Vec<&[Member]> = cells
        .iter()
        .map(|members| members.get(1..).unwrap_or_default())
        .collect();
    let total: usize = extras.iter().map(|extra| extra.len()).sum();
    let slots = spare.min(total);
    if slots == 0 {
        return Vec::new();
    }
    let (mut quotas, remainders): (Vec<usize>, Vec<usize>) = extras
        .iter()
        .map(|extra| share(slots, extra.len(), total))
        .unzip();
    let mut leftover = slots.saturating_sub(quotas.iter().sum());
    let mut by_remainder: Vec<usize> = (0..extras.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = remainders.get(a).copied().unwrap_or_default();
        let rb = remainders.get(b).copied().unwrap_or_default();
        rb.cmp(&ra).then(a.cmp(&b))
    });
    for cell in by_remainder {
        if leftover == 0 {
            break;
        }
        if let Some(quota) = quotas.get_mut(cell) {
            *quota = quota.saturating_add(1);
            leftover = leftover.saturating_sub(1);
        }
    }
    extras
        .iter()
        .zip(quotas)
        .flat_map(|(extra, quota)| extra.iter().take(quota).copied())
        .collect()
}

/// Integer share of `slots` for a cell holding `part` of `total` extras, and
/// the remainder used to break ties.
#[expect(
    clippy::integer_division,
    reason = "largest-remainder apportionment floors each share"
)]
#[expect(
    clippy::integer_division_remainder_used,
    reason = "largest-remainder apportionment ranks cells by remainder"
)]
const fn share(slots: usize, part: usize, total: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    let scaled = slots.saturating_mul(part);
    (scaled / total, scaled % total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use venuemap_core::ErrorKind;

    const WORLD: f64 = 1024.0;

    /// Three clusters: two points in cell (0, 0), three in cell (1, 0), one
    /// in cell (0, 1).
    #[fixture]
    fn clustered() -> (Vec<f64>, Vec<f64>) {
        let xy = vec![
            1.0, 1.0, //
            2.0, 2.0, //
            40.0, 1.0, //
            41.0, 2.0, //
            42.0, 3.0, //
            1.0, 40.0, //
        ];
        let scores = vec![0.2, 0.3, 0.9, 0.1, 0.4, 0.5];
        (xy, scores)
    }

    fn sample(
        xy: &[f64],
        scores: &[f64],
        viewport: Viewport,
        max_results: usize,
        options: SampleOptions,
    ) -> Vec<usize> {
        stable_viewport_sample(xy, scores, &viewport, WORLD, max_results, &options)
            .expect("valid input")
    }

    #[rstest]
    fn one_representative_per_cell(clustered: (Vec<f64>, Vec<f64>)) {
        let (xy, scores) = clustered;
        let viewport = Viewport::new(0.0, 0.0, 100.0, 100.0);
        let picked = sample(&xy, &scores, viewport, 10, SampleOptions::default());
        assert_eq!(picked, vec![2, 5, 1]);
    }

    #[rstest]
    fn results_are_capped(clustered: (Vec<f64>, Vec<f64>)) {
        let (xy, scores) = clustered;
        let viewport = Viewport::new(0.0, 0.0, 100.0, 100.0);
        let picked = sample(&xy, &scores, viewport, 2, SampleOptions::default());
        assert_eq!(picked, vec![2, 5]);
    }

    #[rstest]
    fn partially_visible_cells_count(clustered: (Vec<f64>, Vec<f64>)) {
        let (xy, scores) = clustered;
        // Only the left edge of cell (1, 0) is inside.
        let viewport = Viewport::new(0.0, 0.0, 33.0, 10.0);
        let picked = sample(&xy, &scores, viewport, 10, SampleOptions::default());
        assert_eq!(picked, vec![2, 1]);
    }

    #[rstest]
    fn small_pans_within_cells_do_not_change_the_sample(clustered: (Vec<f64>, Vec<f64>)) {
        let (xy, scores) = clustered;
        let before = sample(&xy, &scores, Viewport::new(5.0, 5.0, 70.0, 70.0), 10, SampleOptions::default());
        let after = sample(&xy, &scores, Viewport::new(9.0, 3.0, 75.0, 68.0), 10, SampleOptions::default());
        assert_eq!(before, after);
    }

    #[rstest]
    fn wrapped_viewport_covers_both_edges() {
        let xy = [1000.0, 10.0, 10.0, 10.0, 500.0, 10.0];
        let scores = [0.5, 0.6, 0.9];
        let viewport = Viewport::new(990.0, 0.0, 20.0, 20.0);
        let picked = sample(&xy, &scores, viewport, 10, SampleOptions::default());
        assert_eq!(picked, vec![1, 0]);
    }

    #[rstest]
    fn remaining_slots_follow_cell_sizes(clustered: (Vec<f64>, Vec<f64>)) {
        let (xy, scores) = clustered;
        let viewport = Viewport::new(0.0, 0.0, 100.0, 100.0);
        let options = SampleOptions {
            fill_remaining: true,
            ..SampleOptions::default()
        };
        // Three representatives and two spare slots over three extras. The
        // busiest cell earns one slot outright; the last goes by remainder.
        let picked = sample(&xy, &scores, viewport, 5, options);
        assert_eq!(picked, vec![2, 5, 4, 1, 0]);
        let smaller = sample(&xy, &scores, viewport, 4, options);
        assert_eq!(smaller, vec![2, 5, 4, 1]);
    }

    #[rstest]
    fn fill_stops_when_cells_are_exhausted(clustered: (Vec<f64>, Vec<f64>)) {
        let (xy, scores) = clustered;
        let viewport = Viewport::new(0.0, 0.0, 100.0, 100.0);
        let options = SampleOptions {
            fill_remaining: true,
            ..SampleOptions::default()
        };
        assert_eq!(sample(&xy, &scores, viewport, 50, options).len(), 6);
    }

    #[rstest]
    #[case(3, 2, 4, (1, 2))]
    #[case(2, 1, 3, (0, 2))]
    #[case(5, 0, 0, (0, 0))]
    fn shares_floor_and_report_remainders(
        #[case] slots: usize,
        #[case] part: usize,
        #[case] total: usize,
        #[case] expected: (usize, usize),
    ) {
        assert_eq!(share(slots, part, total), expected);
    }

    #[rstest]
    #[case(0.0, Viewport::new(0.0, 0.0, 1.0, 1.0), 32.0, ErrorKind::InvalidConfig)]
    #[case(WORLD, Viewport::new(f64::NAN, 0.0, 1.0, 1.0), 32.0, ErrorKind::InvalidConfig)]
    #[case(WORLD, Viewport::new(0.0, 5.0, 1.0, 1.0), 32.0, ErrorKind::InvalidConfig)]
    #[case(WORLD, Viewport::new(0.0, 0.0, 1.0, 1.0), 0.0, ErrorKind::InvalidConfig)]
    fn rejects_bad_configuration(
        #[case] world_size: f64,
        #[case] viewport: Viewport,
        #[case] cell_size_px: f64,
        #[case] kind: ErrorKind,
    ) {
        let options = SampleOptions {
            cell_size_px,
            ..SampleOptions::default()
        };
        let err = stable_viewport_sample(&[0.0, 0.0], &[1.0], &viewport, world_size, 1, &options)
            .expect_err("bad configuration");
        assert_eq!(err.kind(), kind);
    }

    #[rstest]
    fn rejects_mismatched_scores() {
        let viewport = Viewport::new(0.0, 0.0, 1.0, 1.0);
        let err = stable_viewport_sample(&[0.0, 0.0], &[], &viewport, WORLD, 1, &SampleOptions::default())
            .expect_err("score count");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
