//! Containment and proximity tests against region boundaries.
//!
//! Rings and segments arrive as flat interleaved buffers: a ring is
//! `[x0, y0, x1, y1, ...]` (implicitly closed) and a segment list is a run of
//! `(ax, ay, bx, by)` quadruples. Boundaries tested many times can carry
//! their bounding boxes alongside (see [`box_segments`]) or be loaded into a
//! [`SegmentIndex`], and unioned regions are exchanged as
//! [`FlatMultiPolygon`] buffers.

mod buffer;
mod segments;
mod union;

pub use buffer::FlatMultiPolygon;
pub use segments::SegmentIndex;
pub use union::{multi_polygon_contains, union_multi_polygons};

use crate::{EngineError, geo_math::distance_point_to_segment_sq, geo_math::pairs};

/// Even-odd containment test of `(px, py)` against a flat ring.
///
/// Points exactly on an edge may fall either side.
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] for an odd-length buffer and
/// [`EngineError::DegenerateGeometry`] for fewer than three points.
///
/// # Examples
/// ```
/// use venuemap_core::boundary::point_in_ring;
///
/// let square = [0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0];
/// assert!(point_in_ring(2.0, 2.0, &square).expect("valid ring"));
/// assert!(!point_in_ring(9.0, 2.0, &square).expect("valid ring"));
/// ```
pub fn point_in_ring(px: f64, py: f64, ring: &[f64]) -> Result<bool, EngineError> {
    let points: Vec<(f64, f64)> = pairs(ring, "ring")?.collect();
    if points.len() < 3 {
        return Err(EngineError::degenerate(format!(
            "ring has {} points, need at least 3",
            points.len()
        )));
    }
    Ok(ray_cast(px, py, &points))
}

#[expect(
    clippy::float_arithmetic,
    reason = "ray casting interpolates edge crossings"
)]
pub(crate) fn ray_cast(px: f64, py: f64, points: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let previous = points.iter().cycle().skip(points.len().saturating_sub(1));
    for (&(xi, yi), &(xj, yj)) in points.iter().zip(previous) {
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
    }
    inside
}

/// Report whether `(x, y)` lies within `threshold_px` of any segment.
///
/// Each segment's bounding box, grown by the threshold, is checked before
/// the exact squared-distance test. The comparison is strict.
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] when `segments` is not a multiple of
/// four values and [`EngineError::InvalidConfig`] for a non-finite or
/// non-positive threshold.
pub fn is_point_near_segments(
    x: f64,
    y: f64,
    segments: &[f64],
    threshold_px: f64,
) -> Result<bool, EngineError> {
    validate_threshold(threshold_px)?;
    let quads = segments.chunks_exact(4);
    if !quads.remainder().is_empty() {
        return Err(EngineError::invalid_input(format!(
            "segment buffer length {} is not a multiple of 4",
            segments.len()
        )));
    }
    Ok(quads.into_iter().any(|quad| match *quad {
        [ax, ay, bx, by] => near_segment(x, y, (ax, ay, bx, by), threshold_px),
        _ => false,
    }))
}

/// Check a proximity threshold in pixels.
///
/// # Errors
/// Returns [`EngineError::InvalidConfig`] unless the threshold is finite and
/// strictly positive.
pub fn validate_threshold(threshold_px: f64) -> Result<(), EngineError> {
    if threshold_px.is_finite() && threshold_px > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid_config(
            "threshold_px",
            format!("must be finite and > 0, got {threshold_px}"),
        ))
    }
}

/// Values per segment in a boxed buffer: `ax, ay, bx, by, min_x, max_x,
/// min_y, max_y`.
pub const BOXED_SEGMENT_STRIDE: usize = 8;

/// Append each segment's bounding box to it, producing the buffer read by
/// [`is_point_near_boxed_segments`].
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] when `segments` is not a multiple of
/// four values.
///
/// # Examples
/// ```
/// use venuemap_core::boundary::box_segments;
///
/// let boxed = box_segments(&[4.0, 1.0, 0.0, 3.0]).expect("valid buffer");
/// assert_eq!(boxed, vec![4.0, 1.0, 0.0, 3.0, 0.0, 4.0, 1.0, 3.0]);
/// ```
pub fn box_segments(segments: &[f64]) -> Result<Vec<f64>, EngineError> {
    let quads = segments.chunks_exact(4);
    if !quads.remainder().is_empty() {
        return Err(EngineError::invalid_input(format!(
            "segment buffer length {} is not a multiple of 4",
            segments.len()
        )));
    }
    Ok(quads
        .flat_map(|quad| match *quad {
            [ax, ay, bx, by] => vec![ax, ay, bx, by, ax.min(bx), ax.max(bx), ay.min(by), ay.max(by)],
            _ => Vec::new(),
        })
        .collect())
}

/// [`is_point_near_segments`] over a buffer from [`box_segments`], skipping
/// the per-segment bounding-box computation.
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] when `boxed` is not a multiple of
/// [`BOXED_SEGMENT_STRIDE`] values and [`EngineError::InvalidConfig`] for a
/// non-finite or non-positive threshold.
pub fn is_point_near_boxed_segments(
    x: f64,
    y: f64,
    boxed: &[f64],
    threshold_px: f64,
) -> Result<bool, EngineError> {
    validate_threshold(threshold_px)?;
    let mut entries = boxed.chunks_exact(BOXED_SEGMENT_STRIDE);
    if !entries.remainder().is_empty() {
        return Err(EngineError::invalid_input(format!(
            "boxed segment buffer length {} is not a multiple of {BOXED_SEGMENT_STRIDE}",
            boxed.len()
        )));
    }
    Ok(entries.any(|entry| match *entry {
        [ax, ay, bx, by, min_x, max_x, min_y, max_y] => near_boxed_segment(
            x,
            y,
            (ax, ay, bx, by),
            (min_x, max_x, min_y, max_y),
            threshold_px,
        ),
        _ => false,
    }))
}

pub(crate) fn near_segment(
    x: f64,
    y: f64,
    (ax, ay, bx, by): (f64, f64, f64, f64),
    threshold_px: f64,
) -> bool {
    let bounds = (ax.min(bx), ax.max(bx), ay.min(by), ay.max(by));
    near_boxed_segment(x, y, (ax, ay, bx, by), bounds, threshold_px)
}

#[expect(
    clippy::float_arithmetic,
    reason = "bounding-box rejection pads by the threshold"
)]
fn near_boxed_segment(
    x: f64,
    y: f64,
    (ax, ay, bx, by): (f64, f64, f64, f64),
    (min_x, max_x, min_y, max_y): (f64, f64, f64, f64),
    threshold_px: f64,
) -> bool {
    if x < min_x - threshold_px
        || x > max_x + threshold_px
        || y < min_y - threshold_px
        || y > max_y + threshold_px
    {
        return false;
    }
    distance_point_to_segment_sq(x, y, ax, ay, bx, by) < threshold_px * threshold_px
}
