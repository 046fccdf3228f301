//! R\*-tree over boundary segments for repeated proximity queries.

use rstar::{AABB, RTree, RTreeObject};

use super::{near_segment, validate_threshold};
use crate::{EngineError, Segment, WorldPixel};

#[derive(Debug, Clone, Copy)]
struct IndexedSegment(Segment);

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let (min_x, min_y, max_x, max_y) = self.0.bounds();
        AABB::from_corners([min_x, min_y], [max_x, max_y])
    }
}

/// Bulk-loaded spatial index answering the same question as
/// [`is_point_near_segments`](super::is_point_near_segments) without a
/// linear scan.
///
/// # Examples
/// ```
/// use venuemap_core::boundary::SegmentIndex;
///
/// let index = SegmentIndex::from_flat(&[0.0, 0.0, 10.0, 0.0]).expect("valid buffer");
/// assert!(index.is_near(5.0, 1.0, 2.0).expect("valid threshold"));
/// assert!(!index.is_near(5.0, 9.0, 2.0).expect("valid threshold"));
/// ```
#[derive(Debug, Clone)]
pub struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    /// Bulk-load an index from segments.
    #[must_use]
    pub fn new(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            tree: RTree::bulk_load(segments.into_iter().map(IndexedSegment).collect()),
        }
    }

    /// Bulk-load an index from `(ax, ay, bx, by)` quadruples.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidInput`] when the buffer is not a
    /// multiple of four values or contains non-finite values.
    pub fn from_flat(segments: &[f64]) -> Result<Self, EngineError> {
        let quads = segments.chunks_exact(4);
        if !quads.remainder().is_empty() {
            return Err(EngineError::invalid_input(format!(
                "segment buffer length {} is not a multiple of 4",
                segments.len()
            )));
        }
        if segments.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::invalid_input(
                "segment buffer contains non-finite values",
            ));
        }
        Ok(Self::new(quads.filter_map(|quad| match *quad {
            [ax, ay, bx, by] => Some(Segment::new(
                WorldPixel::new(ax, ay),
                WorldPixel::new(bx, by),
            )),
            _ => None,
        })))
    }

    /// Number of indexed segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Report whether the index holds no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Report whether `(x, y)` lies strictly within `threshold_px` of any
    /// indexed segment.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] for a non-finite or
    /// non-positive threshold.
    #[expect(
        clippy::float_arithmetic,
        reason = "the query envelope pads the point by the threshold"
    )]
    pub fn is_near(&self, x: f64, y: f64, threshold_px: f64) -> Result<bool, EngineError> {
        validate_threshold(threshold_px)?;
        let query = AABB::from_corners(
            [x - threshold_px, y - threshold_px],
            [x + threshold_px, y + threshold_px],
        );
        Ok(self
            .tree
            .locate_in_envelope_intersecting(&query)
            .any(|IndexedSegment(seg)| {
                near_segment(
                    x,
                    y,
                    (seg.start.x, seg.start.y, seg.end.x, seg.end.y),
                    threshold_px,
                )
            }))
    }
}
