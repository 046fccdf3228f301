//! Marker placement in pixel space.
//!
//! Independent selections feed the map:
//!
//! - [`pick_non_overlapping_indices`] greedily keeps the highest-priority
//!   markers so that no two sit closer than a pixel threshold.
//! - [`pick_staged_indices`] fills a marker budget in stages, splitting it
//!   between a locked region and the rest of the map.
//! - [`stable_viewport_sample`] picks one representative per grid cell
//!   overlapping the viewport, so small pans leave the sample unchanged.
//!
//! All take interleaved `[x0, y0, x1, y1, ...]` buffers and return indices
//! into them.

#![forbid(unsafe_code)]

mod grid;
mod non_overlap;
mod staged;
mod viewport;

pub use non_overlap::{PlacementOptions, pick_non_overlapping_indices};
pub use staged::{StagedPlan, pick_staged_indices};
pub use viewport::{DEFAULT_CELL_SIZE_PX, SampleOptions, stable_viewport_sample};
