//! Fixed-size cell keys and a spatial hash over pixel positions.

use std::collections::HashMap;

use venuemap_core::WorldPixel;

/// Integer coordinates of a grid cell; `(0, 0)` touches the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct CellKey {
    pub(crate) col: i64,
    pub(crate) row: i64,
}

impl CellKey {
    #[expect(
        clippy::float_arithmetic,
        reason = "cell index is the floored quotient of position and cell size"
    )]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "floored quotients saturate at the i64 range for absurd inputs"
    )]
    pub(crate) fn of(pixel: WorldPixel, cell_size: f64) -> Self {
        Self {
            col: (pixel.x / cell_size).floor() as i64,
            row: (pixel.y / cell_size).floor() as i64,
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "cell bounds scale the index by the cell size"
    )]
    #[expect(
        clippy::cast_precision_loss,
        reason = "cell indices of on-canvas points are far below 2^52"
    )]
    pub(crate) fn origin(self, cell_size: f64) -> WorldPixel {
        WorldPixel::new(self.col as f64 * cell_size, self.row as f64 * cell_size)
    }

    fn neighbourhood(self) -> impl Iterator<Item = Self> {
        (-1..=1).flat_map(move |dr: i64| {
            (-1..=1).map(move |dc: i64| Self {
                col: self.col.saturating_add(dc),
                row: self.row.saturating_add(dr),
            })
        })
    }
}

/// Accepted points bucketed by cells as wide as the separation threshold,
/// so a neighbour check only visits the surrounding 3×3 block.
pub(crate) struct SpatialHash {
    cell_size: f64,
    min_separation_sq: f64,
    cells: HashMap<CellKey, Vec<WorldPixel>>,
}

impl SpatialHash {
    #[expect(clippy::float_arithmetic, reason = "squares the threshold")]
    pub(crate) fn new(threshold_px: f64) -> Self {
        Self {
            cell_size: threshold_px,
            min_separation_sq: threshold_px * threshold_px,
            cells: HashMap::new(),
        }
    }

    /// True when `pixel` is at least the threshold away from every stored point.
    pub(crate) fn is_clear(&self, pixel: WorldPixel) -> bool {
        CellKey::of(pixel, self.cell_size)
            .neighbourhood()
            .filter_map(|key| self.cells.get(&key))
            .flatten()
            .all(|other| pixel.distance_sq(*other) >= self.min_separation_sq)
    }

    pub(crate) fn insert(&mut self, pixel: WorldPixel) {
        self.cells
            .entry(CellKey::of(pixel, self.cell_size))
            .or_default()
            .push(pixel);
    }
}
