//! Builders shared by unit and behaviour tests across the workspace.

use crate::{Hit, MatchAttributes};

/// Build a geocoded hit with the given text relevance.
#[must_use]
pub fn hit_at(id: &str, lat: f64, lng: f64, relevance: f64) -> Hit {
    Hit::new(id, Some(lat), Some(lng)).with_attributes(MatchAttributes {
        text_relevance: relevance,
        ..MatchAttributes::default()
    })
}

/// Build a hit with no coordinates that names its place in free text.
#[must_use]
pub fn hit_named(id: &str, location_key: &str) -> Hit {
    Hit::new(id, None, None).with_location_key(location_key)
}

/// Interleaved pixel positions for a square grid of `side × side` points
/// spaced `spacing` apart.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "grid fixtures multiply spacing by index"
)]
pub fn pixel_grid(side: u32, spacing: f64) -> Vec<f64> {
    (0..side)
        .flat_map(|row| (0..side).map(move |col| (row, col)))
        .flat_map(|(row, col)| [f64::from(col) * spacing, f64::from(row) * spacing])
        .collect()
}
