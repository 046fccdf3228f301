//! Distance and projection primitives.
//!
//! Everything here is a pure function over plain `f64` values. Batch variants
//! accept flat interleaved buffers (`[lat0, lng0, lat1, lng1, ...]`) so hosts
//! can hand over typed arrays without per-point allocation.

use std::f64::consts::PI;

use crate::{EngineError, GeoPoint, WorldPixel, model::validate_lat_lng};

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude beyond which Web Mercator is clamped.
pub const MAX_MERCATOR_LAT: f64 = 85.0;

/// Great-circle distance in kilometres between two positions.
///
/// # Errors
/// Returns [`EngineError::InvalidCoordinate`] when any component is not
/// finite.
///
/// # Examples
/// ```
/// use venuemap_core::geo_math::haversine_km;
///
/// let km = haversine_km(40.7128, -74.0060, 34.0522, -118.2437).expect("finite input");
/// assert!((km - 3936.0).abs() < 40.0);
/// ```
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, EngineError> {
    ensure_finite(lat1, lng1)?;
    ensure_finite(lat2, lng2)?;
    Ok(haversine_unchecked(lat1, lng1, lat2, lng2))
}

/// Great-circle distance between two validated points.
#[must_use]
pub fn haversine_between(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_unchecked(a.lat(), a.lng(), b.lat(), b.lng())
}

#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is trigonometric arithmetic"
)]
fn haversine_unchecked(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lng = (d_lng / 2.0).sin();
    let h = sin_d_lat * sin_d_lat
        + lat1.to_radians().cos() * lat2.to_radians().cos() * sin_d_lng * sin_d_lng;
    // Rounding can push h marginally above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Distances from `(origin_lat, origin_lng)` to every interleaved target pair.
///
/// Output order matches input order.
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] when `targets` has odd length and
/// [`EngineError::InvalidCoordinate`] for the first non-finite value.
pub fn batch_haversine_km(
    origin_lat: f64,
    origin_lng: f64,
    targets: &[f64],
) -> Result<Vec<f64>, EngineError> {
    ensure_finite(origin_lat, origin_lng)?;
    pairs(targets, "haversine targets")?
        .map(|(lat, lng)| haversine_km(origin_lat, origin_lng, lat, lng))
        .collect()
}

/// Check that a projection canvas size is usable.
///
/// # Errors
/// Returns [`EngineError::InvalidConfig`] unless `world_size` is finite and
/// strictly positive.
pub fn validate_world_size(world_size: f64) -> Result<(), EngineError> {
    if world_size.is_finite() && world_size > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid_config(
            "world_size",
            format!("must be finite and > 0, got {world_size}"),
        ))
    }
}

/// Project a position onto a square Web Mercator canvas.
///
/// Latitude is clamped to ±85°. `x` grows linearly with longitude and wraps
/// into `[0, world_size)`, so longitude 180 lands on `x = 0`.
///
/// # Errors
/// Returns [`EngineError::InvalidConfig`] for an unusable `world_size` and
/// [`EngineError::InvalidCoordinate`] for an invalid position.
///
/// # Examples
/// ```
/// use venuemap_core::geo_math::lat_lng_to_world_pixel;
///
/// let centre = lat_lng_to_world_pixel(0.0, 0.0, 256.0).expect("valid input");
/// assert_eq!((centre.x, centre.y), (128.0, 128.0));
/// ```
pub fn lat_lng_to_world_pixel(
    lat: f64,
    lng: f64,
    world_size: f64,
) -> Result<WorldPixel, EngineError> {
    validate_world_size(world_size)?;
    validate_lat_lng(lat, lng)?;
    Ok(project_unchecked(lat, lng, world_size))
}

/// Project a validated point; `world_size` must already be validated.
#[must_use]
pub fn project_point(point: GeoPoint, world_size: f64) -> WorldPixel {
    project_unchecked(point.lat(), point.lng(), world_size)
}

#[expect(
    clippy::float_arithmetic,
    reason = "Mercator projection is floating-point arithmetic"
)]
fn project_unchecked(lat: f64, lng: f64, world_size: f64) -> WorldPixel {
    let siny = lat
        .clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT)
        .to_radians()
        .sin();
    let x = ((lng + 180.0) / 360.0 * world_size).rem_euclid(world_size);
    let y = (0.5 - ((1.0 + siny) / (1.0 - siny)).ln() / (4.0 * PI)) * world_size;
    WorldPixel::new(x, y)
}

/// Project every interleaved `(lat, lng)` pair, returning interleaved `(x, y)`.
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] for odd-length input, plus the
/// errors of [`lat_lng_to_world_pixel`] for the first offending pair.
pub fn batch_lat_lng_to_world_pixel(
    coords: &[f64],
    world_size: f64,
) -> Result<Vec<f64>, EngineError> {
    validate_world_size(world_size)?;
    let mut out = Vec::with_capacity(coords.len());
    for (lat, lng) in pairs(coords, "coordinates")? {
        let pixel = lat_lng_to_world_pixel(lat, lng, world_size)?;
        out.push(pixel.x);
        out.push(pixel.y);
    }
    Ok(out)
}

/// Invert [`lat_lng_to_world_pixel`].
///
/// Pixels beyond the canvas are wrapped horizontally and clamped to the
/// Mercator latitude limit vertically.
///
/// # Errors
/// Returns [`EngineError::InvalidConfig`] for an unusable `world_size` and
/// [`EngineError::InvalidInput`] for non-finite pixels.
#[expect(
    clippy::float_arithmetic,
    reason = "inverse Mercator projection is floating-point arithmetic"
)]
pub fn world_pixel_to_lat_lng(pixel: WorldPixel, world_size: f64) -> Result<GeoPoint, EngineError> {
    validate_world_size(world_size)?;
    if !(pixel.x.is_finite() && pixel.y.is_finite()) {
        return Err(EngineError::invalid_input(format!(
            "pixel ({}, {}) is not finite",
            pixel.x, pixel.y
        )));
    }
    let lng = pixel.x.rem_euclid(world_size) / world_size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * pixel.y / world_size;
    let lat = n
        .sinh()
        .atan()
        .to_degrees()
        .clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    GeoPoint::new(lat, lng)
}

/// Squared distance from `p` to the segment `a`–`b`.
///
/// The projection parameter is clamped to `[0, 1]` and a zero-length segment
/// degrades to point distance.
#[expect(
    clippy::float_arithmetic,
    reason = "segment projection is vector arithmetic"
)]
#[must_use]
pub fn distance_point_to_segment_sq(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let abx = bx - ax;
    let aby = by - ay;
    let apx = px - ax;
    let apy = py - ay;
    let denom = abx * abx + aby * aby;
    if denom <= 0.0 {
        return apx * apx + apy * apy;
    }
    let t = ((apx * abx + apy * aby) / denom).clamp(0.0, 1.0);
    let dx = px - (ax + t * abx);
    let dy = py - (ay + t * aby);
    dx * dx + dy * dy
}

fn ensure_finite(lat: f64, lng: f64) -> Result<(), EngineError> {
    if lat.is_finite() && lng.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid_coordinate(
            lat,
            lng,
            "coordinate is not finite",
        ))
    }
}

/// Read an interleaved `(x, y)` buffer into pixel positions.
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] when the buffer length is odd or a
/// coordinate is not finite.
pub fn pixels_from_flat(xy: &[f64]) -> Result<Vec<WorldPixel>, EngineError> {
    pairs(xy, "pixel buffer")?
        .enumerate()
        .map(|(index, (x, y))| {
            if x.is_finite() && y.is_finite() {
                Ok(WorldPixel::new(x, y))
            } else {
                Err(EngineError::invalid_input(format!(
                    "pixel {index} is not finite: ({x}, {y})"
                )))
            }
        })
        .collect()
}

/// Split an interleaved buffer into `(a, b)` pairs.
pub(crate) fn pairs<'a>(
    buffer: &'a [f64],
    what: &str,
) -> Result<impl Iterator<Item = (f64, f64)> + use<'a>, EngineError> {
    let chunks = buffer.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        return Err(EngineError::invalid_input(format!(
            "{what} length {} is not a multiple of 2",
            buffer.len()
        )));
    }
    Ok(chunks.filter_map(|pair| match pair {
        [a, b] => Some((*a, *b)),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use rstest::rstest;

    const NYC: (f64, f64) = (40.7128, -74.0060);
    const LA: (f64, f64) = (34.0522, -118.2437);

    #[rstest]
    fn haversine_of_identical_points_is_zero() {
        let km = haversine_km(NYC.0, NYC.1, NYC.0, NYC.1).expect("finite");
        assert_eq!(km, 0.0);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tolerance check")]
    fn nyc_to_la_is_about_3936_km() {
        let km = haversine_km(NYC.0, NYC.1, LA.0, LA.1).expect("finite");
        assert!((km - 3936.0).abs() < 39.36, "got {km}");
    }

    #[rstest]
    fn haversine_is_symmetric() {
        let there = haversine_km(NYC.0, NYC.1, LA.0, LA.1).expect("finite");
        let back = haversine_km(LA.0, LA.1, NYC.0, NYC.1).expect("finite");
        assert_eq!(there, back);
    }

    #[rstest]
    fn haversine_rejects_nan() {
        let err = haversine_km(f64::NAN, 0.0, 0.0, 0.0).expect_err("nan");
        assert_eq!(err.kind(), ErrorKind::InvalidCoordinate);
    }

    #[rstest]
    fn batch_haversine_preserves_order() {
        let out = batch_haversine_km(NYC.0, NYC.1, &[NYC.0, NYC.1, LA.0, LA.1]).expect("valid");
        assert_eq!(out.len(), 2);
        assert_eq!(out.first().copied(), Some(0.0));
        assert!(out.get(1).is_some_and(|km| *km > 3800.0));
    }

    #[rstest]
    fn batch_haversine_rejects_odd_buffers() {
        let err = batch_haversine_km(0.0, 0.0, &[1.0, 2.0, 3.0]).expect_err("odd");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn projection_rejects_bad_world_size(#[case] world_size: f64) {
        let err = lat_lng_to_world_pixel(0.0, 0.0, world_size).expect_err("bad size");
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[rstest]
    fn antimeridian_wraps_to_zero() {
        let east = lat_lng_to_world_pixel(0.0, 180.0, 512.0).expect("valid");
        let west = lat_lng_to_world_pixel(0.0, -180.0, 512.0).expect("valid");
        assert_eq!(east.x, 0.0);
        assert_eq!(west.x, 0.0);
    }

    #[rstest]
    fn poles_are_clamped_to_canvas() {
        let north = lat_lng_to_world_pixel(90.0, 0.0, 256.0).expect("valid");
        let limit = lat_lng_to_world_pixel(MAX_MERCATOR_LAT, 0.0, 256.0).expect("valid");
        assert_eq!(north, limit);
        assert!(north.y > 0.0);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tolerance check")]
    fn inverse_projection_round_trips() {
        let pixel = lat_lng_to_world_pixel(NYC.0, NYC.1, 4096.0).expect("valid");
        let back = world_pixel_to_lat_lng(pixel, 4096.0).expect("valid");
        assert!((back.lat() - NYC.0).abs() < 1e-9);
        assert!((back.lng() - NYC.1).abs() < 1e-9);
    }

    #[rstest]
    fn batch_projection_is_interleaved() {
        let out = batch_lat_lng_to_world_pixel(&[0.0, 0.0, 0.0, 90.0], 360.0).expect("valid");
        assert_eq!(out.len(), 4);
        assert_eq!(out.first().copied(), Some(180.0));
        assert_eq!(out.get(2).copied(), Some(270.0));
    }

    #[rstest]
    #[case((0.0, 5.0), 25.0)]
    #[case((-3.0, 4.0), 25.0)]
    #[case((13.0, 0.0), 9.0)]
    #[case((5.0, 0.0), 0.0)]
    fn segment_distance_clamps_projection(#[case] p: (f64, f64), #[case] expected: f64) {
        let d = distance_point_to_segment_sq(p.0, p.1, 0.0, 0.0, 10.0, 0.0);
        assert_eq!(d, expected);
    }

    #[rstest]
    fn degenerate_segment_uses_point_distance() {
        assert_eq!(distance_point_to_segment_sq(3.0, 4.0, 0.0, 0.0, 0.0, 0.0), 25.0);
    }

    #[rstest]
    fn flat_pixels_are_paired() {
        let pixels = pixels_from_flat(&[1.0, 2.0, 3.0, 4.0]).expect("even buffer");
        assert_eq!(pixels, vec![WorldPixel::new(1.0, 2.0), WorldPixel::new(3.0, 4.0)]);
    }

    #[rstest]
    #[case(&[1.0, 2.0, 3.0])]
    #[case(&[1.0, f64::NAN])]
    fn flat_pixels_reject_bad_buffers(#[case] xy: &[f64]) {
        let err = pixels_from_flat(xy).expect_err("bad buffer");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
