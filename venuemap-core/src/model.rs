//! Coordinate and pixel-space value types.
//!
//! Geographic positions are validated on construction; pixel-space values
//! are plain data because every producer derives them from a validated
//! [`GeoPoint`] or from caller buffers that are checked at the call site.

use geo::Coord;

use crate::EngineError;

/// Largest accepted absolute latitude in degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Largest accepted absolute longitude in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// A validated WGS84 position in degrees.
///
/// Both components are finite, `|lat| <= 90` and `|lng| <= 180`.
///
/// # Examples
/// ```
/// use venuemap_core::GeoPoint;
///
/// let philly = GeoPoint::new(39.9526, -75.1652).expect("valid coordinate");
/// assert_eq!(philly.lat(), 39.9526);
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawGeoPoint")
)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidCoordinate`] when either component is
    /// not finite or falls outside the WGS84 range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, EngineError> {
        validate_lat_lng(lat, lng)?;
        Ok(Self { lat, lng })
    }

    /// Construct a point from literals already known to be in range.
    ///
    /// Intended for static reference tables; runtime input goes through
    /// [`GeoPoint::new`].
    #[must_use]
    pub const fn from_static(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(self) -> f64 {
        self.lng
    }

    /// Report whether this is the `(0, 0)` "unknown location" placeholder.
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    /// Convert to a `geo` coordinate with `x = longitude` and `y = latitude`.
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

impl TryFrom<Coord<f64>> for GeoPoint {
    type Error = EngineError;

    fn try_from(coord: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(coord.y, coord.x)
    }
}

/// Unvalidated wire form of [`GeoPoint`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = EngineError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

/// Check a latitude/longitude pair without constructing a point.
///
/// # Errors
/// Returns [`EngineError::InvalidCoordinate`] naming the violated constraint.
pub fn validate_lat_lng(lat: f64, lng: f64) -> Result<(), EngineError> {
    if !lat.is_finite() {
        return Err(EngineError::invalid_coordinate(
            lat,
            lng,
            "latitude is not finite",
        ));
    }
    if !lng.is_finite() {
        return Err(EngineError::invalid_coordinate(
            lat,
            lng,
            "longitude is not finite",
        ));
    }
    if lat.abs() > MAX_LATITUDE {
        return Err(EngineError::invalid_coordinate(
            lat,
            lng,
            "latitude outside [-90, 90]",
        ));
    }
    if lng.abs() > MAX_LONGITUDE {
        return Err(EngineError::invalid_coordinate(
            lat,
            lng,
            "longitude outside [-180, 180]",
        ));
    }
    Ok(())
}

/// A position on the square projected canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPixel {
    /// Horizontal offset from the west edge.
    pub x: f64,
    /// Vertical offset from the north edge.
    pub y: f64,
}

impl WorldPixel {
    /// Construct a pixel position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[expect(
        clippy::float_arithmetic,
        reason = "pixel distances are plain Euclidean arithmetic"
    )]
    #[must_use]
    pub fn distance_sq(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// An ordered pair of pixel positions forming a boundary edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// First endpoint.
    pub start: WorldPixel,
    /// Second endpoint.
    pub end: WorldPixel,
}

impl Segment {
    /// Construct a segment between two pixels.
    #[must_use]
    pub const fn new(start: WorldPixel, end: WorldPixel) -> Self {
        Self { start, end }
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
    #[must_use]
    pub const fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }
}

/// A pixel-space bounding box.
///
/// A viewport whose `xmin` exceeds `xmax` wraps across the antimeridian and
/// covers `[xmin, world_size) ∪ [0, xmax]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// West edge.
    pub xmin: f64,
    /// North edge.
    pub ymin: f64,
    /// East edge.
    pub xmax: f64,
    /// South edge.
    pub ymax: f64,
}

impl Viewport {
    /// Construct a viewport from its edges.
    #[must_use]
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Report whether the viewport crosses the antimeridian.
    #[must_use]
    pub const fn wraps(&self) -> bool {
        self.xmin > self.xmax
    }

    /// Check that every edge is finite and `ymin <= ymax`.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] for the first offending edge.
    pub fn validate(&self) -> Result<(), EngineError> {
        let edges = [
            ("viewport.xmin", self.xmin),
            ("viewport.ymin", self.ymin),
            ("viewport.xmax", self.xmax),
            ("viewport.ymax", self.ymax),
        ];
        if let Some((field, _)) = edges.iter().find(|(_, value)| !value.is_finite()) {
            return Err(EngineError::invalid_config(*field, "must be finite"));
        }
        if self.ymin > self.ymax {
            return Err(EngineError::invalid_config(
                "viewport.ymin",
                "must not exceed ymax",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(0.0, 0.0)]
    fn accepts_range_limits(#[case] lat: f64, #[case] lng: f64) {
        assert!(GeoPoint::new(lat, lng).is_ok());
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    #[case(90.5, 0.0)]
    #[case(0.0, -180.5)]
    fn rejects_invalid_coordinates(#[case] lat: f64, #[case] lng: f64) {
        let err = GeoPoint::new(lat, lng).expect_err("coordinate must be rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidCoordinate);
    }

    #[rstest]
    fn placeholder_is_origin_only() {
        assert!(GeoPoint::from_static(0.0, 0.0).is_placeholder());
        assert!(!GeoPoint::from_static(0.0, 1.0).is_placeholder());
    }

    #[rstest]
    fn coord_uses_lng_as_x() {
        let coord = GeoPoint::from_static(10.0, 20.0).to_coord();
        assert_eq!(coord, Coord { x: 20.0, y: 10.0 });
    }

    #[rstest]
    fn segment_bounds_are_ordered() {
        let seg = Segment::new(WorldPixel::new(5.0, 1.0), WorldPixel::new(2.0, 4.0));
        assert_eq!(seg.bounds(), (2.0, 1.0, 5.0, 4.0));
    }

    #[rstest]
    fn viewport_rejects_inverted_y() {
        let err = Viewport::new(0.0, 10.0, 5.0, 2.0)
            .validate()
            .expect_err("inverted viewport");
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[rstest]
    fn viewport_allows_wrapped_x() {
        let viewport = Viewport::new(200.0, 0.0, 20.0, 50.0);
        assert!(viewport.validate().is_ok());
        assert!(viewport.wraps());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialising_validates_range() {
        let ok: Result<GeoPoint, _> = serde_json::from_str(r#"{"lat": 1.0, "lng": 2.0}"#);
        assert!(ok.is_ok());
        let bad: Result<GeoPoint, _> = serde_json::from_str(r#"{"lat": 100.0, "lng": 2.0}"#);
        assert!(bad.is_err());
    }
}
