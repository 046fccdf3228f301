//! Flat geometry buffers exchanged with hosts.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::EngineError;

/// A multi-polygon packed into three flat arrays.
///
/// `coords` holds interleaved `x, y` values for every ring back to back,
/// without closing coordinates. `ring_lengths` gives each ring's point count
/// and `polygon_ring_counts` says how many consecutive rings (exterior first,
/// then holes) belong to each polygon.
///
/// # Examples
/// ```
/// use venuemap_core::boundary::FlatMultiPolygon;
///
/// let flat = FlatMultiPolygon {
///     coords: vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
///     ring_lengths: vec![3],
///     polygon_ring_counts: vec![1],
/// };
/// let multi = flat.decode().expect("consistent buffer");
/// assert_eq!(multi.0.len(), 1);
/// assert_eq!(FlatMultiPolygon::encode(&multi), flat);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatMultiPolygon {
    /// Interleaved ring coordinates.
    pub coords: Vec<f64>,
    /// Points per ring.
    pub ring_lengths: Vec<usize>,
    /// Rings per polygon.
    pub polygon_ring_counts: Vec<usize>,
}

impl FlatMultiPolygon {
    /// Pack a multi-polygon, dropping each ring's closing coordinate.
    #[must_use]
    pub fn encode(multi: &MultiPolygon<f64>) -> Self {
        let mut flat = Self::default();
        for polygon in multi {
            let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
            let mut count = 0;
            for ring in rings {
                let mut points: Vec<Coord<f64>> = ring.coords().copied().collect();
                if ring.is_closed() && points.len() > 1 {
                    points.pop();
                }
                flat.ring_lengths.push(points.len());
                flat.coords.extend(points.iter().flat_map(|c| [c.x, c.y]));
                count += 1;
            }
            flat.polygon_ring_counts.push(count);
        }
        flat
    }

    /// Unpack into a `geo` multi-polygon after checking the markers agree.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidInput`] when the markers do not account
    /// for every coordinate or ring, and [`EngineError::DegenerateGeometry`]
    /// for a ring of fewer than three points or a polygon with no rings.
    pub fn decode(&self) -> Result<MultiPolygon<f64>, EngineError> {
        let expected_rings = self
            .polygon_ring_counts
            .iter()
            .try_fold(0_usize, |acc, count| acc.checked_add(*count))
            .ok_or_else(|| EngineError::invalid_input("polygon ring counts overflow"))?;
        if expected_rings != self.ring_lengths.len() {
            return Err(EngineError::invalid_input(format!(
                "polygon ring counts sum to {expected_rings} but {} rings are described",
                self.ring_lengths.len()
            )));
        }
        let expected_values = self
            .ring_lengths
            .iter()
            .try_fold(0_usize, |acc, len| acc.checked_add(len.checked_mul(2)?))
            .ok_or_else(|| EngineError::invalid_input("ring lengths overflow"))?;
        if expected_values != self.coords.len() {
            return Err(EngineError::invalid_input(format!(
                "ring lengths describe {expected_values} values but {} were supplied",
                self.coords.len()
            )));
        }
        if let Some(len) = self.ring_lengths.iter().find(|len| **len < 3) {
            return Err(EngineError::degenerate(format!(
                "ring has {len} points, need at least 3"
            )));
        }

        let mut points = self.coords.chunks_exact(2).filter_map(|pair| match *pair {
            [x, y] => Some(Coord { x, y }),
            _ => None,
        });
        let mut lengths = self.ring_lengths.iter();
        let mut polygons = Vec::with_capacity(self.polygon_ring_counts.len());
        for &ring_count in &self.polygon_ring_counts {
            let mut rings = (0..ring_count).map(|_| {
                let len = lengths.next().copied().unwrap_or(0);
                LineString::new(points.by_ref().take(len).collect())
            });
            let exterior = rings
                .next()
                .ok_or_else(|| EngineError::degenerate("polygon has no rings"))?;
            polygons.push(Polygon::new(exterior, rings.collect()));
        }
        Ok(MultiPolygon::new(polygons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use rstest::rstest;

    fn donut() -> FlatMultiPolygon {
        FlatMultiPolygon {
            coords: vec![
                0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, // exterior
                4.0, 4.0, 4.0, 6.0, 6.0, 6.0, 6.0, 4.0, // hole
                20.0, 0.0, 21.0, 0.0, 21.0, 1.0, // second polygon
            ],
            ring_lengths: vec![4, 4, 3],
            polygon_ring_counts: vec![2, 1],
        }
    }

    #[rstest]
    #[case(vec![usize::MAX, 1])]
    #[case(vec![1, usize::MAX])]
    fn overflowing_ring_counts_are_rejected(#[case] polygon_ring_counts: Vec<usize>) {
        let flat = FlatMultiPolygon {
            polygon_ring_counts,
            ..donut()
        };
        let err = flat.decode().expect_err("overflowing counts");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[rstest]
    fn decodes_holes_into_their_polygon() {
        let multi = donut().decode().expect("consistent");
        assert_eq!(multi.0.len(), 2);
        assert_eq!(multi.0.first().map(|p| p.interiors().len()), Some(1));
        assert_eq!(multi.0.get(1).map(|p| p.exterior().0.len()), Some(4));
    }

    #[rstest]
    fn encode_inverts_decode() {
        let flat = donut();
        let multi = flat.decode().expect("consistent");
        assert_eq!(FlatMultiPolygon::encode(&multi), flat);
    }

    #[rstest]
    fn short_coordinate_buffer_is_invalid_input() {
        let mut flat = donut();
        flat.coords.truncate(10);
        let err = flat.decode().expect_err("too few values");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[rstest]
    fn ring_count_mismatch_is_invalid_input() {
        let mut flat = donut();
        flat.polygon_ring_counts = vec![1, 1];
        let err = flat.decode().expect_err("rings unaccounted for");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[rstest]
    fn tiny_ring_is_degenerate() {
        let flat = FlatMultiPolygon {
            coords: vec![0.0, 0.0, 1.0, 1.0],
            ring_lengths: vec![2],
            polygon_ring_counts: vec![1],
        };
        let err = flat.decode().expect_err("two points");
        assert_eq!(err.kind(), ErrorKind::DegenerateGeometry);
    }

    #[rstest]
    fn empty_polygon_is_degenerate() {
        let flat = FlatMultiPolygon {
            coords: vec![],
            ring_lengths: vec![],
            polygon_ring_counts: vec![0],
        };
        let err = flat.decode().expect_err("no rings");
        assert_eq!(err.kind(), ErrorKind::DegenerateGeometry);
    }
}
