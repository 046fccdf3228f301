//! Region union with a canonical output form.
//!
//! Inputs are snapped to a 1e-9 grid and the boolean overlay itself is
//! delegated to `geo`. Polygons whose interiors are already disjoint and
//! that share no edge skip the overlay, so a union's own output is only
//! re-canonicalised. The result is canonicalised so that repeated unions,
//! or unions of the same rings in a different order, compare equal:
//!
//! - coordinates are snapped to a 1e-9 grid, with `-0.0` written as `0.0`;
//! - repeated and collinear vertices are dropped;
//! - exteriors wind counter-clockwise and holes clockwise;
//! - every ring starts at its lexicographically smallest vertex;
//! - holes and polygons are sorted by their first vertex.

use std::cmp::Ordering;

use geo::{BooleanOps, BoundingRect, Coord, Intersects, LineString, MapCoords, MultiPolygon, Polygon, Relate};

use super::ray_cast;
use crate::EngineError;

const SNAP: f64 = 1e9;
const COLLINEAR_EPSILON: f64 = 1e-12;

/// Merge every polygon of every input into a minimal, canonical set.
///
/// Overlapping and edge-adjacent polygons fuse; holes survive unless another
/// input covers them.
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] for non-finite coordinates and
/// [`EngineError::DegenerateGeometry`] for a ring with fewer than three
/// distinct points or zero area.
///
/// # Examples
/// ```
/// use geo::{MultiPolygon, polygon};
/// use venuemap_core::boundary::union_multi_polygons;
///
/// let a = MultiPolygon::new(vec![polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)]]);
/// let b = MultiPolygon::new(vec![polygon![(x: 1.0, y: 0.0), (x: 3.0, y: 0.0), (x: 3.0, y: 2.0), (x: 1.0, y: 2.0)]]);
/// let merged = union_multi_polygons(&[a, b]).expect("valid rings");
/// assert_eq!(merged.0.len(), 1);
/// ```
pub fn union_multi_polygons(polygons: &[MultiPolygon<f64>]) -> Result<MultiPolygon<f64>, EngineError> {
    for (index, multi) in polygons.iter().enumerate() {
        for polygon in multi {
            validate_ring(index, polygon.exterior())?;
            for hole in polygon.interiors() {
                validate_ring(index, hole)?;
            }
        }
    }
    let snapped: Vec<Polygon<f64>> = polygons
        .iter()
        .flatten()
        .map(|polygon| polygon.map_coords(snap))
        .collect();
    let merged = if interiors_disjoint(&snapped) {
        MultiPolygon::new(snapped)
    } else {
        snapped.into_iter().fold(MultiPolygon::new(Vec::new()), |acc, polygon| {
            acc.union(&MultiPolygon::new(vec![polygon]))
        })
    };
    let canonical = canonicalise(&merged);
    log::debug!(
        "unioned {} inputs into {} polygons",
        polygons.len(),
        canonical.0.len()
    );
    Ok(canonical)
}

/// Report whether `(x, y)` lies inside some exterior ring and outside that
/// polygon's holes.
#[must_use]
pub fn multi_polygon_contains(multi: &MultiPolygon<f64>, x: f64, y: f64) -> bool {
    multi.iter().any(|polygon| {
        ring_contains(polygon.exterior(), x, y)
            && !polygon
                .interiors()
                .iter()
                .any(|hole| ring_contains(hole, x, y))
    })
}

/// True when no two polygons overlap in area or share an edge, so the
/// overlay would return them unchanged.
fn interiors_disjoint(polygons: &[Polygon<f64>]) -> bool {
    let boxes: Vec<_> = polygons.iter().map(BoundingRect::bounding_rect).collect();
    polygons.iter().zip(&boxes).enumerate().all(|(i, (a, box_a))| {
        polygons
            .iter()
            .zip(&boxes)
            .skip(i + 1)
            .all(|(b, box_b)| match (box_a, box_b) {
                (Some(p), Some(q)) if p.intersects(q) => meet_at_points_only(a, b),
                _ => true,
            })
    })
}

fn meet_at_points_only(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    let matrix = a.relate(b);
    // Interiors disjoint; boundaries apart or touching at isolated points.
    ["F***F****", "F***0****"]
        .into_iter()
        .any(|spec| matches!(matrix.matches(spec), Ok(true)))
}

fn ring_contains(ring: &LineString<f64>, x: f64, y: f64) -> bool {
    let points: Vec<(f64, f64)> = ring.coords().map(|c| (c.x, c.y)).collect();
    points.len() >= 3 && ray_cast(x, y, &points)
}

fn validate_ring(index: usize, ring: &LineString<f64>) -> Result<(), EngineError> {
    if ring.coords().any(|c| !(c.x.is_finite() && c.y.is_finite())) {
        return Err(EngineError::invalid_input(format!(
            "input {index} contains non-finite coordinates"
        )));
    }
    let open = open_ring(ring.coords().copied());
    let mut distinct = open.clone();
    distinct.sort_by(cmp_coord);
    distinct.dedup();
    if distinct.len() < 3 {
        return Err(EngineError::degenerate(format!(
            "input {index} has a ring with {} distinct points",
            distinct.len()
        )));
    }
    if signed_area(&open) == 0.0 {
        return Err(EngineError::degenerate(format!(
            "input {index} has a ring with zero area"
        )));
    }
    Ok(())
}

fn canonicalise(multi: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    let mut polygons: Vec<Polygon<f64>> = multi
        .iter()
        .filter_map(|polygon| {
            let exterior = canonical_ring(polygon.exterior(), Winding::CounterClockwise)?;
            let mut holes: Vec<Vec<Coord<f64>>> = polygon
                .interiors()
                .iter()
                .filter_map(|hole| canonical_ring(hole, Winding::Clockwise))
                .collect();
            holes.sort_by(|a, b| cmp_ring(a, b));
            Some(Polygon::new(
                LineString::from(exterior),
                holes.into_iter().map(LineString::from).collect(),
            ))
        })
        .collect();
    polygons.sort_by(|a, b| cmp_ring(&a.exterior().0, &b.exterior().0));
    MultiPolygon::new(polygons)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Winding {
    CounterClockwise,
    Clockwise,
}

/// Return the ring in canonical open form, or `None` if nothing with area
/// survives simplification.
fn canonical_ring(ring: &LineString<f64>, winding: Winding) -> Option<Vec<Coord<f64>>> {
    let mut points = open_ring(ring.coords().map(|c| snap(*c)));
    drop_collinear(&mut points);
    if points.len() < 3 {
        return None;
    }
    let area = signed_area(&points);
    if area == 0.0 {
        return None;
    }
    let is_ccw = area > 0.0;
    if is_ccw != (winding == Winding::CounterClockwise) {
        points.reverse();
    }
    let start = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| cmp_coord(a, b))
        .map_or(0, |(i, _)| i);
    points.rotate_left(start);
    Some(points)
}

/// Strip the closing coordinate and consecutive repeats.
fn open_ring(coords: impl Iterator<Item = Coord<f64>>) -> Vec<Coord<f64>> {
    let mut points: Vec<Coord<f64>> = coords.collect();
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

#[expect(
    clippy::float_arithmetic,
    reason = "snapping rounds to a fixed decimal grid"
)]
fn snap(c: Coord<f64>) -> Coord<f64> {
    // Adding zero turns -0.0 into 0.0.
    Coord {
        x: (c.x * SNAP).round() / SNAP + 0.0,
        y: (c.y * SNAP).round() / SNAP + 0.0,
    }
}

fn drop_collinear(points: &mut Vec<Coord<f64>>) {
    loop {
        let n = points.len();
        if n < 3 {
            return;
        }
        let redundant = (0..n).find(|&i| {
            let prev = points.get(if i == 0 { n - 1 } else { i - 1 });
            let here = points.get(i);
            let next = points.get(if i + 1 == n { 0 } else { i + 1 });
            match (prev, here, next) {
                (Some(a), Some(b), Some(c)) => is_collinear(*a, *b, *c),
                _ => false,
            }
        });
        match redundant {
            Some(i) => {
                points.remove(i);
            }
            None => return,
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "collinearity is a cross-product test"
)]
fn is_collinear(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    let ab = b - a;
    let bc = c - b;
    let cross = ab.x * bc.y - ab.y * bc.x;
    let scale = (ab.x * ab.x + ab.y * ab.y).max(bc.x * bc.x + bc.y * bc.y);
    cross.abs() <= COLLINEAR_EPSILON * scale
}

/// Shoelace area of an open ring; positive when counter-clockwise.
#[expect(clippy::float_arithmetic, reason = "shoelace formula")]
fn signed_area(points: &[Coord<f64>]) -> f64 {
    let next = points.iter().cycle().skip(1);
    points
        .iter()
        .zip(next)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
        / 2.0
}

fn cmp_coord(a: &Coord<f64>, b: &Coord<f64>) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

fn cmp_ring(a: &[Coord<f64>], b: &[Coord<f64>]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(p, q)| cmp_coord(p, q))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use geo::{Area, polygon};
    use rstest::rstest;

    #[expect(clippy::float_arithmetic, reason = "fixture offsets corners")]
    fn square(x: f64, y: f64, side: f64) -> MultiPolygon<f64> {
        let coords = [(x, y), (x + side, y), (x + side, y + side), (x, y + side)];
        MultiPolygon::new(vec![Polygon::new(LineString::from(coords.to_vec()), vec![])])
    }

    #[rstest]
    fn overlapping_squares_merge() {
        let merged = union_multi_polygons(&[square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)])
            .expect("valid");
        assert_eq!(merged.0.len(), 1);
        assert_eq!(merged.unsigned_area(), 7.0);
    }

    #[rstest]
    fn disjoint_squares_stay_apart_and_sorted() {
        let merged = union_multi_polygons(&[square(10.0, 0.0, 1.0), square(0.0, 0.0, 1.0)])
            .expect("valid");
        assert_eq!(merged.0.len(), 2);
        let first = merged.0.first().and_then(|p| p.exterior().0.first().copied());
        assert_eq!(first, Some(Coord { x: 0.0, y: 0.0 }));
    }

    #[rstest]
    fn adjacent_squares_lose_shared_edge_vertices() {
        let merged = union_multi_polygons(&[square(0.0, 0.0, 1.0), square(1.0, 0.0, 1.0)])
            .expect("valid");
        let exterior = merged.0.first().map(|p| p.exterior().0.len());
        // Four corners plus the closing coordinate.
        assert_eq!(exterior, Some(5));
    }

    #[rstest]
    fn holes_are_preserved() {
        let donut = MultiPolygon::new(vec![polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
            interiors: [[(x: 4.0, y: 4.0), (x: 6.0, y: 4.0), (x: 6.0, y: 6.0), (x: 4.0, y: 6.0)]],
        )]);
        let merged = union_multi_polygons(&[donut]).expect("valid");
        assert_eq!(merged.0.first().map(|p| p.interiors().len()), Some(1));
        assert!(!multi_polygon_contains(&merged, 5.0, 5.0));
        assert!(multi_polygon_contains(&merged, 2.0, 5.0));
    }

    #[rstest]
    fn union_is_idempotent() {
        let once = union_multi_polygons(&[square(0.0, 0.0, 3.0), square(2.0, 2.0, 3.0)])
            .expect("valid");
        let twice = union_multi_polygons(&[once.clone()]).expect("valid");
        assert_eq!(once, twice);
    }

    fn triangle(points: [(f64, f64); 3]) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Polygon::new(LineString::from(points.to_vec()), vec![])])
    }

    #[rstest]
    fn overlapping_triangles_are_a_fixed_point() {
        let a = triangle([(6.612_784_5, 0.0), (0.0, 0.0), (0.0, 5.469_812_3)]);
        let b = triangle([(0.0, 0.0), (0.0, 2.699_146_1), (6.366_807_2, 3.803_562_4)]);
        let once = union_multi_polygons(&[a, b]).expect("valid");
        let twice = union_multi_polygons(&[once.clone()]).expect("valid");
        let thrice = union_multi_polygons(&[twice.clone()]).expect("valid");
        assert_eq!(once, twice);
        assert_eq!(twice, thrice);
    }

    #[rstest]
    fn negative_zero_is_normalised() {
        let merged = union_multi_polygons(&[triangle([(-0.0, -0.0), (1.0, -0.0), (-0.0, 1.0)])])
            .expect("valid");
        let signs: Vec<bool> = merged
            .iter()
            .flat_map(|p| p.exterior().coords())
            .flat_map(|c| [c.x, c.y])
            .map(f64::is_sign_negative)
            .collect();
        assert!(!signs.is_empty());
        assert!(signs.iter().all(|negative| !negative));
    }

    #[rstest]
    fn corner_touching_squares_skip_the_overlay() {
        let merged = union_multi_polygons(&[square(0.0, 0.0, 1.0), square(1.0, 1.0, 1.0)])
            .expect("valid");
        assert_eq!(merged.0.len(), 2);
        let again = union_multi_polygons(&[merged.clone()]).expect("valid");
        assert_eq!(merged, again);
    }

    #[rstest]
    fn island_inside_a_hole_is_kept() {
        let donut = MultiPolygon::new(vec![polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
            interiors: [[(x: 2.0, y: 2.0), (x: 8.0, y: 2.0), (x: 8.0, y: 8.0), (x: 2.0, y: 8.0)]],
        )]);
        let merged = union_multi_polygons(&[donut, square(4.0, 4.0, 2.0)]).expect("valid");
        assert_eq!(merged.0.len(), 2);
        assert!(multi_polygon_contains(&merged, 5.0, 5.0));
        assert!(!multi_polygon_contains(&merged, 3.0, 3.0));
    }

    #[rstest]
    fn input_order_does_not_matter() {
        let ab = union_multi_polygons(&[square(0.0, 0.0, 3.0), square(2.0, 2.0, 3.0)])
            .expect("valid");
        let ba = union_multi_polygons(&[square(2.0, 2.0, 3.0), square(0.0, 0.0, 3.0)])
            .expect("valid");
        assert_eq!(ab, ba);
    }

    #[rstest]
    fn empty_input_yields_empty_output() {
        let merged = union_multi_polygons(&[]).expect("valid");
        assert!(merged.0.is_empty());
    }

    #[rstest]
    fn flat_ring_is_degenerate() {
        let line = MultiPolygon::new(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 2.0, y: 2.0)]]);
        let err = union_multi_polygons(&[line]).expect_err("zero area");
        assert_eq!(err.kind(), ErrorKind::DegenerateGeometry);
    }

    #[rstest]
    fn repeated_points_are_degenerate() {
        let sliver = MultiPolygon::new(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.0, y: 0.0)]]);
        let err = union_multi_polygons(&[sliver]).expect_err("two distinct points");
        assert_eq!(err.kind(), ErrorKind::DegenerateGeometry);
    }
}
