use crate::error::{Result, TriangulationError};
use crate::geometry::{Polygon, Polyline};
use crate::math::intersect_2d::{orient_2d, point_in_triangle};
use crate::math::Point2;

use super::{validate_simple_ring, Triangulate};

/// Triangulates a simple counter-clockwise polygon by ear clipping.
///
/// The remaining ring is kept as a doubly-linked list with a cached ear
/// flag per vertex. Clipping a vertex only changes the flags of its two
/// neighbours, so each clip costs O(n) and the whole run O(n²). Collinear
/// vertices are unlinked without emitting a triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarClipTriangulator;

impl EarClipTriangulator {
    /// Creates a new ear-clipping triangulator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Triangulate for EarClipTriangulator {
    #[allow(clippy::cast_possible_truncation)]
    fn triangulate(&self, path: &Polyline) -> Result<Polygon> {
        let points = &path.points;
        validate_simple_ring(points)?;

        let mut ring = Ring::new(points);
        let mut indices = Vec::with_capacity(points.len() - 2);
        let mut current = 0;
        let mut misses = 0;

        while ring.remaining > 3 {
            if misses >= ring.remaining {
                return Err(TriangulationError::NoEarFound {
                    remaining: ring.remaining,
                }
                .into());
            }

            let (prev, next) = (ring.prev[current], ring.next[current]);
            let collinear = orient_2d(&points[prev], &points[current], &points[next]) == 0.0;
            if collinear || ring.ear[current] {
                if !collinear {
                    indices.push([prev as u32, current as u32, next as u32]);
                }
                ring.unlink(current);
                current = next;
                misses = 0;
            } else {
                current = ring.next[current];
                misses += 1;
            }
        }

        let (prev, next) = (ring.prev[current], ring.next[current]);
        if orient_2d(&points[prev], &points[current], &points[next]) > 0.0 {
            indices.push([prev as u32, current as u32, next as u32]);
        }

        Polygon::new(points.clone(), indices)
    }
}

/// The not-yet-clipped part of the polygon.
struct Ring<'a> {
    points: &'a [Point2],
    prev: Vec<usize>,
    next: Vec<usize>,
    ear: Vec<bool>,
    remaining: usize,
}

impl<'a> Ring<'a> {
    fn new(points: &'a [Point2]) -> Self {
        let n = points.len();
        let mut ring = Self {
            points,
            prev: (0..n).map(|i| (i + n - 1) % n).collect(),
            next: (0..n).map(|i| (i + 1) % n).collect(),
            ear: vec![false; n],
            remaining: n,
        };
        for i in 0..n {
            ring.ear[i] = ring.is_ear(i);
        }
        ring
    }

    /// Removes `i` from the ring and refreshes its neighbours' ear flags.
    fn unlink(&mut self, i: usize) {
        let (prev, next) = (self.prev[i], self.next[i]);
        self.next[prev] = next;
        self.prev[next] = prev;
        self.remaining -= 1;
        self.ear[prev] = self.is_ear(prev);
        self.ear[next] = self.is_ear(next);
    }

    /// A vertex is an ear when it is strictly convex and no other remaining
    /// vertex lies inside or on its triangle.
    fn is_ear(&self, i: usize) -> bool {
        let (prev, next) = (self.prev[i], self.next[i]);
        let (a, b, c) = (&self.points[prev], &self.points[i], &self.points[next]);
        if orient_2d(a, b, c) <= 0.0 {
            return false;
        }

        let mut v = self.next[next];
        while v != prev {
            if point_in_triangle(&self.points[v], a, b, c) {
                return false;
            }
            v = self.next[v];
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::TAU;

    use approx::assert_relative_eq;

    use super::*;
    use crate::error::GeolabError;
    use crate::math::polygon_2d::{signed_area_2d, triangle_area_2d};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn ring(points: Vec<Point2>) -> Polyline {
        Polyline::new(points, true)
    }

    #[allow(clippy::cast_precision_loss)]
    fn regular_ngon(n: usize, radius: f64) -> Vec<Point2> {
        (0..n)
            .map(|i| {
                let a = TAU * i as f64 / n as f64;
                p(radius * a.cos(), radius * a.sin())
            })
            .collect()
    }

    fn assert_ccw(polygon: &Polygon) {
        for [a, b, c] in polygon.triangles() {
            assert!(triangle_area_2d(&a, &b, &c) > 0.0);
        }
    }

    #[test]
    fn convex_ngon_yields_n_minus_two_triangles() {
        for n in 3..=12 {
            let pts = regular_ngon(n, 10.0);
            let expected = signed_area_2d(&pts);
            let polygon = EarClipTriangulator::new().triangulate(&ring(pts)).unwrap();
            assert_eq!(polygon.triangle_count(), n - 2);
            assert_relative_eq!(polygon.area(), expected, max_relative = 1e-12);
            assert_ccw(&polygon);
        }
    }

    #[test]
    fn concave_l_shape() {
        let pts = vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 4.0),
            p(0.0, 4.0),
        ];
        let polygon = EarClipTriangulator::new().triangulate(&ring(pts)).unwrap();
        assert_eq!(polygon.triangle_count(), 4);
        assert_relative_eq!(polygon.area(), 7.0, epsilon = 1e-12);
        assert_ccw(&polygon);
    }

    #[test]
    fn collinear_vertices_emit_no_slivers() {
        let pts = vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 2.0),
            p(0.0, 2.0),
        ];
        let polygon = EarClipTriangulator::new().triangulate(&ring(pts)).unwrap();
        assert!(polygon.triangle_count() <= 3);
        assert_relative_eq!(polygon.area(), 4.0, epsilon = 1e-12);
        assert_ccw(&polygon);
    }

    #[test]
    fn output_keeps_input_vertices() {
        let pts = regular_ngon(5, 1.0);
        let polygon = EarClipTriangulator::new()
            .triangulate(&ring(pts.clone()))
            .unwrap();
        assert_eq!(polygon.vertices, pts);
    }

    #[test]
    fn self_intersecting_polygon_fails() {
        let pts = vec![p(0.0, 0.0), p(6.0, 0.0), p(0.0, 3.0), p(2.0, 5.0)];
        let err = EarClipTriangulator::new().triangulate(&ring(pts)).unwrap_err();
        assert!(matches!(
            err,
            GeolabError::Triangulation(TriangulationError::SelfIntersecting { .. })
        ));
    }

    #[test]
    fn clockwise_polygon_fails() {
        let mut pts = regular_ngon(6, 1.0);
        pts.reverse();
        let err = EarClipTriangulator::new().triangulate(&ring(pts)).unwrap_err();
        assert!(matches!(
            err,
            GeolabError::Triangulation(TriangulationError::WrongWinding)
        ));
    }

    #[test]
    fn degenerate_inputs_fail() {
        let tri = EarClipTriangulator::new();
        assert!(tri.triangulate(&ring(vec![p(0.0, 0.0), p(1.0, 0.0)])).is_err());
        assert!(tri
            .triangulate(&ring(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]))
            .is_err());
        assert!(tri
            .triangulate(&ring(vec![
                p(0.0, 0.0),
                p(1.0, 0.0),
                p(1.0, 1.0),
                p(0.0, 0.0)
            ]))
            .is_err());
    }

    #[test]
    fn comb_polygon_terminates() {
        // A comb with many teeth stresses the ear search.
        let mut pts = vec![p(0.0, 0.0)];
        for tooth in 0..20 {
            let x = f64::from(tooth) * 2.0;
            pts.push(p(x + 1.0, 0.0));
            pts.push(p(x + 1.5, 5.0));
            pts.push(p(x + 2.0, 0.0));
        }
        pts.push(p(41.0, 0.0));
        pts.push(p(41.0, -1.0));
        pts.push(p(0.0, -1.0));
        // Built clockwise; the triangulator wants counter-clockwise.
        pts.reverse();
        let expected = signed_area_2d(&pts);
        let polygon = EarClipTriangulator::new().triangulate(&ring(pts)).unwrap();
        assert_relative_eq!(polygon.area(), expected, max_relative = 1e-9);
        assert_ccw(&polygon);
    }
}
