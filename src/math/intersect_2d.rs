use super::{cross, Point2, TOLERANCE};

/// Orientation of the triple `(a, b, c)`: positive when counter-clockwise,
/// negative when clockwise, zero when collinear (within [`TOLERANCE`]).
#[must_use]
pub fn orient_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let o = cross(&(b - a), &(c - a));
    if o.abs() < TOLERANCE {
        0.0
    } else {
        o
    }
}

/// Returns `true` when `p` lies inside or on the boundary of the
/// counter-clockwise triangle `(a, b, c)`.
#[must_use]
pub fn point_in_triangle(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    orient_2d(a, b, p) >= 0.0 && orient_2d(b, c, p) >= 0.0 && orient_2d(c, a, p) >= 0.0
}

/// Returns `true` when `p` lies within the bounding box of segment `a`→`b`.
fn on_segment_bounds(a: &Point2, b: &Point2, p: &Point2) -> bool {
    p.x >= a.x.min(b.x) - TOLERANCE
        && p.x <= a.x.max(b.x) + TOLERANCE
        && p.y >= a.y.min(b.y) - TOLERANCE
        && p.y <= a.y.max(b.y) + TOLERANCE
}

/// Closed segment-segment intersection test, including touching endpoints
/// and collinear overlap.
#[must_use]
pub fn segments_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let d1 = orient_2d(b0, b1, a0);
    let d2 = orient_2d(b0, b1, a1);
    let d3 = orient_2d(a0, a1, b0);
    let d4 = orient_2d(a0, a1, b1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment_bounds(b0, b1, a0))
        || (d2 == 0.0 && on_segment_bounds(b0, b1, a1))
        || (d3 == 0.0 && on_segment_bounds(a0, a1, b0))
        || (d4 == 0.0 && on_segment_bounds(a0, a1, b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn orientation_signs() {
        assert!(orient_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0)) > 0.0);
        assert!(orient_2d(&p(0.0, 0.0), &p(0.0, 1.0), &p(1.0, 0.0)) < 0.0);
        assert!(orient_2d(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 2.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn triangle_contains_interior_and_edge() {
        let (a, b, c) = (p(0.0, 0.0), p(4.0, 0.0), p(0.0, 4.0));
        assert!(point_in_triangle(&p(1.0, 1.0), &a, &b, &c));
        assert!(point_in_triangle(&p(2.0, 0.0), &a, &b, &c));
        assert!(!point_in_triangle(&p(3.0, 3.0), &a, &b, &c));
    }

    #[test]
    fn crossing_segments() {
        assert!(segments_intersect(
            &p(0.0, 0.0),
            &p(2.0, 2.0),
            &p(0.0, 2.0),
            &p(2.0, 0.0)
        ));
    }

    #[test]
    fn disjoint_segments() {
        assert!(!segments_intersect(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(0.0, 1.0),
            &p(1.0, 1.0)
        ));
    }

    #[test]
    fn touching_endpoint_counts() {
        assert!(segments_intersect(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 1.0)
        ));
    }

    #[test]
    fn collinear_overlap_counts() {
        assert!(segments_intersect(
            &p(0.0, 0.0),
            &p(2.0, 0.0),
            &p(1.0, 0.0),
            &p(3.0, 0.0)
        ));
        assert!(!segments_intersect(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(2.0, 0.0),
            &p(3.0, 0.0)
        ));
    }
}
