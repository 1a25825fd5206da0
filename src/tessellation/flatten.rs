use crate::error::{GeolabError, Result};
use crate::geometry::{Polyline, Spline};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::polygon_2d::dedup_consecutive;
use crate::math::Point2;

use super::FlattenParams;

/// Flattens a spline into a polyline by recursive de Casteljau subdivision.
///
/// Each cubic segment is split at `t = 0.5` until both inner control points
/// lie within `params.tolerance` of the chord, or `params.max_depth` is
/// reached. Coincident consecutive points are dropped, so degenerate
/// segments collapse to a single point.
#[derive(Debug)]
pub struct FlattenSpline<'a> {
    spline: &'a Spline,
    params: FlattenParams,
}

impl<'a> FlattenSpline<'a> {
    /// Creates a new flatten operation.
    #[must_use]
    pub fn new(spline: &'a Spline, params: FlattenParams) -> Self {
        Self { spline, params }
    }

    /// Executes the flattening.
    ///
    /// A closed spline yields a closed polyline without a repeated endpoint.
    ///
    /// # Errors
    ///
    /// - `GeolabError::InvalidState` if the spline has no anchors
    /// - `GeolabError::InvalidInput` if the parameters are invalid
    pub fn execute(&self) -> Result<Polyline> {
        self.params.validate()?;
        if self.spline.is_empty() {
            return Err(GeolabError::InvalidState(
                "cannot flatten an empty spline".into(),
            ));
        }

        let mut points = vec![self.spline.anchor(0)?];
        for i in 0..self.spline.segment_count() {
            let [p0, p1, p2, p3] = self.spline.segment(i)?;
            flatten_cubic(
                [p0, p1, p2, p3],
                self.params.tolerance,
                self.params.max_depth,
                &mut points,
            );
        }

        let closed = self.spline.is_closed();
        Ok(Polyline::new(dedup_consecutive(&points, closed), closed))
    }
}

/// Appends the flattened cubic to `out`, excluding its start point.
fn flatten_cubic(curve: [Point2; 4], tolerance: f64, depth: u32, out: &mut Vec<Point2>) {
    let [p0, p1, p2, p3] = curve;
    if depth == 0 {
        out.push(p3);
        return;
    }
    // Use max distance of both controls to the chord as error metric.
    let d1 = point_to_segment_dist(&p1, &p0, &p3);
    let d2 = point_to_segment_dist(&p2, &p0, &p3);
    if d1.max(d2) <= tolerance {
        out.push(p3);
        return;
    }

    let p01 = nalgebra::center(&p0, &p1);
    let p12 = nalgebra::center(&p1, &p2);
    let p23 = nalgebra::center(&p2, &p3);
    let p012 = nalgebra::center(&p01, &p12);
    let p123 = nalgebra::center(&p12, &p23);
    let mid = nalgebra::center(&p012, &p123);
    flatten_cubic([p0, p01, p012, mid], tolerance, depth - 1, out);
    flatten_cubic([mid, p123, p23, p3], tolerance, depth - 1, out);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn straight_segment_flattens_to_two_points() {
        let spline = Spline::line(p(0.0, 0.0), p(10.0, 0.0));
        let path = FlattenSpline::new(&spline, FlattenParams::default())
            .execute()
            .unwrap();
        assert_eq!(path.points, vec![p(0.0, 0.0), p(10.0, 0.0)]);
        assert!(!path.closed);
    }

    #[test]
    fn closed_circle_has_no_duplicate_endpoint() {
        let spline = Spline::circle(p(0.0, 0.0), 200.0, 4).unwrap();
        let path = FlattenSpline::new(&spline, FlattenParams::default())
            .execute()
            .unwrap();
        assert!(path.closed);
        assert!(path.len() > 16);
        let first = path.points[0];
        let last = path.points[path.len() - 1];
        assert!((first - last).norm() > TOLERANCE);
        // Counter-clockwise circle of radius 200.
        let area = path.signed_area();
        assert!(area > 0.0);
        assert!((area - std::f64::consts::PI * 200.0 * 200.0).abs() / area < 0.01);
    }

    #[test]
    fn points_stay_within_tolerance_of_curve() {
        let spline = Spline::circle(p(0.0, 0.0), 100.0, 6).unwrap();
        let params = FlattenParams {
            tolerance: 0.1,
            ..FlattenParams::default()
        };
        let path = FlattenSpline::new(&spline, params).execute().unwrap();
        for (a, b) in path.segments() {
            let mid = nalgebra::center(&a, &b);
            // Chord midpoints sag inward by at most the flatness tolerance
            // plus the cubic-vs-circle error.
            assert!(100.0 - mid.coords.norm() < 0.2);
        }
    }

    #[test]
    fn flattening_is_deterministic() {
        let spline = Spline::circle(p(3.0, 4.0), 120.0, 13).unwrap();
        let first = FlattenSpline::new(&spline, FlattenParams::default())
            .execute()
            .unwrap();
        let second = FlattenSpline::new(&spline, FlattenParams::default())
            .execute()
            .unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.points.iter().zip(&second.points) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
        }
    }

    #[test]
    fn degenerate_segment_collapses_without_nan() {
        // Middle anchor coincides with both of its neighbours' handles.
        let pts = [
            p(0.0, 0.0),
            p(5.0, 0.0),
            p(5.0, 0.0),
            p(5.0, 0.0),
            p(5.0, 0.0),
            p(5.0, 0.0),
            p(5.0, 0.0),
            p(5.0, 5.0),
            p(5.0, 10.0),
            p(5.0, 10.0),
        ];
        let spline = Spline::from_points(&pts, false).unwrap();
        let path = FlattenSpline::new(&spline, FlattenParams::default())
            .execute()
            .unwrap();
        assert!(path.is_finite());
        assert_eq!(path.points, vec![p(0.0, 0.0), p(5.0, 0.0), p(5.0, 10.0)]);
        for (a, b) in path.segments() {
            assert!((b - a).norm() > TOLERANCE);
        }
    }

    #[test]
    fn fully_degenerate_spline_is_a_single_point() {
        let spline = Spline::line(p(1.0, 1.0), p(1.0, 1.0));
        let path = FlattenSpline::new(&spline, FlattenParams::default())
            .execute()
            .unwrap();
        assert_eq!(path.points, vec![p(1.0, 1.0)]);
    }

    #[test]
    fn empty_spline_is_invalid_state() {
        let spline = Spline::new();
        assert!(matches!(
            FlattenSpline::new(&spline, FlattenParams::default()).execute(),
            Err(GeolabError::InvalidState(_))
        ));
    }

    #[test]
    fn depth_limit_bounds_output() {
        let spline = Spline::circle(p(0.0, 0.0), 1.0e6, 2).unwrap();
        let params = FlattenParams {
            tolerance: 1e-9,
            max_depth: 3,
        };
        let path = FlattenSpline::new(&spline, params).execute().unwrap();
        // 2 segments, at most 2^3 lines each, closing point dropped.
        assert_eq!(path.len(), 16);
    }
}
