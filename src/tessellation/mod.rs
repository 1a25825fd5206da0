mod delaunay;
mod earclip;
mod flatten;
mod stroke_style;
mod tessellate_stroke;

pub use delaunay::DelaunayTriangulator;
pub use earclip::EarClipTriangulator;
pub use flatten::FlattenSpline;
pub use stroke_style::{LineCap, LineJoin, StrokeStyle};
pub use tessellate_stroke::TessellateStroke;

use crate::error::{GeolabError, Result, TriangulationError};
use crate::geometry::{Polygon, Polyline};
use crate::math::intersect_2d::{orient_2d, segments_intersect};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{is_finite, Point2, TOLERANCE};

/// Parameters controlling spline flattening quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlattenParams {
    /// Maximum distance of a segment's inner control points from its chord
    /// before the segment is emitted as a straight line.
    pub tolerance: f64,
    /// Maximum recursion depth per cubic segment (at most `2^max_depth`
    /// lines per segment).
    pub max_depth: u32,
}

impl Default for FlattenParams {
    fn default() -> Self {
        Self {
            tolerance: 0.25,
            max_depth: 10,
        }
    }
}

impl FlattenParams {
    /// Checks that the tolerance is a positive, finite number.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidInput` otherwise.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_finite() && self.tolerance > 0.0 {
            Ok(())
        } else {
            Err(GeolabError::InvalidInput(format!(
                "flatten tolerance must be positive, got {}",
                self.tolerance
            )))
        }
    }
}

/// Fills the interior of a simple polygon with triangles.
pub trait Triangulate {
    /// Triangulates the closed ring described by `path.points`.
    ///
    /// The ring must be simple and wound counter-clockwise; the `closed`
    /// flag is ignored. Output vertex `i` is input point `i`.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::Triangulation` if the ring is degenerate,
    /// clockwise, self-intersecting, or cannot be triangulated.
    fn triangulate(&self, path: &Polyline) -> Result<Polygon>;
}

/// Checks that `points` form a simple, counter-clockwise ring with distinct
/// vertices and non-zero area. Runs in O(n²).
pub(crate) fn validate_simple_ring(points: &[Point2]) -> std::result::Result<(), TriangulationError> {
    let n = points.len();
    if n < 3 {
        return Err(TriangulationError::TooFewVertices(n));
    }
    if let Some(i) = points.iter().position(|p| !is_finite(p)) {
        return Err(TriangulationError::NonFinite(i));
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if (points[i] - points[j]).norm() < TOLERANCE {
                return Err(TriangulationError::DuplicateVertex { first: i, second: j });
            }
        }
    }

    let area = signed_area_2d(points);
    if area.abs() < TOLERANCE {
        return Err(TriangulationError::ZeroArea);
    }
    if area < 0.0 {
        return Err(TriangulationError::WrongWinding);
    }

    for i in 0..n {
        let (a0, a1) = (points[i], points[(i + 1) % n]);

        // Adjacent edges only meet at their shared vertex unless the ring
        // folds back on itself.
        let a2 = points[(i + 2) % n];
        if orient_2d(&a0, &a1, &a2) == 0.0 && (a1 - a0).dot(&(a2 - a1)) < 0.0 {
            return Err(TriangulationError::SelfIntersecting {
                first: i,
                second: (i + 1) % n,
            });
        }

        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b0, b1) = (points[j], points[(j + 1) % n]);
            if segments_intersect(&a0, &a1, &b0, &b1) {
                return Err(TriangulationError::SelfIntersecting { first: i, second: j });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn default_flatten_params_are_valid() {
        assert!(FlattenParams::default().validate().is_ok());
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        let params = FlattenParams {
            tolerance: 0.0,
            ..FlattenParams::default()
        };
        assert!(matches!(params.validate(), Err(GeolabError::InvalidInput(_))));
    }

    #[test]
    fn ring_validation_reports_each_defect() {
        let square = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert_eq!(validate_simple_ring(&square), Ok(()));
        assert_eq!(
            validate_simple_ring(&square[..2]),
            Err(TriangulationError::TooFewVertices(2))
        );

        let mut cw = square;
        cw.reverse();
        assert_eq!(validate_simple_ring(&cw), Err(TriangulationError::WrongWinding));

        let flat = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
        assert!(validate_simple_ring(&flat).is_err());

        let dup = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert_eq!(
            validate_simple_ring(&dup),
            Err(TriangulationError::DuplicateVertex { first: 1, second: 3 })
        );

        // Positive net area, but edges 1 and 3 cross.
        let bowtie = [p(0.0, 0.0), p(6.0, 0.0), p(0.0, 3.0), p(2.0, 5.0)];
        assert_eq!(
            validate_simple_ring(&bowtie),
            Err(TriangulationError::SelfIntersecting { first: 1, second: 3 })
        );

        let nan = [p(0.0, 0.0), p(f64::NAN, 0.0), p(1.0, 1.0)];
        assert_eq!(validate_simple_ring(&nan), Err(TriangulationError::NonFinite(1)));
    }
}
