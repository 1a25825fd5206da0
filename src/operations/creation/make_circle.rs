use std::f64::consts::TAU;

use crate::error::{GeolabError, Result};
use crate::geometry::Polygon;
use crate::math::{is_finite, Point2, Vector2};

/// Segment count used when none is requested.
pub const DEFAULT_SEGMENTS: usize = 32;

/// Fewest rim vertices a circle is built with.
pub const MIN_SEGMENTS: usize = 16;

/// Creates a solid circle polygon from a center and radius.
///
/// Every vertex lies on the rim. The interior is a triangle fan anchored at
/// rim vertex 0, so a circle of `n` segments has `n - 2` triangles, all
/// counter-clockwise.
#[derive(Debug, Clone, Copy)]
pub struct MakeCircle {
    center: Point2,
    radius: f64,
    segments: usize,
}

impl MakeCircle {
    /// Creates a new `MakeCircle` operation with the default segment count.
    #[must_use]
    pub fn new(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius,
            segments: DEFAULT_SEGMENTS,
        }
    }

    /// Sets the number of rim vertices. Values below [`MIN_SEGMENTS`] are
    /// raised to it.
    #[must_use]
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments.max(MIN_SEGMENTS);
        self
    }

    /// Number of rim vertices the circle will have.
    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns [`GeolabError::InvalidInput`] if the radius is not a positive
    /// finite number or the center has a non-finite coordinate.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Polygon> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GeolabError::InvalidInput(format!(
                "circle radius must be positive, got {}",
                self.radius
            )));
        }
        if !is_finite(&self.center) {
            return Err(GeolabError::InvalidInput(
                "circle center must be finite".into(),
            ));
        }

        let n = self.segments;
        let vertices: Vec<Point2> = (0..n)
            .map(|i| {
                let angle = TAU * i as f64 / n as f64;
                self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
            })
            .collect();
        let indices = (1..n - 1)
            .map(|i| [0, i as u32, (i + 1) as u32])
            .collect();

        Polygon::new(vertices, indices)
    }
}
