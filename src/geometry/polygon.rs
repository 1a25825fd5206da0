use crate::error::{GeolabError, Result};
use crate::math::polygon_2d::triangle_area_2d;
use crate::math::{is_finite, Point2};

/// A triangulated planar region ready to be filled by a renderer.
///
/// Triangles are index triples into `vertices`, wound counter-clockwise
/// (y-up) and never of zero area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    /// Vertex positions.
    pub vertices: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl Polygon {
    /// Creates a polygon after checking that every index is in bounds.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidInput` if an index is out of range.
    pub fn new(vertices: Vec<Point2>, indices: Vec<[u32; 3]>) -> Result<Self> {
        let count = vertices.len();
        if let Some(tri) = indices
            .iter()
            .find(|tri| tri.iter().any(|&i| i as usize >= count))
        {
            return Err(GeolabError::InvalidInput(format!(
                "triangle {tri:?} references a vertex outside 0..{count}"
            )));
        }
        Ok(Self { vertices, indices })
    }

    /// Returns `true` if the polygon has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Iterates over the triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Point2; 3]> + '_ {
        self.indices.iter().map(|&[a, b, c]| {
            [
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            ]
        })
    }

    /// Total area covered by the triangles.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| triangle_area_2d(&a, &b, &c).abs())
            .sum()
    }

    /// Returns `true` if every vertex coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(is_finite)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_out_of_range_index() {
        let vertices = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(Polygon::new(vertices, vec![[0, 1, 2]]).is_err());
    }

    #[test]
    fn area_sums_triangles() {
        let polygon = Polygon::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 2.0),
                Point2::new(0.0, 2.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap();
        assert_eq!(polygon.triangle_count(), 2);
        assert!((polygon.area() - 4.0).abs() < 1e-12);
        assert!(polygon.is_finite());
    }

    #[test]
    fn default_is_empty() {
        let polygon = Polygon::default();
        assert!(polygon.is_empty());
        assert!(polygon.area().abs() < f64::EPSILON);
    }
}
