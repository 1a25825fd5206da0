use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{Result, TriangulationError};
use crate::geometry::{Polygon, Polyline};

use super::{validate_simple_ring, Triangulate};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates a simple counter-clockwise polygon with a constrained
/// Delaunay triangulation.
///
/// The polygon boundary is inserted as a constraint loop and the faces
/// inside it are selected by flood fill. Same contract as
/// [`super::EarClipTriangulator`], with better-shaped triangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayTriangulator;

impl DelaunayTriangulator {
    /// Creates a new constrained-Delaunay triangulator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Triangulate for DelaunayTriangulator {
    fn triangulate(&self, path: &Polyline) -> Result<Polygon> {
        let points = &path.points;
        validate_simple_ring(points)?;

        let mut cdt = Cdt::new();
        let handles = insert_constraint_loop(&mut cdt, points)?;
        let input_index: HashMap<FixedVertexHandle, u32> = handles
            .iter()
            .zip(0u32..)
            .map(|(&handle, i)| (handle, i))
            .collect();

        let interior = classify_interior_faces(&cdt);
        let mut indices = Vec::with_capacity(points.len() - 2);
        for face in cdt.inner_faces() {
            if !interior.contains(&face.fix().index()) {
                continue;
            }
            let mut tri = [0u32; 3];
            for (slot, vertex) in tri.iter_mut().zip(face.vertices()) {
                *slot = *input_index.get(&vertex.fix()).ok_or_else(|| {
                    TriangulationError::Delaunay("face references an unknown vertex".into())
                })?;
            }
            indices.push(tri);
        }

        Polygon::new(points.clone(), indices)
    }
}

/// Inserts a closed polygon as constraint edges into the CDT.
fn insert_constraint_loop(
    cdt: &mut Cdt,
    points: &[crate::math::Point2],
) -> std::result::Result<Vec<FixedVertexHandle>, TriangulationError> {
    let mut handles = Vec::with_capacity(points.len());
    for pt in points {
        let h = cdt
            .insert(SpadePoint2::new(pt.x, pt.y))
            .map_err(|e: InsertionError| TriangulationError::Delaunay(format!("insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from != to {
            cdt.add_constraint(from, to);
        }
    }

    Ok(handles)
}

/// Classifies which inner faces of the CDT are inside the polygon using flood-fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each time
/// a constraint edge is crossed, depth increments. Odd depth = interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            if let Some(inner) = edge.rev().face().as_inner() {
                let idx = inner.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depth_map.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            if let Some(neighbor) = edge.rev().face().as_inner() {
                let n_idx = neighbor.fix().index();
                if depth_map.contains_key(&n_idx) {
                    continue;
                }
                let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    depth + 1
                } else {
                    depth
                };
                depth_map.insert(n_idx, new_depth);
                if new_depth % 2 == 1 {
                    interior.insert(n_idx);
                }
                queue.push_back((neighbor.fix(), new_depth));
            }
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::GeolabError;
    use crate::math::polygon_2d::triangle_area_2d;
    use crate::math::Point2;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn square_produces_2_triangles() {
        let path = Polyline::new(
            vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)],
            true,
        );
        let polygon = DelaunayTriangulator::new().triangulate(&path).unwrap();
        assert_eq!(polygon.triangle_count(), 2);
        assert_relative_eq!(polygon.area(), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn l_shape_concave_tessellates() {
        let path = Polyline::new(
            vec![
                p(0.0, 0.0),
                p(4.0, 0.0),
                p(4.0, 1.0),
                p(1.0, 1.0),
                p(1.0, 4.0),
                p(0.0, 4.0),
            ],
            true,
        );
        let polygon = DelaunayTriangulator::new().triangulate(&path).unwrap();
        assert_eq!(polygon.triangle_count(), 4);
        assert_relative_eq!(polygon.area(), 7.0, epsilon = 1e-12);
        for [a, b, c] in polygon.triangles() {
            assert!(triangle_area_2d(&a, &b, &c) > 0.0);
        }
    }

    #[test]
    fn clockwise_input_is_rejected() {
        let path = Polyline::new(vec![p(0.0, 0.0), p(0.0, 4.0), p(4.0, 0.0)], true);
        assert!(matches!(
            DelaunayTriangulator::new().triangulate(&path),
            Err(GeolabError::Triangulation(TriangulationError::WrongWinding))
        ));
    }
}
