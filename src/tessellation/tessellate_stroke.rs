use std::f64::consts::{FRAC_PI_8, PI, TAU};

use crate::error::{GeolabError, Result};
use crate::geometry::{Polygon, Polyline};
use crate::math::polygon_2d::{
    dedup_consecutive, left_normal, rotate, segment_direction, triangle_area_2d,
};
use crate::math::{cross, is_finite, Point2, Vector2, TOLERANCE};

use super::stroke_style::{LineCap, LineJoin, StrokeStyle};

/// When the miter scale exceeds this limit, [`LineJoin::Auto`] switches to
/// a bevel join.
const BEVEL_THRESHOLD: f64 = 2.0;

/// Upper bound on the miter scale for [`LineJoin::Miter`].
const MITER_LIMIT: f64 = 4.0;

/// Maximum angle covered by one triangle of a round join or cap.
const ROUND_STEP: f64 = FRAC_PI_8;

/// How a polyline vertex maps to mesh vertices at the join.
enum JoinKind {
    /// Miter join or endpoint: 2 mesh vertices (left, right).
    Miter { dir: Vector2, scale: f64 },
    /// Bevel or round join: 1 inside vertex plus a fan of outside vertices.
    Fan {
        inside_dir: Vector2,
        inside_scale: f64,
        /// `true` when the inside of the bend is the left (+normal) side.
        inside_is_left: bool,
        /// Unit left normals swept from the incoming to the outgoing segment.
        outside: Vec<Vector2>,
    },
}

/// Mesh vertex indices associated with a single polyline vertex.
struct VertexSlot {
    /// Left index for connecting to the *incoming* segment.
    in_left: u32,
    /// Right index for connecting to the *incoming* segment.
    in_right: u32,
    /// Left index for connecting to the *outgoing* segment.
    out_left: u32,
    /// Right index for connecting to the *outgoing* segment.
    out_right: u32,
}

/// Extrudes a polyline into a filled ribbon of constant width.
///
/// The ribbon boundary is offset by ±width/2 from the centerline. Interior
/// vertices are joined according to the style's [`LineJoin`]; the ends of
/// open polylines get the style's [`LineCap`]. All triangles are emitted
/// counter-clockwise and zero-area triangles are skipped. Sharp turns may
/// make the ribbon overlap itself, which is harmless for filling.
#[derive(Debug)]
pub struct TessellateStroke<'a> {
    polyline: &'a Polyline,
    style: StrokeStyle,
}

impl<'a> TessellateStroke<'a> {
    /// Creates a new stroke tessellation operation.
    #[must_use]
    pub fn new(polyline: &'a Polyline, style: StrokeStyle) -> Self {
        Self { polyline, style }
    }

    /// Executes the tessellation, producing the ribbon polygon.
    ///
    /// A closed polyline with only two distinct points is stroked as open.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidInput` if a point is not finite or fewer
    /// than 2 distinct points remain after dropping consecutive duplicates.
    pub fn execute(&self) -> Result<Polygon> {
        if let Some(i) = self.polyline.points.iter().position(|p| !is_finite(p)) {
            return Err(GeolabError::InvalidInput(format!(
                "polyline point {i} is not finite"
            )));
        }

        let mut points = dedup_consecutive(&self.polyline.points, self.polyline.closed);
        let n = points.len();
        if n < 2 {
            return Err(GeolabError::InvalidInput(format!(
                "at least 2 distinct points are required for extrusion, got {n}"
            )));
        }
        let closed = self.polyline.closed && n >= 3;
        let half_w = self.style.half_width();

        if !closed && self.style.line_cap() == LineCap::Square {
            let start_dir = segment_direction(&points[0], &points[1])?;
            let end_dir = segment_direction(&points[n - 2], &points[n - 1])?;
            points[0] -= start_dir * half_w;
            points[n - 1] += end_dir * half_w;
        }

        let joins = compute_joins(&points, closed, self.style.line_join())?;
        let mut mesh = MeshBuilder::default();
        let mut slots = Vec::with_capacity(n);

        for (p, join) in points.iter().zip(&joins) {
            match join {
                JoinKind::Miter { dir, scale } => {
                    let off = *dir * half_w * *scale;
                    let left = mesh.vertex(p + off);
                    let right = mesh.vertex(p - off);
                    slots.push(VertexSlot {
                        in_left: left,
                        in_right: right,
                        out_left: left,
                        out_right: right,
                    });
                }
                JoinKind::Fan {
                    inside_dir,
                    inside_scale,
                    inside_is_left,
                    outside,
                } => {
                    let in_off = *inside_dir * half_w * *inside_scale;
                    // The outside of the bend is opposite the inside.
                    let (inside, side) = if *inside_is_left {
                        (mesh.vertex(p + in_off), -half_w)
                    } else {
                        (mesh.vertex(p - in_off), half_w)
                    };
                    let rim: Vec<u32> = outside
                        .iter()
                        .map(|normal| mesh.vertex(p + *normal * side))
                        .collect();
                    for pair in rim.windows(2) {
                        mesh.triangle(inside, pair[0], pair[1]);
                    }

                    let first = rim[0];
                    let last = rim[rim.len() - 1];
                    slots.push(if *inside_is_left {
                        VertexSlot {
                            in_left: inside,
                            in_right: first,
                            out_left: inside,
                            out_right: last,
                        }
                    } else {
                        VertexSlot {
                            in_left: first,
                            in_right: inside,
                            out_left: last,
                            out_right: inside,
                        }
                    });
                }
            }
        }

        // Segment quads.
        let segment_count = if closed { n } else { n - 1 };
        for i in 0..segment_count {
            let j = (i + 1) % n;
            let (si, sj) = (&slots[i], &slots[j]);
            mesh.triangle(si.out_left, si.out_right, sj.in_left);
            mesh.triangle(si.out_right, sj.in_right, sj.in_left);
        }

        if !closed && self.style.line_cap() == LineCap::Round {
            let start_normal = left_normal(segment_direction(&points[0], &points[1])?);
            let end_normal = left_normal(segment_direction(&points[n - 2], &points[n - 1])?);
            // Sweep half a turn counter-clockwise around the back of each end.
            mesh.semicircle(points[0], start_normal * half_w);
            mesh.semicircle(points[n - 1], -end_normal * half_w);
        }

        mesh.finish()
    }
}

/// Determines the join kind at each polyline vertex.
fn compute_joins(points: &[Point2], closed: bool, line_join: LineJoin) -> Result<Vec<JoinKind>> {
    let n = points.len();
    let mut joins = Vec::with_capacity(n);

    for i in 0..n {
        let is_interior = closed || (i > 0 && i < n - 1);

        if !is_interior {
            // Endpoint: perpendicular to the single adjacent segment.
            let seg_dir = if i == 0 {
                segment_direction(&points[0], &points[1])?
            } else {
                segment_direction(&points[n - 2], &points[n - 1])?
            };
            joins.push(JoinKind::Miter {
                dir: left_normal(seg_dir),
                scale: 1.0,
            });
            continue;
        }

        let prev = if i == 0 { n - 1 } else { i - 1 };
        let next = (i + 1) % n;
        let d_prev = segment_direction(&points[prev], &points[i])?;
        let d_next = segment_direction(&points[i], &points[next])?;

        let cos_angle = d_prev.dot(&d_next);
        let turn = cross(&d_prev, &d_next);
        let cos_half = f64::midpoint(1.0, cos_angle).max(0.0).sqrt();
        let miter_scale = if cos_half > f64::EPSILON {
            1.0 / cos_half
        } else {
            f64::MAX
        };
        let perp = left_normal(average_direction(d_prev, d_next));

        let straight = turn.abs() < TOLERANCE && cos_angle > 0.0;
        let fan = !straight
            && match line_join {
                LineJoin::Miter => false,
                LineJoin::Bevel | LineJoin::Round => true,
                LineJoin::Auto => miter_scale > BEVEL_THRESHOLD,
            };

        if !fan {
            let limit = if line_join == LineJoin::Miter {
                MITER_LIMIT
            } else {
                BEVEL_THRESHOLD
            };
            joins.push(JoinKind::Miter {
                dir: perp,
                scale: miter_scale.min(limit),
            });
            continue;
        }

        let inside_is_left = turn > 0.0;
        let n_prev = left_normal(d_prev);
        let n_next = left_normal(d_next);
        let outside = if line_join == LineJoin::Round {
            // Left turns sweep the normals counter-clockwise, right turns
            // clockwise; a hairpin picks the side of its inside.
            let mut sweep = turn.atan2(cos_angle);
            if inside_is_left && sweep < 0.0 {
                sweep += TAU;
            } else if !inside_is_left && sweep > 0.0 {
                sweep -= TAU;
            }
            arc_normals(n_prev, sweep)
        } else {
            vec![n_prev, n_next]
        };

        joins.push(JoinKind::Fan {
            inside_dir: perp,
            inside_scale: miter_scale.min(BEVEL_THRESHOLD),
            inside_is_left,
            outside,
        });
    }

    Ok(joins)
}

/// Returns unit vectors from `start` rotated through `sweep` radians, both
/// ends included, at most [`ROUND_STEP`] apart.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn arc_normals(start: Vector2, sweep: f64) -> Vec<Vector2> {
    let steps = ((sweep.abs() / ROUND_STEP - 1e-9).ceil() as u32).max(1);
    (0..=steps)
        .map(|k| rotate(start, sweep * f64::from(k) / f64::from(steps)))
        .collect()
}

/// Returns the normalized average of two direction vectors.
fn average_direction(a: Vector2, b: Vector2) -> Vector2 {
    let avg = a + b;
    let len = avg.norm();
    if len < f64::EPSILON {
        // Opposite directions: fall back to the first direction.
        a
    } else {
        avg / len
    }
}

/// Accumulates ribbon vertices and counter-clockwise triangles.
#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<Point2>,
    indices: Vec<[u32; 3]>,
}

impl MeshBuilder {
    #[allow(clippy::cast_possible_truncation)]
    fn vertex(&mut self, p: Point2) -> u32 {
        self.vertices.push(p);
        (self.vertices.len() - 1) as u32
    }

    /// Adds the triangle wound counter-clockwise, skipping it if degenerate.
    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        let area = triangle_area_2d(
            &self.vertices[a as usize],
            &self.vertices[b as usize],
            &self.vertices[c as usize],
        );
        if area.abs() < TOLERANCE {
            return;
        }
        self.indices
            .push(if area > 0.0 { [a, b, c] } else { [a, c, b] });
    }

    /// Fans half a disc around `center`, sweeping counter-clockwise from
    /// `center + start`.
    fn semicircle(&mut self, center: Point2, start: Vector2) {
        let hub = self.vertex(center);
        let rim: Vec<u32> = arc_normals(start, PI)
            .into_iter()
            .map(|offset| self.vertex(center + offset))
            .collect();
        for pair in rim.windows(2) {
            self.triangle(hub, pair[0], pair[1]);
        }
    }

    fn finish(self) -> Result<Polygon> {
        if self.vertices.iter().any(|p| !is_finite(p)) {
            return Err(GeolabError::InvalidInput(
                "extrusion produced a non-finite vertex".into(),
            ));
        }
        Polygon::new(self.vertices, self.indices)
    }
}
