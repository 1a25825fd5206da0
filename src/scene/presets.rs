//! Built-in shapes of the editing scene.

use crate::math::Point2;

/// A circle of radius 200 as four cubic arcs, in the interleaved
/// `anchor, out, in, anchor, ...` layout. The last anchor repeats the first.
pub const CIRCLE: [(f64, f64); 13] = [
    (0.0, 200.0),
    (120.0, 200.0),
    (200.0, 120.0),
    (200.0, 0.0),
    (200.0, -120.0),
    (120.0, -200.0),
    (0.0, -200.0),
    (-120.0, -200.0),
    (-200.0, -120.0),
    (-200.0, 0.0),
    (-200.0, 120.0),
    (-120.0, 200.0),
    (0.0, 200.0),
];

/// A five-pointed star outline, wound clockwise.
pub const STAR: [(f64, f64); 10] = [
    (0.0, 50.0),
    (10.75, 17.0),
    (47.0, 17.0),
    (17.88, -4.88),
    (29.5, -40.5),
    (0.0, -18.33),
    (-29.5, -40.5),
    (-17.88, -4.88),
    (-47.0, 17.0),
    (-10.75, 17.0),
];

/// Converts a coordinate table into points.
#[must_use]
pub fn to_points(coords: &[(f64, f64)]) -> Vec<Point2> {
    coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}
