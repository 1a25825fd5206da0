use std::f64::consts::TAU;

use crate::error::{GeolabError, Result};
use crate::math::{is_finite, Point2, Vector2, TOLERANCE};

/// A piecewise-cubic Bézier spline in the plane.
///
/// Every anchor owns two handles stored as absolute positions. Tangent `2i`
/// is the outgoing handle of anchor `i` and tangent `2i - 1` (modulo
/// `2 * size()`) is its incoming handle, so segment `i` is the cubic
///
/// `anchor[i], tangent[2i], tangent[2i + 1], anchor[(i + 1) % n]`.
///
/// An open spline has `n - 1` segments and its free-end handles (incoming of
/// anchor 0, outgoing of the last anchor) sit on their anchors. A closed
/// spline has `n` segments, the last one wrapping back to anchor 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spline {
    anchors: Vec<Point2>,
    tangents: Vec<Point2>,
    closed: bool,
}

impl Spline {
    /// Creates an empty, open spline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a spline from interleaved points (see [`Spline::set`]) and
    /// applies the closed flag.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidInput` if the point layout is invalid.
    pub fn from_points(points: &[Point2], closed: bool) -> Result<Self> {
        let mut spline = Self::new();
        spline.set(points)?;
        spline.set_closed(closed);
        Ok(spline)
    }

    /// Creates a closed circular spline with `anchors` evenly spaced anchors,
    /// starting at angle zero and running counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidInput` if `radius` is not positive or
    /// fewer than 2 anchors are requested.
    #[allow(clippy::cast_precision_loss)]
    pub fn circle(center: Point2, radius: f64, anchors: usize) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeolabError::InvalidInput(format!(
                "spline circle radius must be positive, got {radius}"
            )));
        }
        if anchors < 2 {
            return Err(GeolabError::InvalidInput(format!(
                "spline circle needs at least 2 anchors, got {anchors}"
            )));
        }

        let step = TAU / anchors as f64;
        // Handle length for a cubic approximating an arc of `step` radians.
        let kappa = 4.0 / 3.0 * (step / 4.0).tan() * radius;

        let frame = |i: usize| {
            let (s, c) = (step * i as f64).sin_cos();
            (center + Vector2::new(c, s) * radius, Vector2::new(-s, c))
        };

        let mut anchor_points = Vec::with_capacity(anchors);
        let mut tangents = Vec::with_capacity(anchors * 2);
        for i in 0..anchors {
            let (anchor, dir) = frame(i);
            let (next, next_dir) = frame((i + 1) % anchors);
            anchor_points.push(anchor);
            tangents.push(anchor + dir * kappa);
            tangents.push(next - next_dir * kappa);
        }

        Ok(Self {
            anchors: anchor_points,
            tangents,
            closed: true,
        })
    }

    /// Creates an open, straight spline from `start` to `end`.
    #[must_use]
    pub fn line(start: Point2, end: Point2) -> Self {
        Self {
            anchors: vec![start, end],
            tangents: vec![start, end, end, start],
            closed: false,
        }
    }

    /// Replaces all anchors and handles.
    ///
    /// `points` uses the interleaved layout `anchor, out, in, anchor, ...,
    /// anchor`: each anchor is followed by the two handles of the segment
    /// that starts at it, so `points.len()` must be `3k + 1` with `k >= 1`.
    /// The closed flag is kept; if it is set, a trailing anchor that
    /// coincides with the first is folded into it.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidInput` if the length does not match the
    /// layout or a coordinate is not finite.
    pub fn set(&mut self, points: &[Point2]) -> Result<()> {
        if points.len() < 4 || (points.len() - 1) % 3 != 0 {
            return Err(GeolabError::InvalidInput(format!(
                "spline needs 3k + 1 interleaved points, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !is_finite(p)) {
            return Err(GeolabError::InvalidInput(format!(
                "spline point {i} is not finite"
            )));
        }

        let segments = (points.len() - 1) / 3;
        let mut anchors = Vec::with_capacity(segments + 1);
        let mut tangents = Vec::with_capacity(2 * (segments + 1));
        for group in points.chunks(3) {
            anchors.push(group[0]);
            if let [_, out, incoming] = group {
                tangents.push(*out);
                tangents.push(*incoming);
            }
        }
        let last = anchors[segments];
        tangents.push(last);
        tangents.push(anchors[0]);

        let closed = self.closed;
        self.anchors = anchors;
        self.tangents = tangents;
        self.closed = false;
        self.set_closed(closed);
        Ok(())
    }

    /// Sets whether the last anchor connects back to the first.
    ///
    /// Closing a spline whose last anchor coincides with the first folds the
    /// duplicate away. Opening a closed spline appends a copy of the first
    /// anchor so the shape is unchanged.
    pub fn set_closed(&mut self, closed: bool) {
        if closed == self.closed {
            return;
        }
        let n = self.anchors.len();
        if closed {
            if n > 2 && (self.anchors[n - 1] - self.anchors[0]).norm() < TOLERANCE {
                // The incoming handle of the dropped anchor sits at index
                // 2n - 3, which is exactly where the incoming handle of
                // anchor 0 lives once the spline has n - 1 anchors.
                self.anchors.truncate(n - 1);
                self.tangents.truncate(2 * (n - 1));
            }
        } else if n > 0 {
            let first = self.anchors[0];
            self.anchors.push(first);
            self.tangents.push(first);
            self.tangents.push(first);
        }
        self.closed = closed;
    }

    /// Returns whether the spline wraps back to its first anchor.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the number of anchors.
    #[must_use]
    pub fn size(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if the spline has no anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Returns the number of cubic segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        match (self.anchors.len(), self.closed) {
            (0, _) => 0,
            (n, true) => n,
            (n, false) => n - 1,
        }
    }

    /// Returns all anchors.
    #[must_use]
    pub fn anchors(&self) -> &[Point2] {
        &self.anchors
    }

    /// Returns all handles, indexed as described on [`Spline`].
    #[must_use]
    pub fn tangents(&self) -> &[Point2] {
        &self.tangents
    }

    /// Returns anchor `i`.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidState` on an empty spline and
    /// `GeolabError::InvalidInput` if `i` is out of range.
    pub fn anchor(&self, i: usize) -> Result<Point2> {
        self.check_anchor(i)?;
        Ok(self.anchors[i])
    }

    /// Returns tangent `index`, taken modulo `2 * size()`, so `-1` and
    /// `2n - 1` both name the incoming handle of anchor 0.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidState` if the spline is empty.
    pub fn tangent(&self, index: isize) -> Result<Point2> {
        let slot = self.tangent_slot(index)?;
        Ok(self.tangents[slot])
    }

    /// Returns the incoming handle of anchor `i` (tangent `2i - 1`).
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidState` if the spline is empty.
    pub fn incoming_handle(&self, i: usize) -> Result<Point2> {
        self.tangent(Self::incoming_index(i))
    }

    /// Returns the outgoing handle of anchor `i` (tangent `2i`).
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidState` if the spline is empty.
    pub fn outgoing_handle(&self, i: usize) -> Result<Point2> {
        self.tangent(Self::outgoing_index(i))
    }

    /// Tangent index of the incoming handle of anchor `i`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn incoming_index(i: usize) -> isize {
        2 * i as isize - 1
    }

    /// Tangent index of the outgoing handle of anchor `i`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn outgoing_index(i: usize) -> isize {
        2 * i as isize
    }

    /// Moves anchor `i` to `position`, carrying both of its handles along.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidState` on an empty spline and
    /// `GeolabError::InvalidInput` if `i` is out of range or `position`
    /// is not finite.
    pub fn set_anchor(&mut self, i: usize, position: Point2) -> Result<()> {
        self.check_anchor(i)?;
        check_finite(&position)?;
        let delta = position - self.anchors[i];
        self.anchors[i] = position;
        let out = self.tangent_slot(Self::outgoing_index(i))?;
        let incoming = self.tangent_slot(Self::incoming_index(i))?;
        self.tangents[out] += delta;
        self.tangents[incoming] += delta;
        Ok(())
    }

    /// Moves tangent `index` (modulo `2 * size()`) to `position`.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidState` on an empty spline and
    /// `GeolabError::InvalidInput` if `position` is not finite.
    pub fn set_tangent(&mut self, index: isize, position: Point2) -> Result<()> {
        let slot = self.tangent_slot(index)?;
        check_finite(&position)?;
        self.tangents[slot] = position;
        Ok(())
    }

    /// Returns the four control points of segment `i`.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidState` on an empty spline and
    /// `GeolabError::InvalidInput` if `i >= segment_count()`.
    pub fn segment(&self, i: usize) -> Result<[Point2; 4]> {
        if self.is_empty() {
            return Err(GeolabError::InvalidState("spline has no anchors".into()));
        }
        if i >= self.segment_count() {
            return Err(GeolabError::InvalidInput(format!(
                "segment {i} out of range (0..{})",
                self.segment_count()
            )));
        }
        let n = self.anchors.len();
        Ok([
            self.anchors[i],
            self.tangents[2 * i],
            self.tangents[2 * i + 1],
            self.anchors[(i + 1) % n],
        ])
    }

    /// Evaluates segment `i` at parameter `t` in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Spline::segment`], or
    /// `GeolabError::InvalidInput` if `t` is outside `[0, 1]`.
    pub fn point_at(&self, i: usize, t: f64) -> Result<Point2> {
        if !(0.0..=1.0).contains(&t) {
            return Err(GeolabError::InvalidInput(format!(
                "segment parameter {t} is outside [0, 1]"
            )));
        }
        let [p0, p1, p2, p3] = self.segment(i)?;
        let p01 = p0.lerp(&p1, t);
        let p12 = p1.lerp(&p2, t);
        let p23 = p2.lerp(&p3, t);
        let p012 = p01.lerp(&p12, t);
        let p123 = p12.lerp(&p23, t);
        Ok(p012.lerp(&p123, t))
    }

    fn check_anchor(&self, i: usize) -> Result<()> {
        if self.is_empty() {
            return Err(GeolabError::InvalidState("spline has no anchors".into()));
        }
        if i >= self.anchors.len() {
            return Err(GeolabError::InvalidInput(format!(
                "anchor {i} out of range (0..{})",
                self.anchors.len()
            )));
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn tangent_slot(&self, index: isize) -> Result<usize> {
        if self.tangents.is_empty() {
            return Err(GeolabError::InvalidState(
                "tangent query on an empty spline".into(),
            ));
        }
        Ok(index.rem_euclid(self.tangents.len() as isize) as usize)
    }
}

fn check_finite(p: &Point2) -> Result<()> {
    if is_finite(p) {
        Ok(())
    } else {
        Err(GeolabError::InvalidInput(format!(
            "position ({}, {}) is not finite",
            p.x, p.y
        )))
    }
}
