use crate::error::{GeolabError, Result};

/// How consecutive segments are joined at interior vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Always miter, with the miter length clamped.
    Miter,
    /// Always bevel.
    Bevel,
    /// Circular fan on the outside of the turn.
    Round,
    /// Miter, falling back to bevel at sharp angles.
    #[default]
    Auto,
}

/// How the ends of an open path are finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Square end flush with the endpoint.
    #[default]
    Butt,
    /// Square end extended by half the width.
    Square,
    /// Semicircular end.
    Round,
}

/// Style parameters for polyline stroke tessellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    width: f64,
    line_join: LineJoin,
    line_cap: LineCap,
}

impl StrokeStyle {
    /// Creates a new stroke style with the default join and cap.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidInput` if `width` is not positive.
    pub fn new(width: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(GeolabError::InvalidInput(format!(
                "stroke width must be positive, got {width}"
            )));
        }
        Ok(Self {
            width,
            line_join: LineJoin::default(),
            line_cap: LineCap::default(),
        })
    }

    /// Sets the line join.
    #[must_use]
    pub fn with_join(mut self, line_join: LineJoin) -> Self {
        self.line_join = line_join;
        self
    }

    /// Sets the line cap.
    #[must_use]
    pub fn with_cap(mut self, line_cap: LineCap) -> Self {
        self.line_cap = line_cap;
        self
    }

    /// Returns the stroke width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns half the stroke width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Returns the line join.
    #[must_use]
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    /// Returns the line cap.
    #[must_use]
    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }
}
