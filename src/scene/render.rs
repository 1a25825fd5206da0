use crate::geometry::{Polygon, Polyline};
use crate::math::Vector2;

/// An RGBA color with `f32` components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    /// Opaque color from RGB components.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Draw target for scene geometry.
///
/// Coordinates are world units; `offset` is added to every vertex before
/// drawing.
pub trait Renderer {
    /// Fills every triangle of `polygon`.
    fn fill(&mut self, polygon: &Polygon, offset: Vector2, color: Color);

    /// Strokes `path` with a hairline.
    fn outline(&mut self, path: &Polyline, offset: Vector2, color: Color);
}
