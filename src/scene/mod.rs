//! Interactive spline editing scene.
//!
//! The scene owns a closed spline and a star outline, derives renderable
//! polygons from them, and lets a pointer drag the spline's handles. Drawing
//! and input are abstracted behind [`Renderer`] and [`PointerInput`] so the
//! scene runs headless.

mod config;
mod game_scene;
mod input;
pub mod presets;
mod render;

pub use config::SceneConfig;
pub use game_scene::{GeometryScene, SceneGeometry};
pub use input::{PointerInput, PointerState, Viewport};
pub use render::{Color, Renderer};
