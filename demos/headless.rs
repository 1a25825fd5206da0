//! Headless run of the spline editing scene.
//!
//! Builds the default scene, drags the first anchor's outgoing handle across
//! a few frames and prints what a renderer would have been asked to draw.
//!
//! ```text
//! cargo run --example headless
//! RUST_LOG=geolab=trace cargo run --example headless
//! ```

use geolab::geometry::{Polygon, Polyline};
use geolab::math::{Point2, Vector2};
use geolab::scene::{Color, GeometryScene, PointerState, Renderer, SceneConfig, Viewport};
use geolab::Result;

/// Tallies draw calls per color.
#[derive(Default)]
struct Summary {
    outlines: usize,
    fills: Vec<(Color, usize)>,
}

impl Renderer for Summary {
    fn fill(&mut self, polygon: &Polygon, _offset: Vector2, color: Color) {
        match self.fills.iter_mut().find(|(c, _)| *c == color) {
            Some((_, triangles)) => *triangles += polygon.triangle_count(),
            None => self.fills.push((color, polygon.triangle_count())),
        }
    }

    fn outline(&mut self, _path: &Polyline, _offset: Vector2, _color: Color) {
        self.outlines += 1;
    }
}

fn color_name(color: Color) -> &'static str {
    if color == Color::BLACK {
        "black"
    } else if color == Color::WHITE {
        "white"
    } else if color == Color::RED {
        "red"
    } else if color == Color::BLUE {
        "blue"
    } else {
        "other"
    }
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("geolab=debug".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let viewport = Viewport::with_height(720.0, 16.0 / 9.0);
    let mut scene = GeometryScene::new(SceneConfig::default(), viewport)?;

    let grab = scene.spline().outgoing_handle(0)?;
    let frames = [
        PointerState::press(viewport.world_to_screen(grab)),
        PointerState::drag(viewport.world_to_screen(grab + Vector2::new(20.0, 10.0))),
        PointerState::drag(viewport.world_to_screen(grab + Vector2::new(60.0, 40.0))),
        PointerState::release(viewport.world_to_screen(grab + Vector2::new(60.0, 40.0))),
    ];
    for (frame, input) in frames.iter().enumerate() {
        let rebuilt = scene.update(input);
        println!(
            "frame {frame}: rebuilt={rebuilt} selected={:?}",
            scene.selected_handle()
        );
    }

    let moved: Point2 = scene.spline().outgoing_handle(0)?;
    println!("outgoing handle 0: ({:.1}, {:.1}) -> ({:.1}, {:.1})", grab.x, grab.y, moved.x, moved.y);

    let mut summary = Summary::default();
    scene.render(&mut summary);
    println!("outlines: {}", summary.outlines);
    for (color, triangles) in &summary.fills {
        println!("{:>5} fill: {triangles} triangles", color_name(*color));
    }

    Ok(())
}
