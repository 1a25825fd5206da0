use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::geometry::{Polygon, Polyline, Spline};
use crate::math::{Point2, TOLERANCE};
use crate::operations::creation::MakeCircle;
use crate::tessellation::{
    EarClipTriangulator, FlattenSpline, StrokeStyle, TessellateStroke, Triangulate,
};

use super::presets::{self, CIRCLE, STAR};
use super::{Color, PointerInput, Renderer, SceneConfig, Viewport};

/// Everything the scene draws, derived from its spline and star.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGeometry {
    /// The flattened spline.
    pub path: Polyline,
    /// The spline extruded to `line_width`.
    pub ribbon: Polygon,
    /// One bar per anchor joining its incoming and outgoing handles.
    /// Empty when the two handles coincide.
    pub handles: Vec<Polygon>,
    /// Two knobs per anchor: incoming handle, then outgoing handle.
    pub knobs: Vec<Polygon>,
    /// The triangulated star.
    pub star: Polygon,
}

/// An editable spline with draggable handles and a filled star.
///
/// Geometry is rebuilt from scratch whenever the spline changes. A rebuild
/// step that fails leaves the previous output of that step in place, so the
/// scene always has something valid to draw.
#[derive(Debug, Clone)]
pub struct GeometryScene {
    config: SceneConfig,
    viewport: Viewport,
    spline: Spline,
    star: Polyline,
    geometry: SceneGeometry,
    selected: Option<isize>,
}

impl GeometryScene {
    /// Creates the scene with the built-in circle spline and star.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidInput` if `config` is invalid, or the
    /// first error of the initial [`GeometryScene::rebuild_geometry`].
    pub fn new(config: SceneConfig, viewport: Viewport) -> Result<Self> {
        let spline = Spline::from_points(&presets::to_points(&CIRCLE), true)?;
        Self::with_spline(config, viewport, spline)
    }

    /// Creates the scene around a caller-provided spline.
    ///
    /// # Errors
    ///
    /// Same as [`GeometryScene::new`].
    pub fn with_spline(config: SceneConfig, viewport: Viewport, spline: Spline) -> Result<Self> {
        config.validate()?;
        let mut scene = Self {
            config,
            viewport,
            spline,
            star: Polyline::new(presets::to_points(&STAR), true),
            geometry: SceneGeometry::default(),
            selected: None,
        };
        scene.rebuild_geometry()?;
        Ok(scene)
    }

    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn spline(&self) -> &Spline {
        &self.spline
    }

    /// Mutable access to the spline. Call
    /// [`GeometryScene::rebuild_geometry`] afterwards to refresh the output.
    pub fn spline_mut(&mut self) -> &mut Spline {
        &mut self.spline
    }

    /// The star outline as given, before it is reversed for filling.
    #[must_use]
    pub fn star(&self) -> &Polyline {
        &self.star
    }

    /// Replaces the star outline. Like the built-in star it is expected to
    /// be wound clockwise.
    pub fn set_star(&mut self, star: Polyline) {
        self.star = star;
    }

    #[must_use]
    pub fn geometry(&self) -> &SceneGeometry {
        &self.geometry
    }

    /// Tangent index of the handle being dragged, if any.
    #[must_use]
    pub fn selected_handle(&self) -> Option<isize> {
        self.selected
    }

    /// Recomputes the ribbon, the handles and knobs, and the star.
    ///
    /// The three steps run independently. Each successful step replaces its
    /// part of the geometry; a failing step keeps the previous part.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any step.
    pub fn rebuild_geometry(&mut self) -> Result<()> {
        let mut first_error = None;

        match self.build_ribbon() {
            Ok((path, ribbon)) => {
                self.geometry.path = path;
                self.geometry.ribbon = ribbon;
            }
            Err(e) => {
                warn!(error = %e, "spline ribbon rebuild failed, keeping previous ribbon");
                first_error.get_or_insert(e);
            }
        }

        match self.build_handles() {
            Ok((handles, knobs)) => {
                self.geometry.handles = handles;
                self.geometry.knobs = knobs;
            }
            Err(e) => {
                warn!(error = %e, "handle rebuild failed, keeping previous handles");
                first_error.get_or_insert(e);
            }
        }

        match self.build_star() {
            Ok(star) => self.geometry.star = star,
            Err(e) => {
                warn!(error = %e, "star triangulation failed, keeping previous star");
                first_error.get_or_insert(e);
            }
        }

        debug!(
            path_points = self.geometry.path.len(),
            ribbon_triangles = self.geometry.ribbon.triangle_count(),
            handles = self.geometry.handles.len(),
            knobs = self.geometry.knobs.len(),
            star_triangles = self.geometry.star.triangle_count(),
            "rebuilt scene geometry"
        );

        first_error.map_or(Ok(()), Err)
    }

    /// Processes one frame of pointer input.
    ///
    /// A press picks the first handle within `knob_radius` of the pointer,
    /// checking each anchor's incoming handle before its outgoing one. While
    /// the button is held the picked handle follows the pointer. Release
    /// drops it. Rebuild errors are logged and do not interrupt the frame.
    ///
    /// Returns `true` if the geometry was rebuilt.
    pub fn update(&mut self, input: &impl PointerInput) -> bool {
        let world = self.viewport.screen_to_world(input.position());

        if input.did_press() {
            self.selected = self.pick_handle(&world);
            if let Some(index) = self.selected {
                trace!(index, x = world.x, y = world.y, "picked handle");
            }
        }

        let Some(index) = self.selected else {
            return false;
        };

        if input.is_down() {
            if let Err(e) = self.spline.set_tangent(index, world) {
                warn!(error = %e, index, "cannot move handle");
                return false;
            }
            trace!(index, x = world.x, y = world.y, "dragging handle");
            self.rebuild_logged();
            return true;
        }

        if input.did_release() {
            trace!(index, "released handle");
            self.selected = None;
            self.rebuild_logged();
            return true;
        }

        false
    }

    /// Draws the scene: path outline and ribbon in black, handle bars in
    /// white, knobs in red, the star in blue.
    pub fn render(&self, renderer: &mut impl Renderer) {
        let offset = self.viewport.center();
        let geometry = &self.geometry;

        renderer.outline(&geometry.path, offset, Color::BLACK);
        renderer.fill(&geometry.ribbon, offset, Color::BLACK);
        for handle in &geometry.handles {
            renderer.fill(handle, offset, Color::WHITE);
        }
        for knob in &geometry.knobs {
            renderer.fill(knob, offset, Color::RED);
        }
        renderer.fill(&geometry.star, offset, Color::BLUE);
    }

    fn rebuild_logged(&mut self) {
        // Failures were already logged per step; the frame carries on.
        let _ = self.rebuild_geometry();
    }

    fn pick_handle(&self, world: &Point2) -> Option<isize> {
        let radius = self.config.knob_radius;
        (0..self.spline.size())
            .flat_map(|i| [Spline::incoming_index(i), Spline::outgoing_index(i)])
            .find(|&index| {
                self.spline
                    .tangent(index)
                    .is_ok_and(|handle| (handle - world).norm() < radius)
            })
    }

    fn build_ribbon(&self) -> Result<(Polyline, Polygon)> {
        let path = FlattenSpline::new(&self.spline, self.config.flatten).execute()?;
        let style = StrokeStyle::new(self.config.line_width)?;
        let ribbon = TessellateStroke::new(&path, style).execute()?;
        Ok((path, ribbon))
    }

    fn build_handles(&self) -> Result<(Vec<Polygon>, Vec<Polygon>)> {
        let n = self.spline.size();
        let style = StrokeStyle::new(self.config.handle_width)?;
        let mut handles = Vec::with_capacity(n);
        let mut knobs = Vec::with_capacity(2 * n);

        for i in 0..n {
            let incoming = self.spline.incoming_handle(i)?;
            let outgoing = self.spline.outgoing_handle(i)?;

            if (outgoing - incoming).norm() <= TOLERANCE {
                handles.push(Polygon::default());
            } else {
                let bar = Spline::line(incoming, outgoing);
                let path = FlattenSpline::new(&bar, self.config.flatten).execute()?;
                handles.push(TessellateStroke::new(&path, style).execute()?);
            }

            for center in [incoming, outgoing] {
                knobs.push(
                    MakeCircle::new(center, self.config.knob_radius)
                        .with_segments(self.config.circle_segments)
                        .execute()?,
                );
            }
        }

        Ok((handles, knobs))
    }

    fn build_star(&self) -> Result<Polygon> {
        EarClipTriangulator::new().triangulate(&self.star.reversed())
    }
}
