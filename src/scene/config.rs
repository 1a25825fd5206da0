use crate::error::{GeolabError, Result};
use crate::tessellation::FlattenParams;

/// Tunable sizes for the editing scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Radius of the knob drawn at each handle, also the pick radius.
    pub knob_radius: f64,
    /// Width of the ribbon extruded along the spline.
    pub line_width: f64,
    /// Width of the bar joining an anchor's two handles.
    pub handle_width: f64,
    /// World units per physics unit. Carried for hosts that simulate the
    /// geometry; the scene itself does not read it.
    pub physics_scale: f64,
    /// Rim vertex count of each knob.
    pub circle_segments: usize,
    /// Spline flattening quality.
    pub flatten: FlattenParams,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            knob_radius: 15.0,
            line_width: 50.0,
            handle_width: 3.0,
            physics_scale: 50.0,
            circle_segments: 32,
            flatten: FlattenParams::default(),
        }
    }
}

impl SceneConfig {
    #[must_use]
    pub fn with_knob_radius(mut self, knob_radius: f64) -> Self {
        self.knob_radius = knob_radius;
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub fn with_handle_width(mut self, handle_width: f64) -> Self {
        self.handle_width = handle_width;
        self
    }

    #[must_use]
    pub fn with_physics_scale(mut self, physics_scale: f64) -> Self {
        self.physics_scale = physics_scale;
        self
    }

    #[must_use]
    pub fn with_circle_segments(mut self, circle_segments: usize) -> Self {
        self.circle_segments = circle_segments;
        self
    }

    #[must_use]
    pub fn with_flatten(mut self, flatten: FlattenParams) -> Self {
        self.flatten = flatten;
        self
    }

    /// Checks every size for a positive finite value.
    ///
    /// # Errors
    ///
    /// Returns `GeolabError::InvalidInput` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("knob_radius", self.knob_radius),
            ("line_width", self.line_width),
            ("handle_width", self.handle_width),
            ("physics_scale", self.physics_scale),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeolabError::InvalidInput(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        self.flatten.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scene_constants() {
        let config = SceneConfig::default();
        assert_eq!(config.knob_radius, 15.0);
        assert_eq!(config.line_width, 50.0);
        assert_eq!(config.handle_width, 3.0);
        assert_eq!(config.physics_scale, 50.0);
        assert_eq!(config.circle_segments, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_override_fields() {
        let config = SceneConfig::default()
            .with_knob_radius(8.0)
            .with_line_width(20.0)
            .with_handle_width(1.5)
            .with_circle_segments(64);
        assert_eq!(config.knob_radius, 8.0);
        assert_eq!(config.line_width, 20.0);
        assert_eq!(config.handle_width, 1.5);
        assert_eq!(config.circle_segments, 64);
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        assert!(SceneConfig::default().with_line_width(0.0).validate().is_err());
        assert!(SceneConfig::default().with_knob_radius(-1.0).validate().is_err());
        assert!(SceneConfig::default()
            .with_handle_width(f64::NAN)
            .validate()
            .is_err());
        let flatten = FlattenParams {
            tolerance: 0.0,
            max_depth: 4,
        };
        assert!(SceneConfig::default().with_flatten(flatten).validate().is_err());
    }
}
