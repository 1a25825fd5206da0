use crate::math::{Point2, Vector2};

/// Per-frame pointer state as seen by the scene.
///
/// Positions are screen coordinates: origin at the top-left, y down.
pub trait PointerInput {
    fn position(&self) -> Point2;

    /// The button went down this frame.
    fn did_press(&self) -> bool;

    /// The button is held this frame.
    fn is_down(&self) -> bool;

    /// The button went up this frame.
    fn did_release(&self) -> bool;
}

/// A plain snapshot of pointer state, for hosts that poll input themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub position: Point2,
    pub pressed: bool,
    pub down: bool,
    pub released: bool,
}

impl PointerState {
    /// Pointer hovering at `position` with the button up.
    #[must_use]
    pub fn hover(position: Point2) -> Self {
        Self {
            position,
            pressed: false,
            down: false,
            released: false,
        }
    }

    /// Button going down at `position`.
    #[must_use]
    pub fn press(position: Point2) -> Self {
        Self {
            pressed: true,
            down: true,
            ..Self::hover(position)
        }
    }

    /// Button held at `position`.
    #[must_use]
    pub fn drag(position: Point2) -> Self {
        Self {
            down: true,
            ..Self::hover(position)
        }
    }

    /// Button going up at `position`.
    #[must_use]
    pub fn release(position: Point2) -> Self {
        Self {
            released: true,
            ..Self::hover(position)
        }
    }
}

impl PointerInput for PointerState {
    fn position(&self) -> Point2 {
        self.position
    }

    fn did_press(&self) -> bool {
        self.pressed
    }

    fn is_down(&self) -> bool {
        self.down
    }

    fn did_release(&self) -> bool {
        self.released
    }
}

/// Screen dimensions and the mapping between screen and world space.
///
/// World space is y-up with its origin at the screen center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Vector2,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Vector2::new(width, height),
        }
    }

    /// Locks the height and derives the width from `aspect` (width / height).
    #[must_use]
    pub fn with_height(height: f64, aspect: f64) -> Self {
        Self::new(height * aspect, height)
    }

    /// Offset that moves world coordinates into draw coordinates.
    #[must_use]
    pub fn center(&self) -> Vector2 {
        self.size / 2.0
    }

    #[must_use]
    pub fn screen_to_world(&self, screen: Point2) -> Point2 {
        Point2::new(screen.x - self.size.x / 2.0, self.size.y / 2.0 - screen.y)
    }

    #[must_use]
    pub fn world_to_screen(&self, world: Point2) -> Point2 {
        Point2::new(world.x + self.size.x / 2.0, self.size.y / 2.0 - world.y)
    }
}
