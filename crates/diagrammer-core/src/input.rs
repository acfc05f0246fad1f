//! Pointer events in surface-local coordinates.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event, already translated so the surface's top-left is the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => *position,
        }
    }

    /// Whether the editor reacts to this event. Only the primary button edits.
    pub fn is_primary(&self) -> bool {
        match self {
            PointerEvent::Down { button, .. } | PointerEvent::Up { button, .. } => {
                *button == MouseButton::Left
            }
            PointerEvent::Move { .. } => true,
        }
    }
}

/// Translate a window position into surface-local coordinates.
pub fn to_surface(window_position: Point, surface_origin: Point) -> Point {
    Point::new(
        window_position.x - surface_origin.x,
        window_position.y - surface_origin.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_surface() {
        let p = to_surface(Point::new(120.0, 90.0), Point::new(100.0, 40.0));
        assert_eq!(p, Point::new(20.0, 50.0));
    }

    #[test]
    fn test_primary_button() {
        let down = PointerEvent::Down { position: Point::ZERO, button: MouseButton::Right };
        assert!(!down.is_primary());
        let moved = PointerEvent::Move { position: Point::new(1.0, 2.0) };
        assert!(moved.is_primary());
        assert_eq!(moved.position(), Point::new(1.0, 2.0));
    }
}
