//! Editor modes and the current drawing settings.

use crate::shapes::{Circle, Rectangle, SerializableColor, Shape};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Interaction mode of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    /// Pointer-down creates a shape of the pending kind.
    #[default]
    Draw,
    /// Pointer-down selects, pointer-drag moves.
    Select,
    /// Dragging the selected shape's resize handle.
    Resize,
    /// Next pointer-down places a text label.
    TextEntry,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Draw => "Draw",
            Mode::Select => "Select",
            Mode::Resize => "Resize",
            Mode::TextEntry => "Text",
        }
    }
}

/// Shape kind created by the Draw mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PendingShapeKind {
    #[default]
    Circle,
    Rectangle,
}

impl PendingShapeKind {
    /// Zero-size placeholder anchored at `point`.
    pub fn placeholder(
        &self,
        point: Point,
        stroke: SerializableColor,
        fill: SerializableColor,
    ) -> Shape {
        match self {
            PendingShapeKind::Circle => {
                Shape::Circle(Circle::new(point, 0.0).with_colors(stroke, fill))
            }
            PendingShapeKind::Rectangle => {
                Shape::Rectangle(Rectangle::new(point, 0.0, 0.0).with_colors(stroke, fill))
            }
        }
    }
}

/// Mode and drawing settings, owned by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub mode: Mode,
    pub stroke_color: SerializableColor,
    pub fill_color: SerializableColor,
    pub pending_kind: PendingShapeKind,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            mode: Mode::Draw,
            stroke_color: SerializableColor::black(),
            fill_color: SerializableColor::transparent(),
            pending_kind: PendingShapeKind::Circle,
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly while a handle drag is in progress.
    pub fn resize_active(&self) -> bool {
        self.mode == Mode::Resize
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("Mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = EditorState::default();
        assert_eq!(state.mode, Mode::Draw);
        assert_eq!(state.stroke_color, SerializableColor::black());
        assert_eq!(state.fill_color, SerializableColor::transparent());
        assert_eq!(state.pending_kind, PendingShapeKind::Circle);
        assert!(!state.resize_active());
    }

    #[test]
    fn test_resize_active_tracks_mode() {
        let mut state = EditorState::default();
        state.set_mode(Mode::Resize);
        assert!(state.resize_active());
        state.set_mode(Mode::Select);
        assert!(!state.resize_active());
    }

    #[test]
    fn test_placeholder_is_zero_sized() {
        let red = SerializableColor::new(255, 0, 0, 255);
        let shape = PendingShapeKind::Rectangle.placeholder(
            Point::new(5.0, 6.0),
            red,
            SerializableColor::transparent(),
        );
        let Shape::Rectangle(rect) = shape else { panic!("expected rectangle") };
        assert!((rect.width).abs() < f64::EPSILON);
        assert!((rect.x - 5.0).abs() < f64::EPSILON);
        assert_eq!(rect.stroke_color, red);
    }
}
