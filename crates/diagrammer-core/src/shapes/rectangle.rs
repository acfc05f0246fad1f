//! Rectangle shape.

use super::{
    SerializableColor, ShapeId, ShapeTrait, TextMeasure, check_finite, new_shape_id,
    rect_contains_inclusive,
};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
///
/// `width` and `height` may be negative while a drag is in progress; the
/// box is normalized when the drag ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    #[serde(skip, default = "new_shape_id")]
    pub(crate) id: ShapeId,
    /// Anchor x (top-left once normalized).
    pub x: f64,
    /// Anchor y (top-left once normalized).
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "color")]
    pub stroke_color: SerializableColor,
    #[serde(rename = "fill")]
    pub fill_color: SerializableColor,
}

impl Rectangle {
    /// Create a new rectangle with black outline and no fill.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: new_shape_id(),
            x: position.x,
            y: position.y,
            width,
            height,
            stroke_color: SerializableColor::black(),
            fill_color: SerializableColor::transparent(),
        }
    }

    pub fn with_colors(mut self, stroke: SerializableColor, fill: SerializableColor) -> Self {
        self.stroke_color = stroke;
        self.fill_color = fill;
        self
    }

    /// Get the normalized box as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Fold negative extents into the position so width and height are non-negative.
    pub fn normalize(&mut self) {
        let rect = self.as_rect();
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        rect_contains_inclusive(self.as_rect(), point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    /// The pointer becomes the box center.
    fn move_to(&mut self, point: Point) {
        self.x = point.x - self.width / 2.0;
        self.y = point.y - self.height / 2.0;
    }

    fn validate(&self) -> Result<(), String> {
        check_finite("x", self.x)?;
        check_finite("y", self.y)?;
        check_finite("width", self.width)?;
        check_finite("height", self.height)
    }
}
