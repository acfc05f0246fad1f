//! Text label shape and text measurement.

use super::{
    SerializableColor, ShapeId, ShapeTrait, check_finite, new_shape_id, rect_contains_inclusive,
};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Font size labels are laid out with.
pub const TEXT_FONT_SIZE: f64 = 16.0;

/// Height of the hit box above the baseline.
pub const TEXT_ASCENT: f64 = 16.0;

/// Measures the advance width of a label's text.
///
/// The renderer owns the real font stack and provides the accurate
/// implementation; [`ApproximateTextMeasure`] is used where no fonts are
/// loaded.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f64;
}

/// Fixed advance per character.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateTextMeasure {
    pub char_width: f64,
}

impl Default for ApproximateTextMeasure {
    fn default() -> Self {
        Self {
            char_width: TEXT_FONT_SIZE * 0.55,
        }
    }
}

impl TextMeasure for ApproximateTextMeasure {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

/// A single-line text label anchored at its baseline-left point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLabel {
    #[serde(skip, default = "new_shape_id")]
    pub(crate) id: ShapeId,
    /// Left edge.
    pub x: f64,
    /// Baseline.
    pub y: f64,
    pub text: String,
    #[serde(rename = "color")]
    pub stroke_color: SerializableColor,
}

impl TextLabel {
    pub fn new(position: Point, text: String) -> Self {
        Self {
            id: new_shape_id(),
            x: position.x,
            y: position.y,
            text,
            stroke_color: SerializableColor::black(),
        }
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.stroke_color = color;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl ShapeTrait for TextLabel {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        let width = measure.text_width(&self.text).max(0.0);
        Rect::new(self.x, self.y - TEXT_ASCENT, self.x + width, self.y)
    }

    fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool {
        rect_contains_inclusive(self.bounds(measure), point)
    }

    /// Labels are drawn as glyph runs, not paths.
    fn to_path(&self) -> BezPath {
        BezPath::new()
    }

    fn move_to(&mut self, point: Point) {
        self.x = point.x;
        self.y = point.y;
    }

    fn validate(&self) -> Result<(), String> {
        check_finite("x", self.x)?;
        check_finite("y", self.y)?;
        if self.text.trim().is_empty() {
            return Err("text label must not be blank".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_box_sits_above_baseline() {
        let measure = ApproximateTextMeasure { char_width: 8.0 };
        let label = TextLabel::new(Point::new(10.0, 50.0), "hello".into());
        assert!(label.hit_test(Point::new(10.0, 50.0), &measure));
        assert!(label.hit_test(Point::new(50.0, 34.0), &measure));
        assert!(!label.hit_test(Point::new(25.0, 55.0), &measure));
        assert!(!label.hit_test(Point::new(51.0, 40.0), &measure));
    }

    #[test]
    fn test_approximate_measure() {
        let measure = ApproximateTextMeasure { char_width: 10.0 };
        assert!((measure.text_width("abcd") - 40.0).abs() < f64::EPSILON);
        assert!((measure.text_width("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_blank_text() {
        let label = TextLabel::new(Point::new(0.0, 0.0), "   ".into());
        assert!(label.validate().is_err());
        let label = TextLabel::new(Point::new(0.0, 0.0), "ok".into());
        assert!(label.validate().is_ok());
    }

    #[test]
    fn test_serialized_fields() {
        let label = TextLabel::new(Point::new(1.0, 2.0), "hi".into());
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["text"], "hi");
        assert_eq!(json["color"], "#000000");
        assert!(json.get("fill").is_none());
    }
}
