//! Circle shape.

use super::{SerializableColor, ShapeId, ShapeTrait, TextMeasure, check_finite, new_shape_id};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle given by its center and radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    #[serde(skip, default = "new_shape_id")]
    pub(crate) id: ShapeId,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    pub radius: f64,
    #[serde(rename = "color")]
    pub stroke_color: SerializableColor,
    #[serde(rename = "fill")]
    pub fill_color: SerializableColor,
}

impl Circle {
    /// Create a new circle with black outline and no fill.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: new_shape_id(),
            x: center.x,
            y: center.y,
            radius,
            stroke_color: SerializableColor::black(),
            fill_color: SerializableColor::transparent(),
        }
    }

    pub fn with_colors(mut self, stroke: SerializableColor, fill: SerializableColor) -> Self {
        self.stroke_color = stroke;
        self.fill_color = fill;
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn as_circle(&self) -> kurbo::Circle {
        kurbo::Circle::new(self.center(), self.radius)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        Rect::new(
            self.x - self.radius,
            self.y - self.radius,
            self.x + self.radius,
            self.y + self.radius,
        )
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        // Strict: a point exactly on the outline is a miss.
        self.center().distance(point) < self.radius
    }

    fn to_path(&self) -> BezPath {
        self.as_circle().to_path(0.1)
    }

    fn move_to(&mut self, point: Point) {
        self.x = point.x;
        self.y = point.y;
    }

    fn validate(&self) -> Result<(), String> {
        check_finite("x", self.x)?;
        check_finite("y", self.y)?;
        check_finite("radius", self.radius)?;
        if self.radius < 0.0 {
            return Err(format!("circle radius must be non-negative, got {}", self.radius));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ApproximateTextMeasure;

    #[test]
    fn test_circle_hit_test_is_strict() {
        let measure = ApproximateTextMeasure::default();
        let circle = Circle::new(Point::new(50.0, 50.0), 10.0);
        assert!(circle.hit_test(Point::new(55.0, 50.0), &measure));
        assert!(!circle.hit_test(Point::new(60.0, 50.0), &measure));
        assert!(!circle.hit_test(Point::new(70.0, 70.0), &measure));
    }

    #[test]
    fn test_zero_radius_never_hit() {
        let measure = ApproximateTextMeasure::default();
        let circle = Circle::new(Point::new(5.0, 5.0), 0.0);
        assert!(!circle.hit_test(Point::new(5.0, 5.0), &measure));
    }

    #[test]
    fn test_move_centers_on_pointer() {
        let mut circle = Circle::new(Point::new(0.0, 0.0), 10.0);
        circle.move_to(Point::new(30.0, 40.0));
        assert!((circle.x - 30.0).abs() < f64::EPSILON);
        assert!((circle.y - 40.0).abs() < f64::EPSILON);
        assert!((circle.radius - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        let measure = ApproximateTextMeasure::default();
        let circle = Circle::new(Point::new(10.0, 20.0), 5.0);
        let bounds = circle.bounds(&measure);
        assert!((bounds.x0 - 5.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_negative_radius() {
        let circle = Circle::new(Point::new(0.0, 0.0), -1.0);
        assert!(circle.validate().is_err());
    }
}
