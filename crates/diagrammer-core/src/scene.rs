//! Scene store: the ordered set of shapes making up a diagram.

use crate::error::{EditorError, EditorResult};
use crate::shapes::{Shape, ShapeId, TextMeasure};
use kurbo::Point;
use std::collections::HashMap;

/// All shapes in the diagram, keyed by ID, with their paint order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// All shapes in the scene, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Paint order (back to front).
    z_order: Vec<ShapeId>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of everything else.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
        id
    }

    /// Remove a shape. Absent IDs are ignored.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let removed = self.shapes.remove(&id);
        if removed.is_some() {
            self.z_order.retain(|&shape_id| shape_id != id);
        }
        removed
    }

    /// Clear all shapes from the scene.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
    }

    /// Get a shape by ID.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Get shapes in paint order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Shape IDs in paint order (back to front).
    pub fn ids(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Topmost shape under `point`.
    pub fn shape_at(&self, point: Point, measure: &dyn TextMeasure) -> Option<ShapeId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.shapes
                .get(id)
                .is_some_and(|shape| shape.hit_test(point, measure))
        })
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Encode the scene as a JSON array in paint order.
    ///
    /// Rectangles are written with normalized extents.
    pub fn serialize(&self) -> EditorResult<Vec<u8>> {
        let shapes: Vec<Shape> = self
            .shapes_ordered()
            .map(|shape| {
                let mut shape = shape.clone();
                shape.normalize();
                shape
            })
            .collect();
        Ok(serde_json::to_vec(&shapes)?)
    }

    /// Decode a scene from exported bytes.
    ///
    /// Every shape is validated; any failure rejects the whole payload.
    pub fn deserialize(bytes: &[u8]) -> EditorResult<Self> {
        let shapes: Vec<Shape> =
            serde_json::from_slice(bytes).map_err(|e| EditorError::DataFormat(e.to_string()))?;

        let mut scene = Self::new();
        for (index, mut shape) in shapes.into_iter().enumerate() {
            shape.validate().map_err(|reason| {
                EditorError::DataFormat(format!("shape {} ({}): {}", index, shape.kind_name(), reason))
            })?;
            shape.normalize();
            scene.add_shape(shape);
        }
        Ok(scene)
    }

    /// Replace the contents with a decoded payload.
    ///
    /// On error the current shapes are left untouched.
    pub fn replace_from(&mut self, bytes: &[u8]) -> EditorResult<()> {
        let imported = Self::deserialize(bytes)?;
        *self = imported;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ApproximateTextMeasure, Circle, Rectangle, SerializableColor, TextLabel};

    fn measure() -> ApproximateTextMeasure {
        ApproximateTextMeasure { char_width: 8.0 }
    }

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_shape(Shape::Circle(
            Circle::new(Point::new(50.0, 50.0), 20.0)
                .with_colors(SerializableColor::new(255, 0, 0, 255), SerializableColor::transparent()),
        ));
        scene.add_shape(Shape::Rectangle(
            Rectangle::new(Point::new(10.0, 10.0), 100.0, 60.0)
                .with_colors(SerializableColor::black(), SerializableColor::new(0, 0, 255, 255)),
        ));
        scene.add_shape(Shape::Text(TextLabel::new(Point::new(5.0, 100.0), "Label".into())));
        scene
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = Scene::new();
        let id = scene.add_shape(Shape::Circle(Circle::new(Point::new(0.0, 0.0), 5.0)));
        assert_eq!(scene.len(), 1);
        assert!(scene.contains(id));

        assert!(scene.remove_shape(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.ids().is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut scene = sample_scene();
        let id = scene.ids()[0];
        scene.remove_shape(id);
        assert!(scene.remove_shape(id).is_none());
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_topmost_shape_wins() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::Circle(Circle::new(Point::new(50.0, 50.0), 20.0)));
        let top = scene.add_shape(Shape::Circle(Circle::new(Point::new(55.0, 50.0), 20.0)));
        assert_eq!(scene.shape_at(Point::new(52.0, 50.0), &measure()), Some(top));
    }

    #[test]
    fn test_shape_at_miss() {
        let scene = sample_scene();
        assert_eq!(scene.shape_at(Point::new(500.0, 500.0), &measure()), None);
    }

    #[test]
    fn test_shape_at_text() {
        let scene = sample_scene();
        let text_id = scene.ids()[2];
        assert_eq!(scene.shape_at(Point::new(20.0, 90.0), &measure()), Some(text_id));
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let scene = sample_scene();
        let bytes = scene.serialize().unwrap();
        let restored = Scene::deserialize(&bytes).unwrap();

        assert_eq!(restored.len(), 3);
        let kinds: Vec<_> = restored.shapes_ordered().map(|s| s.kind_name()).collect();
        assert_eq!(kinds, vec!["circle", "rect", "text"]);
        assert_eq!(restored.serialize().unwrap(), bytes);
    }

    #[test]
    fn test_serialize_normalizes_rectangles() {
        let mut scene = Scene::new();
        let mut rect = Rectangle::new(Point::new(50.0, 50.0), 0.0, 0.0);
        rect.width = -40.0;
        rect.height = -40.0;
        scene.add_shape(Shape::Rectangle(rect));

        let value: serde_json::Value = serde_json::from_slice(&scene.serialize().unwrap()).unwrap();
        assert_eq!(value[0]["x"], 10.0);
        assert_eq!(value[0]["y"], 10.0);
        assert_eq!(value[0]["width"], 40.0);
        assert_eq!(value[0]["height"], 40.0);
    }

    #[test]
    fn test_deserialize_browser_export() {
        let json = r##"[
            {"type":"circle","x":100,"y":80,"radius":30,"color":"#ff0000","fill":"transparent"},
            {"type":"rect","x":10,"y":10,"width":50,"height":20,"color":"#000000","fill":"#00ff00"},
            {"type":"text","x":5,"y":40,"text":"Hi","color":"#333333"}
        ]"##;
        let scene = Scene::deserialize(json.as_bytes()).unwrap();
        assert_eq!(scene.len(), 3);
        let Some(Shape::Rectangle(rect)) = scene.get(scene.ids()[1]) else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.fill_color, SerializableColor::new(0, 255, 0, 255));
    }

    #[test]
    fn test_deserialize_unknown_kind() {
        let json = r#"[{"type":"triangle","x":0,"y":0}]"#;
        assert!(matches!(Scene::deserialize(json.as_bytes()), Err(EditorError::DataFormat(_))));
    }

    #[test]
    fn test_deserialize_missing_field() {
        let json = r##"[{"type":"circle","x":0,"y":0,"color":"#000000","fill":"transparent"}]"##;
        assert!(matches!(Scene::deserialize(json.as_bytes()), Err(EditorError::DataFormat(_))));
    }

    #[test]
    fn test_deserialize_non_numeric_geometry() {
        let json = r##"[{"type":"rect","x":"ten","y":0,"width":1,"height":1,"color":"#000000","fill":"transparent"}]"##;
        assert!(matches!(Scene::deserialize(json.as_bytes()), Err(EditorError::DataFormat(_))));
    }

    #[test]
    fn test_deserialize_negative_radius() {
        let json = r##"[{"type":"circle","x":0,"y":0,"radius":-3,"color":"#000000","fill":"transparent"}]"##;
        assert!(matches!(Scene::deserialize(json.as_bytes()), Err(EditorError::DataFormat(_))));
    }

    #[test]
    fn test_deserialize_blank_text() {
        let json = r##"[{"type":"text","x":0,"y":0,"text":"","color":"#000000"}]"##;
        assert!(matches!(Scene::deserialize(json.as_bytes()), Err(EditorError::DataFormat(_))));
    }

    #[test]
    fn test_deserialize_not_an_array() {
        assert!(matches!(Scene::deserialize(b"{}"), Err(EditorError::DataFormat(_))));
        assert!(matches!(Scene::deserialize(b"not json"), Err(EditorError::DataFormat(_))));
    }

    #[test]
    fn test_replace_from_failure_keeps_scene() {
        let mut scene = sample_scene();
        let before = scene.serialize().unwrap();

        let result = scene.replace_from(br#"[{"type":"hexagon"}]"#);
        assert!(matches!(result, Err(EditorError::DataFormat(_))));
        assert_eq!(scene.serialize().unwrap(), before);
    }

    #[test]
    fn test_replace_from_success() {
        let mut scene = sample_scene();
        scene
            .replace_from(br##"[{"type":"text","x":1,"y":2,"text":"only","color":"#000000"}]"##)
            .unwrap();
        assert_eq!(scene.len(), 1);
    }
}
