//! Selection reference and resize handle.

use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};

/// Side length of the square resize handle.
pub const RESIZE_HANDLE_SIZE: f64 = 8.0;

/// At most one selected shape, held by ID.
///
/// The ID may outlive the shape (after a delete or an import); lookups
/// through [`Selection::resolve`] then yield nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    id: Option<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: ShapeId) {
        self.id = Some(id);
    }

    pub fn clear(&mut self) {
        self.id = None;
    }

    /// The raw selected ID, which may be stale.
    pub fn id(&self) -> Option<ShapeId> {
        self.id
    }

    /// The selected ID if it still names a shape in `scene`.
    pub fn resolve(&self, scene: &Scene) -> Option<ShapeId> {
        self.id.filter(|&id| scene.contains(id))
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.id == Some(id)
    }
}

/// Bottom-right corner the handle is anchored to.
fn handle_corner(shape: &Shape) -> Option<Point> {
    match shape {
        Shape::Rectangle(rect) => {
            let bounds = rect.as_rect();
            Some(Point::new(bounds.x1, bounds.y1))
        }
        Shape::Circle(circle) => Some(Point::new(circle.x + circle.radius, circle.y + circle.radius)),
        Shape::Text(_) => None,
    }
}

/// The handle square for `shape`, if it has one.
pub fn resize_handle_rect(shape: &Shape) -> Option<Rect> {
    handle_corner(shape).map(|corner| {
        Rect::new(
            corner.x - RESIZE_HANDLE_SIZE,
            corner.y - RESIZE_HANDLE_SIZE,
            corner.x,
            corner.y,
        )
    })
}

/// Inclusive test against the shape's resize handle.
pub fn is_over_resize_handle(shape: &Shape, point: Point) -> bool {
    resize_handle_rect(shape).is_some_and(|handle| {
        point.x >= handle.x0 && point.x <= handle.x1 && point.y >= handle.y0 && point.y <= handle.y1
    })
}
