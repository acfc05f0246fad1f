//! Shape definitions for the diagram scene.

mod circle;
mod rectangle;
mod text;

pub use circle::Circle;
pub use rectangle::Rectangle;
pub use text::{ApproximateTextMeasure, TEXT_ASCENT, TEXT_FONT_SIZE, TextLabel, TextMeasure};

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Serializable color representation (RGBA8).
///
/// On the wire a color is a CSS string: `#rrggbb`, `#rrggbbaa`, `#rgb`
/// or one of the keywords `transparent`, `black`, `white`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Whether painting with this color has no visible effect.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// CSS representation used in exported diagrams.
    pub fn to_css(&self) -> String {
        if self.is_transparent() {
            "transparent".to_string()
        } else if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for SerializableColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "transparent" => return Ok(Self::transparent()),
            "black" => return Ok(Self::black()),
            "white" => return Ok(Self::white()),
            _ => {}
        }

        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| format!("unsupported color '{}'", s))?;
        if !hex.is_ascii() {
            return Err(format!("invalid hex color '{}'", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("invalid hex color '{}'", s))
        };
        let short = |idx: usize| channel(idx..idx + 1).map(|v| v * 17);

        match hex.len() {
            3 => Ok(Self::new(short(0)?, short(1)?, short(2)?, 255)),
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(format!("invalid hex color '{}'", s)),
        }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_css()
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Unique identifier for shapes. Runtime only, never exported.
pub type ShapeId = Uuid;

pub(crate) fn new_shape_id() -> ShapeId {
    Uuid::new_v4()
}

/// Inclusive point-in-box test (kurbo's `Rect::contains` excludes the far edges).
pub(crate) fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

pub(crate) fn check_finite(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("field '{}' must be a finite number", field))
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the normalized bounding box.
    fn bounds(&self, measure: &dyn TextMeasure) -> Rect;

    /// Check if a point hits this shape.
    fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Reposition the shape so its anchor tracks `point`.
    fn move_to(&mut self, point: Point);

    /// Check the invariants an imported shape must satisfy.
    fn validate(&self) -> Result<(), String>;
}

/// Enum wrapper for all shape types (for serialization).
///
/// Serialized as an object tagged by `"type"`: `circle`, `rect` or `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    #[serde(rename = "circle")]
    Circle(Circle),
    #[serde(rename = "rect")]
    Rectangle(Rectangle),
    #[serde(rename = "text")]
    Text(TextLabel),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Circle(s) => s.id(),
            Shape::Rectangle(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    /// Wire tag of this shape kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "circle",
            Shape::Rectangle(_) => "rect",
            Shape::Text(_) => "text",
        }
    }

    pub fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        match self {
            Shape::Circle(s) => s.bounds(measure),
            Shape::Rectangle(s) => s.bounds(measure),
            Shape::Text(s) => s.bounds(measure),
        }
    }

    pub fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool {
        match self {
            Shape::Circle(s) => s.hit_test(point, measure),
            Shape::Rectangle(s) => s.hit_test(point, measure),
            Shape::Text(s) => s.hit_test(point, measure),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Circle(s) => s.to_path(),
            Shape::Rectangle(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
        }
    }

    pub fn move_to(&mut self, point: Point) {
        match self {
            Shape::Circle(s) => s.move_to(point),
            Shape::Rectangle(s) => s.move_to(point),
            Shape::Text(s) => s.move_to(point),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            Shape::Circle(s) => s.validate(),
            Shape::Rectangle(s) => s.validate(),
            Shape::Text(s) => s.validate(),
        }
    }

    /// Drag the size-defining corner to `point`, keeping `x, y` fixed.
    ///
    /// Used both for the creation drag and for handle resizes. Text labels
    /// have no size fields and are left untouched.
    pub fn resize_to(&mut self, point: Point) {
        match self {
            Shape::Circle(s) => s.radius = s.center().distance(point),
            Shape::Rectangle(s) => {
                s.width = point.x - s.x;
                s.height = point.y - s.y;
            }
            Shape::Text(_) => {}
        }
    }

    /// Settle transient geometry (negative rectangle extents).
    pub fn normalize(&mut self) {
        if let Shape::Rectangle(s) = self {
            s.normalize();
        }
    }

    /// Whether the shape exposes a bottom-right resize handle.
    pub fn is_resizable(&self) -> bool {
        !matches!(self, Shape::Text(_))
    }

    pub fn stroke_color(&self) -> SerializableColor {
        match self {
            Shape::Circle(s) => s.stroke_color,
            Shape::Rectangle(s) => s.stroke_color,
            Shape::Text(s) => s.stroke_color,
        }
    }

    /// Fill color, `None` for kinds that are never filled.
    pub fn fill_color(&self) -> Option<SerializableColor> {
        match self {
            Shape::Circle(s) => Some(s.fill_color),
            Shape::Rectangle(s) => Some(s.fill_color),
            Shape::Text(_) => None,
        }
    }
}
