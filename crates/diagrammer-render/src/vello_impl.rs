//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use crate::text::TextLayouter;
use diagrammer_core::selection::resize_handle_rect;
use diagrammer_core::shapes::{Shape, TEXT_ASCENT, TextLabel, TextMeasure};
use kurbo::{Affine, BezPath, Rect, Stroke};
use parley::layout::PositionedLayoutItem;
use peniko::{Brush, Color, Fill};
use vello::Scene;

/// Outline width of shapes.
const STROKE_WIDTH: f64 = 1.0;
/// Outline width of the selection highlight.
const SELECTION_STROKE_WIDTH: f64 = 3.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Text layout shared with hit-testing.
    text: TextLayouter,
    selection_color: Color,
    handle_color: Color,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            text: TextLayouter::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            handle_color: Color::BLACK,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Text measurement matching what gets painted.
    pub fn text_measure(&self) -> &TextLayouter {
        &self.text
    }

    fn render_shape(&mut self, shape: &Shape, transform: Affine, selected: bool) {
        match shape {
            Shape::Circle(circle) => {
                let path = shape.to_path();
                self.render_path(&path, circle.stroke_color.into(), circle.fill_color.into(), transform);
            }
            Shape::Rectangle(rect) => {
                let path = shape.to_path();
                self.render_path(&path, rect.stroke_color.into(), rect.fill_color.into(), transform);
            }
            Shape::Text(label) => self.render_text(label, transform),
        }

        if selected {
            self.render_selection(shape, transform);
        }
        if let Some(handle) = handle_rect(shape) {
            self.scene
                .fill(Fill::NonZero, transform, self.handle_color, None, &handle);
        }
    }

    /// Fill first, then outline on top.
    fn render_path(&mut self, path: &BezPath, stroke: Color, fill: Color, transform: Affine) {
        if fill.to_rgba8().a > 0 {
            self.scene.fill(Fill::NonZero, transform, fill, None, path);
        }
        self.scene
            .stroke(&Stroke::new(STROKE_WIDTH), transform, stroke, None, path);
    }

    fn render_selection(&mut self, shape: &Shape, transform: Affine) {
        let stroke = Stroke::new(SELECTION_STROKE_WIDTH);
        match shape {
            Shape::Text(_) => {
                let bounds = shape.bounds(&self.text).inflate(2.0, 2.0);
                self.scene
                    .stroke(&stroke, transform, self.selection_color, None, &bounds);
            }
            _ => {
                let path = shape.to_path();
                self.scene
                    .stroke(&stroke, transform, self.selection_color, None, &path);
            }
        }
    }

    /// Render a label with its left edge at `x` and baseline near `y`.
    fn render_text(&mut self, label: &TextLabel, transform: Affine) {
        let color: Color = label.stroke_color.into();
        let brush = Brush::Solid(color);
        let layout = self.text.layout(&label.text, brush.clone());

        // Parley lays out from the top; the label's box spans one ascent above y.
        let text_transform = transform * Affine::translate((label.x, label.y - TEXT_ASCENT));

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // No fonts available: mark the label's extent instead.
        if glyph_count == 0 {
            log::debug!("No glyphs for label {:?}, drawing placeholder", label.text);
            let width = self.text.text_width(&label.text);
            let rect = Rect::new(label.x, label.y - TEXT_ASCENT, label.x + width, label.y);
            let faded = Color::from_rgba8(
                label.stroke_color.r,
                label.stroke_color.g,
                label.stroke_color.b,
                label.stroke_color.a / 3,
            );
            self.scene.fill(Fill::NonZero, transform, faded, None, &rect);
        }
    }
}

/// Handle square painted on every resizable shape, selected or not.
fn handle_rect(shape: &Shape) -> Option<Rect> {
    if shape.is_resizable() {
        resize_handle_rect(shape)
    } else {
        None
    }
}

impl TextMeasure for VelloRenderer {
    fn text_width(&self, text: &str) -> f64 {
        self.text.text_width(text)
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.selection_color = ctx.selection_color;
        self.handle_color = ctx.handle_color;

        let transform = Affine::scale(ctx.scale_factor);

        // Clear the whole surface.
        let surface = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);
        self.scene
            .fill(Fill::NonZero, transform, ctx.background_color, None, &surface);

        let selected = ctx.selection.resolve(ctx.scene);
        for shape in ctx.scene.shapes_ordered() {
            self.render_shape(shape, transform, selected == Some(shape.id()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagrammer_core::scene::Scene;
    use diagrammer_core::selection::Selection;
    use diagrammer_core::shapes::{Circle, Rectangle, SerializableColor};
    use kurbo::{Point, Size};

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_empty_scene_clears_surface() {
        let mut renderer = VelloRenderer::new();
        let scene = Scene::new();
        let ctx = RenderContext::new(&scene, Size::new(800.0, 600.0));

        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_shapes() {
        let mut renderer = VelloRenderer::new();
        let mut scene = Scene::new();
        scene.add_shape(Shape::Rectangle(Rectangle::new(Point::new(100.0, 100.0), 200.0, 150.0)));
        let id = scene.add_shape(Shape::Circle(Circle::new(Point::new(50.0, 50.0), 25.0)));
        scene.add_shape(Shape::Text(TextLabel::new(Point::new(10.0, 300.0), "label".into())));

        let mut selection = Selection::new();
        selection.select(id);
        let ctx = RenderContext::new(&scene, Size::new(800.0, 600.0)).with_selection(selection);
        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());
    }

    fn path_count(renderer: &mut VelloRenderer, scene: &Scene, selection: Selection) -> u32 {
        let ctx = RenderContext::new(scene, Size::new(800.0, 600.0)).with_selection(selection);
        renderer.build_scene(&ctx);
        renderer.scene().encoding().n_paths
    }

    #[test]
    fn test_outlined_shapes_paint_outline_and_handle() {
        let mut renderer = VelloRenderer::new();
        let empty = path_count(&mut renderer, &Scene::new(), Selection::new());

        let mut scene = Scene::new();
        scene.add_shape(Shape::Circle(Circle::new(Point::new(50.0, 50.0), 25.0)));
        assert_eq!(path_count(&mut renderer, &scene, Selection::new()), empty + 2);

        scene.add_shape(Shape::Rectangle(Rectangle::new(Point::new(100.0, 100.0), 40.0, 30.0)));
        assert_eq!(path_count(&mut renderer, &scene, Selection::new()), empty + 4);
    }

    #[test]
    fn test_filled_shape_adds_fill_path() {
        let mut renderer = VelloRenderer::new();
        let mut scene = Scene::new();
        let mut rect = Rectangle::new(Point::new(10.0, 10.0), 40.0, 30.0);
        let id = scene.add_shape(Shape::Rectangle(rect.clone()));
        let outlined = path_count(&mut renderer, &scene, Selection::new());

        rect.fill_color = SerializableColor::new(0, 255, 0, 255);
        scene.remove_shape(id);
        scene.add_shape(Shape::Rectangle(rect));
        assert_eq!(path_count(&mut renderer, &scene, Selection::new()), outlined + 1);
    }

    #[test]
    fn test_selection_adds_one_highlight() {
        let mut renderer = VelloRenderer::new();
        let mut scene = Scene::new();
        let circle = scene.add_shape(Shape::Circle(Circle::new(Point::new(50.0, 50.0), 25.0)));
        scene.add_shape(Shape::Rectangle(Rectangle::new(Point::new(100.0, 100.0), 40.0, 30.0)));
        let label = scene.add_shape(Shape::Text(TextLabel::new(Point::new(10.0, 300.0), "label".into())));
        let unselected = path_count(&mut renderer, &scene, Selection::new());

        let mut selection = Selection::new();
        selection.select(circle);
        assert_eq!(path_count(&mut renderer, &scene, selection), unselected + 1);

        selection.select(label);
        assert_eq!(path_count(&mut renderer, &scene, selection), unselected + 1);
    }

    #[test]
    fn test_handles_only_on_resizable_shapes() {
        let circle = Shape::Circle(Circle::new(Point::new(50.0, 50.0), 20.0));
        let handle = handle_rect(&circle).unwrap();
        assert_eq!((handle.x1, handle.y1), (70.0, 70.0));

        let rect = Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 60.0));
        let handle = handle_rect(&rect).unwrap();
        assert_eq!((handle.x1, handle.y1), (110.0, 70.0));

        let label = Shape::Text(TextLabel::new(Point::new(10.0, 30.0), "label".into()));
        assert!(handle_rect(&label).is_none());
    }

    #[test]
    fn test_rebuild_resets_previous_frame() {
        let mut renderer = VelloRenderer::new();
        let mut scene = Scene::new();
        for i in 0..20 {
            scene.add_shape(Shape::Circle(Circle::new(Point::new(i as f64 * 10.0, 0.0), 5.0)));
        }
        let ctx = RenderContext::new(&scene, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        let busy = renderer.scene().encoding().n_paths;

        let empty = Scene::new();
        renderer.build_scene(&RenderContext::new(&empty, Size::new(800.0, 600.0)));
        assert!(renderer.scene().encoding().n_paths < busy);
    }

    #[test]
    fn test_stale_selection_renders() {
        let mut renderer = VelloRenderer::new();
        let mut scene = Scene::new();
        let id = scene.add_shape(Shape::Circle(Circle::new(Point::new(50.0, 50.0), 25.0)));
        let mut selection = Selection::new();
        selection.select(id);
        scene.remove_shape(id);

        let unselected = path_count(&mut renderer, &scene, Selection::new());
        assert_eq!(path_count(&mut renderer, &scene, selection), unselected);
    }

    #[test]
    fn test_measure_delegates_to_layouter() {
        let renderer = VelloRenderer::new();
        assert!(renderer.text_width("abc") > 0.0);
    }
}
