//! Text layout and measurement with Parley.

use diagrammer_core::shapes::{ApproximateTextMeasure, TEXT_FONT_SIZE, TextMeasure};
use parley::{FontContext, Layout, LayoutContext, StyleProperty};
use peniko::{Brush, Color};
use std::cell::RefCell;

/// Lays out label text with the system font collection.
///
/// Contexts sit behind `RefCell`s so measurement can go through the
/// shared-reference [`TextMeasure`] interface used by hit-testing.
pub struct TextLayouter {
    font_cx: RefCell<FontContext>,
    layout_cx: RefCell<LayoutContext<Brush>>,
    fallback: ApproximateTextMeasure,
}

impl Default for TextLayouter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayouter {
    pub fn new() -> Self {
        Self {
            font_cx: RefCell::new(FontContext::new()),
            layout_cx: RefCell::new(LayoutContext::new()),
            fallback: ApproximateTextMeasure::default(),
        }
    }

    /// Single-line layout of `text` at the label font size.
    pub fn layout(&self, text: &str, brush: Brush) -> Layout<Brush> {
        let mut font_cx = self.font_cx.borrow_mut();
        let mut layout_cx = self.layout_cx.borrow_mut();

        let mut builder = layout_cx.ranged_builder(&mut *font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(TEXT_FONT_SIZE as f32));
        builder.push_default(StyleProperty::Brush(brush));
        let mut layout = builder.build(text);

        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
        layout
    }
}

impl TextMeasure for TextLayouter {
    fn text_width(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let width = self.layout(text, Brush::Solid(Color::BLACK)).width() as f64;
        if width > 0.0 {
            width
        } else {
            // No usable fonts on this system.
            self.fallback.text_width(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_non_empty_text() {
        let layouter = TextLayouter::new();
        assert!(layouter.text_width("Diagram") > 0.0);
        assert!((layouter.text_width("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_longer_text_is_wider() {
        let layouter = TextLayouter::new();
        assert!(layouter.text_width("a much longer label") > layouter.text_width("ab"));
    }
}
