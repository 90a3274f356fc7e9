//! Text rasterizer - fills shaped glyph outlines with tiny-skia.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::fonts::{PathSink, ShapedFont};
use crate::layout::PlacedWord;

impl PathSink for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        PathBuilder::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        PathBuilder::line_to(self, x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        PathBuilder::quad_to(self, x1, y1, x, y);
    }

    fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        PathBuilder::cubic_to(self, x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        PathBuilder::close(self);
    }
}

/// Rasterizer for placed words.
#[derive(Debug, Default)]
pub struct TextRasterizer;

impl TextRasterizer {
    /// Create a new text rasterizer.
    pub fn new() -> Self {
        Self
    }

    /// Paint one word at its placed rectangle.
    ///
    /// Returns the number of glyphs that had an outline.
    pub fn render_word(
        &self,
        pixmap: &mut Pixmap,
        font: &ShapedFont<'_>,
        word: &PlacedWord,
        paint: &Paint,
    ) -> usize {
        let run = font.shape(&word.text);
        let baseline = font.baseline_for(&run, &word.rect);
        let pen_x = font.pen_x_for(&run, &word.rect);

        let mut path = PathBuilder::new();
        let mut outlined = 0;
        for glyph in &run.glyphs {
            // Glyph y offsets point up; canvas y points down
            if font.outline_glyph(glyph.glyph_id, pen_x + glyph.x, baseline - glyph.y, &mut path) {
                outlined += 1;
            }
        }

        if let Some(path) = path.finish() {
            pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
        }
        outlined
    }
}
