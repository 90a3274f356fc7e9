//! Shaped text at a fixed pixel size.
//!
//! Text is shaped with rustybuzz so that scripts with reordering and stacked
//! marks (Khmer, Thai, Devanagari) get the same glyph sequence when measured and
//! when painted. Glyph metrics and outlines come from ttf-parser.
//!
//! Vertical placement: the cursor y is the top of the line. The baseline sits
//! `max(ascender, ink top)` below it, so tall stacks never poke above the line,
//! and the measured rectangle hugs the glyph ink vertically.
//!
//! Horizontal placement: the rectangle starts at the cursor x. Ink that reaches
//! left of the pen origin (negative side bearings, leading marks) widens the
//! rectangle, and the pen is shifted right by the same amount when painting.

use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::layout::TextMeasure;

/// A glyph positioned relative to the run's pen origin on the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPosition {
    /// Glyph id in the font
    pub glyph_id: GlyphId,
    /// Horizontal offset from the run start in pixels
    pub x: f32,
    /// Vertical offset above the baseline in pixels
    pub y: f32,
}

/// Result of shaping one word.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRun {
    /// Glyphs in visual order
    pub glyphs: Vec<GlyphPosition>,
    /// Total advance width in pixels
    pub advance: f32,
    /// Ink extents `(x_min, y_min, x_max, y_max)` in pixels, y up from the baseline
    pub ink: Option<(f32, f32, f32, f32)>,
}

impl ShapedRun {
    /// How far the ink reaches left of the pen origin, or zero.
    pub fn left_overhang(&self) -> f32 {
        self.ink.map(|(x_min, ..)| (-x_min).max(0.0)).unwrap_or(0.0)
    }
}

/// A font prepared for one pixel size.
pub struct ShapedFont<'a> {
    face: Face<'a>,
    shaper: rustybuzz::Face<'a>,
    size_px: f32,
    scale: f32,
}

impl<'a> ShapedFont<'a> {
    /// Parse `data` for shaping and outlining at `size_px` pixels per em.
    pub fn new(data: &'a [u8], size_px: f32) -> Result<Self> {
        if size_px <= 0.0 {
            return Err(Error::Font(format!("invalid size {}", size_px)));
        }
        let face = Face::parse(data, 0).map_err(|e| Error::Font(e.to_string()))?;
        let shaper = rustybuzz::Face::from_slice(data, 0)
            .ok_or_else(|| Error::Font("no tables usable for shaping".to_string()))?;
        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(Error::Font("units per em is 0".to_string()));
        }

        Ok(Self {
            face,
            shaper,
            size_px,
            scale: size_px / units_per_em as f32,
        })
    }

    /// Pixels per em.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Ascender in pixels (above the baseline).
    pub fn ascender(&self) -> f32 {
        self.face.ascender() as f32 * self.scale
    }

    /// Descender in pixels (negative, below the baseline).
    pub fn descender(&self) -> f32 {
        self.face.descender() as f32 * self.scale
    }

    /// Shape `text` into positioned glyphs.
    pub fn shape(&self, text: &str) -> ShapedRun {
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let output = rustybuzz::shape(&self.shaper, &[], buffer);

        let mut glyphs = Vec::with_capacity(output.len());
        let mut ink: Option<(f32, f32, f32, f32)> = None;
        let mut pen_x = 0.0f32;

        for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
            let glyph_id = GlyphId(info.glyph_id as u16);
            let x = pen_x + pos.x_offset as f32 * self.scale;
            let y = pos.y_offset as f32 * self.scale;

            if let Some(bbox) = self.face.glyph_bounding_box(glyph_id) {
                let glyph_ink = (
                    x + bbox.x_min as f32 * self.scale,
                    y + bbox.y_min as f32 * self.scale,
                    x + bbox.x_max as f32 * self.scale,
                    y + bbox.y_max as f32 * self.scale,
                );
                ink = Some(match ink {
                    Some((x0, y0, x1, y1)) => (
                        x0.min(glyph_ink.0),
                        y0.min(glyph_ink.1),
                        x1.max(glyph_ink.2),
                        y1.max(glyph_ink.3),
                    ),
                    None => glyph_ink,
                });
            }

            glyphs.push(GlyphPosition { glyph_id, x, y });
            pen_x += pos.x_advance as f32 * self.scale;
        }

        ShapedRun {
            glyphs,
            advance: pen_x,
            ink: ink.filter(|(x0, y0, x1, y1)| x1 > x0 && y1 > y0),
        }
    }

    /// Rectangle of an already shaped run drawn with its line top at `origin`.
    pub fn run_rect(&self, run: &ShapedRun, origin: Point) -> Rect {
        match run.ink {
            Some((_, ink_bottom, ink_right, ink_top)) => {
                let baseline = origin.y + self.ascender().max(ink_top);
                let right = origin.x + run.left_overhang() + run.advance.max(ink_right).max(1.0);
                Rect::from_points(origin.x, baseline - ink_top, right, baseline - ink_bottom)
            },
            None => {
                let width = run.advance.max(1.0);
                let height = (self.ascender() - self.descender()).max(1.0);
                Rect::new(origin.x, origin.y, width, height)
            },
        }
    }

    /// Baseline y for a run whose measured rectangle is `rect`.
    pub fn baseline_for(&self, run: &ShapedRun, rect: &Rect) -> f32 {
        match run.ink {
            Some((_, ink_bottom, _, _)) => rect.bottom() + ink_bottom,
            None => rect.top() + self.ascender(),
        }
    }

    /// Pen x for a run whose measured rectangle is `rect`.
    pub fn pen_x_for(&self, run: &ShapedRun, rect: &Rect) -> f32 {
        rect.left() + run.left_overhang()
    }

    /// Append the outline of `glyph_id` to `sink`, scaled and placed with its
    /// origin at `(x, baseline)` in canvas pixels.
    pub fn outline_glyph(&self, glyph_id: GlyphId, x: f32, baseline: f32, sink: &mut dyn PathSink) -> bool {
        let mut builder = ScaledOutline {
            sink,
            x,
            baseline,
            scale: self.scale,
        };
        self.face.outline_glyph(glyph_id, &mut builder).is_some()
    }
}

impl TextMeasure for ShapedFont<'_> {
    fn measure(&self, text: &str, origin: Point) -> Rect {
        let run = self.shape(text);
        self.run_rect(&run, origin)
    }
}

impl std::fmt::Debug for ShapedFont<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedFont")
            .field("size_px", &self.size_px)
            .field("units_per_em", &self.face.units_per_em())
            .finish()
    }
}

/// Receives glyph outlines in canvas coordinates (y down).
pub trait PathSink {
    /// Start a new contour.
    fn move_to(&mut self, x: f32, y: f32);
    /// Straight segment.
    fn line_to(&mut self, x: f32, y: f32);
    /// Quadratic curve.
    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32);
    /// Cubic curve.
    fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32);
    /// Close the contour.
    fn close(&mut self);
}

struct ScaledOutline<'s> {
    sink: &'s mut dyn PathSink,
    x: f32,
    baseline: f32,
    scale: f32,
}

impl ScaledOutline<'_> {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.baseline - y * self.scale)
    }
}

impl OutlineBuilder for ScaledOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.sink.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.sink.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.sink.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.sink.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.sink.close();
    }
}
