//! Page rasterization.
//!
//! Paints placed words onto a white canvas using the `tiny-skia` rasterizer and
//! encodes the result with the `image` crate.
//!
//! ## Architecture
//!
//! 1. Allocate a white pixmap the size of the page
//! 2. Shape each placed word with the page font and fill its glyph outlines in black
//! 3. Optionally stroke every word rectangle for visual inspection
//! 4. Convert to opaque RGB and encode as PNG or JPEG
//!
//! Words are shaped with the same [`ShapedFont`](crate::fonts::ShapedFont) that
//! measured them during layout, so the painted ink matches the annotated boxes.

mod page_renderer;
mod text_rasterizer;

pub use page_renderer::{ImageFormat, PageRenderer, RenderOptions, RenderedImage};
pub use text_rasterizer::TextRasterizer;

use tiny_skia::{Color, Paint};

/// Create an anti-aliased solid paint from RGBA components in `0.0..=1.0`.
pub(crate) fn solid_paint(rgba: [f32; 4]) -> Paint<'static> {
    let [r, g, b, a] = rgba;
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba(r, g, b, a).unwrap_or(Color::BLACK));
    paint.anti_alias = true;
    paint
}
