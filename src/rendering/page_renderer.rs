//! Page renderer - converts a laid-out page to a raster image.

use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tiny_skia::{Color, PathBuilder, Pixmap, Stroke, Transform};

use super::solid_paint;
use super::text_rasterizer::TextRasterizer;
use crate::error::{Error, Result};
use crate::fonts::ShapedFont;
use crate::layout::LayoutResult;

const TEXT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const BOX_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 0.8];

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless)
    #[default]
    Png,
    /// JPEG format (lossy, smaller file size)
    Jpeg,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// Options for page rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Output image format
    pub format: ImageFormat,
    /// JPEG quality (1-100, only for JPEG format)
    pub jpeg_quality: u8,
    /// Stroke width of debug word boxes in pixels
    pub box_line_width: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            jpeg_quality: 90,
            box_line_width: 1.0,
        }
    }
}

impl RenderOptions {
    /// Set JPEG format with quality.
    pub fn as_jpeg(mut self, quality: u8) -> Self {
        self.format = ImageFormat::Jpeg;
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

/// Rendered image output.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// Image data in the specified format
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Output format
    pub format: ImageFormat,
}

impl RenderedImage {
    /// Save the image to a file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path.as_ref(), &self.data)?;
        Ok(())
    }

    /// Get the image data as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Page renderer that paints placed words onto a white canvas.
#[derive(Debug, Default)]
pub struct PageRenderer {
    options: RenderOptions,
    text_rasterizer: TextRasterizer,
}

impl PageRenderer {
    /// Create a new page renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            text_rasterizer: TextRasterizer::new(),
        }
    }

    /// Rendering options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Paint the page and encode it.
    pub fn render(&self, layout: &LayoutResult, font: &ShapedFont<'_>) -> Result<RenderedImage> {
        let pixmap = self.paint(layout, font)?;
        self.encode(&pixmap)
    }

    /// Paint the page with every word rectangle outlined, for checking that
    /// annotations line up with the ink.
    pub fn render_debug(&self, layout: &LayoutResult, font: &ShapedFont<'_>) -> Result<RenderedImage> {
        let mut pixmap = self.paint(layout, font)?;
        self.outline_words(&mut pixmap, layout);
        self.encode(&pixmap)
    }

    /// Stroke every placed word rectangle in red.
    pub fn outline_words(&self, pixmap: &mut Pixmap, layout: &LayoutResult) {
        let paint = solid_paint(BOX_COLOR);
        let stroke = Stroke {
            width: self.options.box_line_width,
            ..Default::default()
        };
        for word in &layout.placed {
            let r = word.rect;
            if let Some(rect) = tiny_skia::Rect::from_ltrb(r.left(), r.top(), r.right(), r.bottom()) {
                let path = PathBuilder::from_rect(rect);
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    /// Paint words onto a fresh white pixmap.
    pub fn paint(&self, layout: &LayoutResult, font: &ShapedFont<'_>) -> Result<Pixmap> {
        let mut pixmap = Pixmap::new(layout.page_width, layout.page_height).ok_or_else(|| {
            Error::Render(format!(
                "Failed to create pixmap {}x{}",
                layout.page_width, layout.page_height
            ))
        })?;
        pixmap.fill(Color::WHITE);

        let paint = solid_paint(TEXT_COLOR);
        for word in &layout.placed {
            let outlined = self
                .text_rasterizer
                .render_word(&mut pixmap, font, word, &paint);
            if outlined == 0 {
                log::debug!("'{}' produced no glyph outlines", word.text);
            }
        }

        Ok(pixmap)
    }

    /// Encode a pixmap as opaque RGB in the configured format.
    pub fn encode(&self, pixmap: &Pixmap) -> Result<RenderedImage> {
        let mut rgb = RgbImage::new(pixmap.width(), pixmap.height());
        for (dst, src) in rgb.pixels_mut().zip(pixmap.pixels()) {
            let color = src.demultiply();
            *dst = Rgb([color.red(), color.green(), color.blue()]);
        }

        let output_format = match self.options.format {
            ImageFormat::Png => ImageOutputFormat::Png,
            ImageFormat::Jpeg => ImageOutputFormat::Jpeg(self.options.jpeg_quality),
        };

        let mut data = Vec::new();
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut data), output_format)
            .map_err(|e| Error::Image(format!("{:?} encoding failed: {}", self.options.format, e)))?;

        Ok(RenderedImage {
            data,
            width: pixmap.width(),
            height: pixmap.height(),
            format: self.options.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RenderOptions::default();
        assert_eq!(opts.format, ImageFormat::Png);
        assert_eq!(opts.jpeg_quality, 90);
    }

    #[test]
    fn test_jpeg_quality_bounds() {
        assert_eq!(RenderOptions::default().as_jpeg(0).jpeg_quality, 1);
        assert_eq!(RenderOptions::default().as_jpeg(150).jpeg_quality, 100);
        assert_eq!(RenderOptions::default().as_jpeg(80).format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn test_encode_blank_png() {
        let renderer = PageRenderer::default();
        let mut pixmap = Pixmap::new(4, 3).unwrap();
        pixmap.fill(Color::WHITE);

        let image = renderer.encode(&pixmap).unwrap();
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(&image.data[1..4], b"PNG");

        let decoded = image::load_from_memory(&image.data).unwrap().to_rgb8();
        assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_encode_jpeg() {
        let renderer = PageRenderer::new(RenderOptions::default().as_jpeg(85));
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        pixmap.fill(Color::WHITE);

        let image = renderer.encode(&pixmap).unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!(&image.data[..2], &[0xFF, 0xD8]);
    }
}
