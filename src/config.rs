//! Configuration for page generation.
//!
//! A [`GeneratorConfig`] is built once (from a preset, builder calls or a JSON
//! file) and passed by reference to the generator. Physical units are converted
//! to pixels at the configured DPI:
//!
//! - points: `px = pt * dpi / 72`, truncated
//! - centimetres: `px = cm * dpi / 2.54`, truncated
//! - page sizes: `px = mm * dpi / 25.4`, rounded to the nearest pixel
//!
//! Margins can also be given directly in pixels with [`PixelMargins`]. These take
//! precedence over the centimetre fields whenever the configured DPI matches the
//! resolution they were measured at; the 300 DPI preset uses them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rendering::ImageFormat;

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// ISO A4, 210 × 297 mm
    A4,
    /// ISO A5, 148 × 210 mm
    A5,
    /// US Letter, 8.5 × 11 in
    Letter,
    /// US Legal, 8.5 × 14 in
    Legal,
}

impl PageSize {
    /// Width and height in millimetres.
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
        }
    }

    /// Width and height in pixels at `dpi`.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_synth::config::PageSize;
    ///
    /// assert_eq!(PageSize::A4.to_pixels(300), (2480, 3508));
    /// assert_eq!(PageSize::A4.to_pixels(96), (794, 1123));
    /// ```
    pub fn to_pixels(&self, dpi: u32) -> (u32, u32) {
        let (w, h) = self.dimensions_mm();
        let px = |mm: f32| (mm * dpi as f32 / 25.4).round() as u32;
        (px(w), px(h))
    }
}

/// An inclusive `min..=max` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest value
    pub min: f32,
    /// Largest value
    pub max: f32,
}

impl Bounds {
    /// Range between `min` and `max`.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range containing a single value.
    pub fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    fn check(&self, what: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 || self.min > self.max {
            return Err(Error::config(format!(
                "{} range {}..={} is invalid",
                what, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Margins in pixels at a fixed resolution.
///
/// Applied instead of the centimetre margins when [`GeneratorConfig::dpi`] equals
/// `dpi`, and ignored at any other resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelMargins {
    /// Resolution these pixel values belong to
    pub dpi: u32,
    /// Top margin
    pub top: u32,
    /// Bottom margin
    pub bottom: u32,
    /// Left margin range
    pub left: (u32, u32),
    /// Right margin range
    pub right: (u32, u32),
}

impl PixelMargins {
    fn check(&self) -> Result<()> {
        let (left_min, left_max) = self.left;
        let (right_min, right_max) = self.right;
        if left_min > left_max || right_min > right_max {
            return Err(Error::config(format!(
                "pixel margin ranges {}..={} and {}..={} must not be inverted",
                left_min, left_max, right_min, right_max
            )));
        }
        Ok(())
    }
}

/// How many images to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Generate pages until every word in the backlog is consumed once
    #[default]
    ExhaustOnce,
    /// Generate `images_per_font` pages for every font, recycling the backlog
    FixedCountPerFont,
}

/// Which font each image uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontPolicy {
    /// Odd images use fonts at odd positions, even images fonts at even positions
    #[default]
    Parity,
    /// Any font, uniformly at random
    Uniform,
    /// Fonts in turn, one image each
    RoundRobin,
    /// Fonts in turn, `images_per_font` consecutive images each
    PerFont,
}

/// Where generated files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDirs {
    /// Rendered page images
    pub images: PathBuf,
    /// Normalized-box label files
    pub labels: PathBuf,
    /// Hierarchical XML label files
    pub xml_labels: PathBuf,
    /// Pages with word boxes drawn on top, if wanted
    pub debug: Option<PathBuf>,
}

impl OutputDirs {
    /// `images/`, `labels/` and `xml_labels/` under `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            images: root.join("images"),
            labels: root.join("labels"),
            xml_labels: root.join("xml_labels"),
            debug: None,
        }
    }

    /// Also write debug overlays to `debug_boxes/` next to the images.
    pub fn with_debug(mut self) -> Self {
        let parent = self.images.parent().map(Path::to_path_buf).unwrap_or_default();
        self.debug = Some(parent.join("debug_boxes"));
        self
    }
}

impl Default for OutputDirs {
    fn default() -> Self {
        Self::under(".")
    }
}

/// Page generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Output directories
    pub output: OutputDirs,
    /// File name prefix; files are named `<prefix>_<n>.<ext>`
    pub file_prefix: String,
    /// Resolution used for unit conversion
    pub dpi: u32,
    /// Page sizes to pick from, uniformly per image
    pub page_sizes: Vec<PageSize>,
    /// Top margin in centimetres
    pub top_margin_cm: f32,
    /// Bottom margin in centimetres
    pub bottom_margin_cm: f32,
    /// Left margin range in centimetres
    pub left_margin_cm: Bounds,
    /// Right margin range in centimetres
    pub right_margin_cm: Bounds,
    /// Pixel margins that replace the centimetre margins at their own DPI
    pub margins_px: Option<PixelMargins>,
    /// Font size range in points
    pub font_size_pt: Bounds,
    /// Extra space between lines in pixels; defaults to the mean pixel font size
    pub line_spacing_px: Option<u32>,
    /// Space after each word in pixels
    pub word_spacing_px: u32,
    /// Output image format
    pub image_format: ImageFormat,
    /// JPEG quality when `image_format` is JPEG
    pub jpeg_quality: u8,
    /// Spaces per nesting level in XML labels (0 puts every element on its own line)
    pub xml_indent: usize,
    /// How many images to generate
    pub mode: GenerationMode,
    /// How fonts are assigned to images
    pub font_policy: FontPolicy,
    /// Images per font for [`GenerationMode::FixedCountPerFont`] and [`FontPolicy::PerFont`]
    pub images_per_font: usize,
    /// Seed for page randomization; random when unset
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::a4_300dpi()
    }
}

impl GeneratorConfig {
    /// A4 at 300 DPI, 12–15 pt text, 180 px top and bottom, 234 px left and 180 px right margins.
    ///
    /// The centimetre margins (2 cm left, 1.5 cm elsewhere) apply if `dpi` is changed.
    pub fn a4_300dpi() -> Self {
        Self {
            output: OutputDirs::default(),
            file_prefix: "kh_data".to_string(),
            dpi: 300,
            page_sizes: vec![PageSize::A4],
            top_margin_cm: 1.5,
            bottom_margin_cm: 1.5,
            left_margin_cm: Bounds::fixed(2.0),
            right_margin_cm: Bounds::fixed(1.5),
            margins_px: Some(PixelMargins {
                dpi: 300,
                top: 180,
                bottom: 180,
                left: (234, 234),
                right: (180, 180),
            }),
            font_size_pt: Bounds::new(12.0, 15.0),
            line_spacing_px: None,
            word_spacing_px: 0,
            image_format: ImageFormat::Png,
            jpeg_quality: 90,
            xml_indent: 0,
            mode: GenerationMode::ExhaustOnce,
            font_policy: FontPolicy::Parity,
            images_per_font: 2000,
            seed: None,
        }
    }

    /// A4 at 96 DPI with 9–13 px text, tight line spacing and 5 px word gaps.
    pub fn a4_96dpi() -> Self {
        Self {
            dpi: 96,
            left_margin_cm: Bounds::new(1.8, 2.0),
            right_margin_cm: Bounds::new(1.5, 1.8),
            margins_px: None,
            // 9..=13 px at 96 DPI
            font_size_pt: Bounds::new(6.75, 9.75),
            line_spacing_px: Some(8),
            word_spacing_px: 5,
            font_policy: FontPolicy::Uniform,
            ..Self::a4_300dpi()
        }
    }

    /// Load a configuration from JSON; missing fields take the 300 DPI defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Parse a JSON configuration and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set output directories.
    pub fn with_output(mut self, output: OutputDirs) -> Self {
        self.output = output;
        self
    }

    /// Set the generation mode.
    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the font policy.
    pub fn with_font_policy(mut self, policy: FontPolicy) -> Self {
        self.font_policy = policy;
        self
    }

    /// Set images per font.
    pub fn with_images_per_font(mut self, count: usize) -> Self {
        self.images_per_font = count;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the page sizes to pick from.
    pub fn with_page_sizes(mut self, sizes: Vec<PageSize>) -> Self {
        self.page_sizes = sizes;
        self
    }

    /// Set pixel margins for the configured DPI, replacing the centimetre margins.
    pub fn with_pixel_margins(
        mut self,
        top: u32,
        bottom: u32,
        left: (u32, u32),
        right: (u32, u32),
    ) -> Self {
        self.margins_px = Some(PixelMargins {
            dpi: self.dpi,
            top,
            bottom,
            left,
            right,
        });
        self
    }

    /// Set the space after each word.
    pub fn with_word_spacing(mut self, px: u32) -> Self {
        self.word_spacing_px = px;
        self
    }

    /// Write JPEG instead of PNG.
    pub fn with_jpeg(mut self, quality: u8) -> Self {
        self.image_format = ImageFormat::Jpeg;
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Convert points to pixels.
    pub fn pt_to_px(&self, pt: f32) -> u32 {
        (pt * self.dpi as f32 / 72.0) as u32
    }

    /// Convert centimetres to pixels.
    pub fn cm_to_px(&self, cm: f32) -> u32 {
        (cm * self.dpi as f32 / 2.54) as u32
    }

    /// Font size range in pixels.
    pub fn font_size_px(&self) -> (u32, u32) {
        (
            self.pt_to_px(self.font_size_pt.min),
            self.pt_to_px(self.font_size_pt.max),
        )
    }

    /// Pixel margins in effect at the configured DPI, if any.
    pub fn active_pixel_margins(&self) -> Option<&PixelMargins> {
        self.margins_px.as_ref().filter(|m| m.dpi == self.dpi)
    }

    /// Left margin range in pixels.
    pub fn left_margin_px(&self) -> (u32, u32) {
        if let Some(margins) = self.active_pixel_margins() {
            return margins.left;
        }
        (
            self.cm_to_px(self.left_margin_cm.min),
            self.cm_to_px(self.left_margin_cm.max),
        )
    }

    /// Right margin range in pixels.
    pub fn right_margin_px(&self) -> (u32, u32) {
        if let Some(margins) = self.active_pixel_margins() {
            return margins.right;
        }
        (
            self.cm_to_px(self.right_margin_cm.min),
            self.cm_to_px(self.right_margin_cm.max),
        )
    }

    /// Top and bottom margins in pixels.
    pub fn vertical_margins_px(&self) -> (u32, u32) {
        if let Some(margins) = self.active_pixel_margins() {
            return (margins.top, margins.bottom);
        }
        (
            self.cm_to_px(self.top_margin_cm),
            self.cm_to_px(self.bottom_margin_cm),
        )
    }

    /// Extra space between lines in pixels.
    pub fn line_spacing(&self) -> u32 {
        self.line_spacing_px.unwrap_or_else(|| {
            let (min, max) = self.font_size_px();
            (min + max) / 2
        })
    }

    /// Check that every page this configuration can produce has usable space.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(Error::config("dpi must be positive"));
        }
        if self.page_sizes.is_empty() {
            return Err(Error::config("at least one page size is required"));
        }
        if self.file_prefix.is_empty() {
            return Err(Error::config("file prefix must not be empty"));
        }
        self.left_margin_cm.check("left margin")?;
        self.right_margin_cm.check("right margin")?;
        self.font_size_pt.check("font size")?;
        if self.top_margin_cm < 0.0 || self.bottom_margin_cm < 0.0 {
            return Err(Error::config("vertical margins must not be negative"));
        }
        if let Some(margins) = &self.margins_px {
            margins.check()?;
        }
        if self.font_size_px().0 == 0 {
            return Err(Error::config(format!(
                "font size {}pt is below one pixel at {} dpi",
                self.font_size_pt.min, self.dpi
            )));
        }
        let per_font = self.mode == GenerationMode::FixedCountPerFont
            || self.font_policy == FontPolicy::PerFont;
        if per_font && self.images_per_font == 0 {
            return Err(Error::config("images per font must be positive"));
        }

        let (_, left_max) = self.left_margin_px();
        let (_, right_max) = self.right_margin_px();
        let (top, bottom) = self.vertical_margins_px();
        for size in &self.page_sizes {
            let (width, height) = size.to_pixels(self.dpi);
            if left_max + right_max >= width {
                return Err(Error::config(format!(
                    "margins {}+{}px leave no usable width on {:?} ({}px)",
                    left_max, right_max, size, width
                )));
            }
            if top + bottom >= height {
                return Err(Error::config(format!(
                    "margins {}+{}px leave no usable height on {:?} ({}px)",
                    top, bottom, size, height
                )));
            }
        }
        Ok(())
    }
}
