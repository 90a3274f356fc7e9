//! Text measurement adapters.

use crate::geometry::{Point, Rect};

/// Measures the pixel rectangle a word occupies when drawn at `origin`.
///
/// `origin` is the pen position: x is where the word starts, y is the top of the
/// line. Implementations must be translation-invariant and deterministic, and
/// the returned rectangle must start at `origin.x` and not above `origin.y`.
pub trait TextMeasure {
    /// Rectangle of `text` drawn at `origin`.
    fn measure(&self, text: &str, origin: Point) -> Rect;
}

/// Fixed-advance metrics: every character is `advance` wide and `height` tall.
///
/// Used where no font is loaded: dry runs, tests and benchmarks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    /// Width of one character in pixels
    pub advance: f32,
    /// Height of every word in pixels
    pub height: f32,
}

impl MonospaceMeasure {
    /// Create metrics with the given character advance and word height.
    pub fn new(advance: f32, height: f32) -> Self {
        Self { advance, height }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, origin: Point) -> Rect {
        let chars = text.chars().count() as f32;
        Rect::new(origin.x, origin.y, chars * self.advance, self.height)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str, origin: Point) -> Rect {
        (**self).measure(text, origin)
    }
}
