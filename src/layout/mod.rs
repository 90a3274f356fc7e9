//! Page layout engine.
//!
//! This module turns an ordered sequence of words into placed words on a single
//! page using greedy first-fit line breaking:
//! - Words keep their input order (line-major, then left-to-right)
//! - A word that overflows the current line is retried once on the next line
//! - A word wider than the usable width is skipped and layout continues
//! - Layout stops at the first word that no longer fits vertically
//!
//! The engine is a pure function of its inputs. Measuring text is delegated to a
//! [`TextMeasure`] implementation so the same algorithm runs against real fonts
//! and against deterministic metrics in tests.

pub mod measure;
pub mod page_fill;

pub use measure::{MonospaceMeasure, TextMeasure};
pub use page_fill::layout;

use crate::error::{Error, Result};
use crate::geometry::Rect;

/// Immutable per-page configuration, fixed for the duration of one layout call.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Left margin in pixels
    pub left_margin: u32,
    /// Right margin in pixels
    pub right_margin: u32,
    /// Top margin in pixels
    pub top_margin: u32,
    /// Bottom margin in pixels
    pub bottom_margin: u32,
    /// Font size in pixels
    pub font_size: u32,
    /// Extra vertical space between lines in pixels
    pub line_spacing: u32,
    /// Horizontal space inserted after each word in pixels
    pub word_spacing: u32,
}

impl PageConfig {
    /// Create a page with zero margins and spacing.
    pub fn new(width: u32, height: u32, font_size: u32) -> Self {
        Self {
            width,
            height,
            left_margin: 0,
            right_margin: 0,
            top_margin: 0,
            bottom_margin: 0,
            font_size,
            line_spacing: 0,
            word_spacing: 0,
        }
    }

    /// Set all four margins.
    pub fn with_margins(mut self, left: u32, right: u32, top: u32, bottom: u32) -> Self {
        self.left_margin = left;
        self.right_margin = right;
        self.top_margin = top;
        self.bottom_margin = bottom;
        self
    }

    /// Set the extra space between lines.
    pub fn with_line_spacing(mut self, spacing: u32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set the space inserted after each word.
    pub fn with_word_spacing(mut self, spacing: u32) -> Self {
        self.word_spacing = spacing;
        self
    }

    /// Canvas width minus the left and right margins (saturating at 0).
    pub fn usable_width(&self) -> u32 {
        self.width
            .saturating_sub(self.left_margin)
            .saturating_sub(self.right_margin)
    }

    /// Canvas height minus the top and bottom margins (saturating at 0).
    pub fn usable_height(&self) -> u32 {
        self.height
            .saturating_sub(self.top_margin)
            .saturating_sub(self.bottom_margin)
    }

    /// The region words may occupy.
    pub fn content_area(&self) -> Rect {
        Rect::new(
            self.left_margin as f32,
            self.top_margin as f32,
            self.usable_width() as f32,
            self.usable_height() as f32,
        )
    }

    /// Reject configurations that cannot hold a single word.
    ///
    /// Layout itself never loops on a bad configuration, but a driver that keeps
    /// calling it with zero usable space would; callers validate first.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::config(format!(
                "page dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.font_size == 0 {
            return Err(Error::config("font size must be positive"));
        }
        if self.usable_width() == 0 {
            return Err(Error::config(format!(
                "margins {}+{} leave no usable width on a {}px page",
                self.left_margin, self.right_margin, self.width
            )));
        }
        if self.usable_height() == 0 {
            return Err(Error::config(format!(
                "margins {}+{} leave no usable height on a {}px page",
                self.top_margin, self.bottom_margin, self.height
            )));
        }
        Ok(())
    }
}

/// A word placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    /// The original word
    pub text: String,
    /// Pixel rectangle of the rendered word
    pub rect: Rect,
    /// 1-based line number on the page
    pub line_id: u32,
    /// 1-based paragraph number on the page
    pub paragraph_id: i32,
}

/// Why a layout call stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every input word was placed or skipped (including the empty-input case)
    Exhausted,
    /// The next word does not fit in the remaining vertical space
    PageFull,
}

/// Output of one layout call.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Placed words in reading order
    pub placed: Vec<PlacedWord>,
    /// Number of input words placed; always equal to `placed.len()`
    pub words_consumed: usize,
    /// Input indices of words skipped for being wider than the usable width
    pub skipped: Vec<usize>,
    /// Canvas width used
    pub page_width: u32,
    /// Canvas height used
    pub page_height: u32,
    /// Why layout stopped
    pub stop: StopReason,
}

impl LayoutResult {
    /// Whether nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Number of distinct lines on the page.
    pub fn line_count(&self) -> usize {
        self.placed.last().map(|w| w.line_id as usize).unwrap_or(0)
    }

    /// Length of the input prefix this page used, placed and skipped words together.
    ///
    /// The next page starts at `words[result.input_used()]`.
    pub fn input_used(&self) -> usize {
        self.words_consumed + self.skipped.len()
    }
}
