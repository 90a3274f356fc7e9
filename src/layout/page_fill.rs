//! Greedy line-fill pagination.

use log::debug;

use super::{LayoutResult, PageConfig, PlacedWord, StopReason, TextMeasure};
use crate::geometry::Point;

/// Paragraph id assigned to every word; paragraphs are not inferred from input.
const PARAGRAPH_ID: i32 = 1;

/// Lay out as many leading `words` as fit on one page.
///
/// Words are placed left to right from the top-left corner of the content area.
/// A word that would cross the right margin moves to a new line, which starts
/// `word_height + line_spacing` below the current one, where `word_height` is the
/// height of the word being moved.
///
/// A word wider than the usable width fits on no line. It is recorded in
/// [`LayoutResult::skipped`] and layout carries on with the next word at the same
/// cursor position. Layout stops, without consuming the word, when the word's
/// rectangle would cross the bottom margin ([`StopReason::PageFull`]).
///
/// The first unused word is `words[result.input_used()]`. Configurations with no
/// usable width or height return an empty page immediately.
pub fn layout<S, M>(words: &[S], config: &PageConfig, measure: &M) -> LayoutResult
where
    S: AsRef<str>,
    M: TextMeasure + ?Sized,
{
    let mut result = LayoutResult {
        placed: Vec::new(),
        words_consumed: 0,
        skipped: Vec::new(),
        page_width: config.width,
        page_height: config.height,
        stop: StopReason::Exhausted,
    };

    if config.usable_width() == 0 || config.usable_height() == 0 {
        result.stop = StopReason::PageFull;
        return result;
    }

    let left = config.left_margin as f32;
    let usable_width = config.usable_width() as f32;
    let right_limit = left + usable_width;
    let bottom_limit = (config.height - config.bottom_margin) as f32;
    let line_spacing = config.line_spacing as f32;
    let word_spacing = config.word_spacing as f32;

    let mut x = left;
    let mut y = config.top_margin as f32;
    let mut line_id = 1u32;
    let mut line_has_words = false;

    for (index, word) in words.iter().enumerate() {
        let text = word.as_ref();
        let mut rect = measure.measure(text, Point::new(x, y));

        if rect.width > usable_width {
            debug!("skipping '{}': wider than the usable width {}", text, config.usable_width());
            result.skipped.push(index);
            continue;
        }

        if line_has_words && rect.right() > right_limit {
            line_id += 1;
            x = left;
            y += rect.height + line_spacing;
            rect = measure.measure(text, Point::new(x, y));
        }

        if rect.bottom() > bottom_limit {
            result.stop = StopReason::PageFull;
            break;
        }

        result.placed.push(PlacedWord {
            text: text.to_string(),
            rect,
            line_id,
            paragraph_id: PARAGRAPH_ID,
        });
        line_has_words = true;
        x += rect.width + word_spacing;
    }

    result.words_consumed = result.placed.len();
    debug!(
        "layout placed {} and skipped {} of {} words on {} lines ({:?})",
        result.words_consumed,
        result.skipped.len(),
        words.len(),
        result.line_count(),
        result.stop
    );
    result
}
