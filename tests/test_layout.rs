//! Integration tests for the page-filling layout engine.
//!
//! Property tests drive the engine with fixed-advance metrics over random word
//! lists and page geometries.

use page_synth::layout::{layout, MonospaceMeasure, PageConfig, StopReason};
use page_synth::LayoutResult;
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn texts(result: &LayoutResult) -> Vec<&str> {
    result.placed.iter().map(|w| w.text.as_str()).collect()
}

fn line(result: &LayoutResult, line_id: u32) -> Vec<&str> {
    result
        .placed
        .iter()
        .filter(|w| w.line_id == line_id)
        .map(|w| w.text.as_str())
        .collect()
}

prop_compose! {
    fn arb_page()(
        width in 40u32..400,
        height in 40u32..400,
        left in 0u32..40,
        right in 0u32..40,
        top in 0u32..40,
        bottom in 0u32..40,
        line_spacing in 0u32..12,
        word_spacing in 0u32..8,
    ) -> PageConfig {
        PageConfig::new(width, height, 10)
            .with_margins(left, right, top, bottom)
            .with_line_spacing(line_spacing)
            .with_word_spacing(word_spacing)
    }
}

prop_compose! {
    fn arb_measure()(advance in 1u32..12, height in 4u32..30) -> MonospaceMeasure {
        MonospaceMeasure::new(advance as f32, height as f32)
    }
}

fn arb_words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 0..60)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn placed_words_are_the_used_prefix_minus_skipped(
        words in arb_words(),
        page in arb_page(),
        measure in arb_measure(),
    ) {
        let result = layout(&words, &page, &measure);
        prop_assert_eq!(result.words_consumed, result.placed.len());
        prop_assert!(result.input_used() <= words.len());
        let kept: Vec<&str> = words[..result.input_used()]
            .iter()
            .enumerate()
            .filter(|(i, _)| !result.skipped.contains(i))
            .map(|(_, w)| w.as_str())
            .collect();
        prop_assert_eq!(texts(&result), kept);
    }

    #[test]
    fn placed_words_are_in_reading_order(
        words in arb_words(),
        page in arb_page(),
        measure in arb_measure(),
    ) {
        let result = layout(&words, &page, &measure);
        if let Some(first) = result.placed.first() {
            prop_assert_eq!(first.line_id, 1);
        }
        for pair in result.placed.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.line_id == b.line_id {
                prop_assert!(a.rect.right() <= b.rect.left());
                prop_assert_eq!(a.rect.top(), b.rect.top());
            } else {
                prop_assert_eq!(b.line_id, a.line_id + 1);
                prop_assert!(b.rect.top() > a.rect.top());
            }
        }
        prop_assert!(result.placed.iter().all(|w| w.paragraph_id == 1));
    }

    #[test]
    fn placed_words_stay_inside_margins(
        words in arb_words(),
        page in arb_page(),
        measure in arb_measure(),
    ) {
        let result = layout(&words, &page, &measure);
        let area = page.content_area();
        for word in &result.placed {
            prop_assert!(area.contains_rect(&word.rect));
            prop_assert!(word.rect.left() >= page.left_margin as f32);
            prop_assert!(word.rect.right() <= (page.width - page.right_margin) as f32);
            prop_assert!(word.rect.top() >= page.top_margin as f32);
            prop_assert!(word.rect.bottom() <= (page.height - page.bottom_margin) as f32);
        }
    }

    #[test]
    fn layout_is_idempotent(
        words in arb_words(),
        page in arb_page(),
        measure in arb_measure(),
    ) {
        prop_assert_eq!(layout(&words, &page, &measure), layout(&words, &page, &measure));
    }

    #[test]
    fn stop_reason_agrees_with_input_used(
        words in arb_words(),
        page in arb_page(),
        measure in arb_measure(),
    ) {
        let result = layout(&words, &page, &measure);
        match result.stop {
            StopReason::Exhausted => prop_assert_eq!(result.input_used(), words.len()),
            StopReason::PageFull => {
                prop_assert!(result.input_used() < words.len() || words.is_empty())
            },
        }
    }

    #[test]
    fn narrow_page_skips_every_word(
        words in prop::collection::vec("[a-z]{3,8}", 1..20),
        advance in 5u32..12,
    ) {
        // Usable width 10px is narrower than any 3+ char word at 5px or more per char
        let page = PageConfig::new(30, 200, 10).with_margins(10, 10, 0, 0);
        let result = layout(&words, &page, &MonospaceMeasure::new(advance as f32, 10.0));
        prop_assert_eq!(result.words_consumed, 0);
        prop_assert!(result.placed.is_empty());
        prop_assert_eq!(result.skipped, (0..words.len()).collect::<Vec<_>>());
        prop_assert_eq!(result.stop, StopReason::Exhausted);
    }

    #[test]
    fn continuing_from_the_first_unused_word_covers_the_list(
        words in prop::collection::vec("[a-z]{1,12}", 0..200),
        measure in arb_measure(),
    ) {
        // Long words overflow the 50px line and are skipped; the rest are placed
        let page = PageConfig::new(60, 60, 10).with_margins(5, 5, 0, 0);
        let measure = MonospaceMeasure::new(measure.advance, 10.0);
        let mut start = 0;
        let mut pages = 0;
        let mut placed = 0;
        let mut skipped = 0;
        while start < words.len() {
            let result = layout(&words[start..], &page, &measure);
            prop_assert!(result.input_used() > 0);
            start += result.input_used();
            placed += result.words_consumed;
            skipped += result.skipped.len();
            pages += 1;
            prop_assert!(pages <= words.len());
        }
        prop_assert_eq!(start, words.len());
        prop_assert_eq!(placed + skipped, words.len());
        let too_wide = words
            .iter()
            .filter(|w| w.len() as f32 * measure.advance > 50.0)
            .count();
        prop_assert_eq!(skipped, too_wide);
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_three_words_wrap_onto_second_line() {
    // 50px usable: "A"+"BB" is 30px, adding "CCC" makes 60px
    let page = PageConfig::new(100, 100, 10).with_margins(25, 25, 25, 25);
    let result = layout(&["A", "BB", "CCC"], &page, &MonospaceMeasure::new(10.0, 10.0));

    assert_eq!(line(&result, 1), vec!["A", "BB"]);
    assert_eq!(line(&result, 2), vec!["CCC"]);
    assert!(result.placed.iter().all(|w| w.paragraph_id == 1));
    assert_eq!(result.words_consumed, 3);
    assert_eq!(result.line_count(), 2);
}

#[test]
fn test_one_line_page_consumes_only_first_line() {
    // 20px tall words, 30px of vertical room, 80px wide lines
    let page = PageConfig::new(100, 100, 10)
        .with_margins(10, 10, 10, 60)
        .with_line_spacing(4);
    let words = ["one", "two", "three", "four", "five", "six"];
    let result = layout(&words, &page, &MonospaceMeasure::new(8.0, 20.0));

    let first_line = line(&result, 1);
    assert_eq!(result.words_consumed, first_line.len());
    assert_eq!(first_line, vec!["one", "two"]);
    assert_eq!(result.stop, StopReason::PageFull);
}

#[test]
fn test_too_wide_word_mid_page_is_skipped_in_place() {
    let page = PageConfig::new(60, 200, 10);
    let measure = MonospaceMeasure::new(10.0, 10.0);
    let words = ["ab", "cdefghij", "k"];

    let result = layout(&words, &page, &measure);
    assert_eq!(result.skipped, vec![1]);
    assert_eq!(line(&result, 1), vec!["ab", "k"]);
    assert_eq!(result.placed[1].rect.x, 20.0);
    assert_eq!(result.input_used(), 3);
    assert_eq!(result.stop, StopReason::Exhausted);
}

#[test]
fn test_one_oversized_word_does_not_split_the_page() {
    // Ten short words fit on one page; a huge word at index 3 must not end it
    let page = PageConfig::new(200, 200, 10).with_margins(10, 10, 10, 10).with_word_spacing(5);
    let measure = MonospaceMeasure::new(8.0, 12.0);
    let mut words: Vec<String> = (0..10).map(|i| format!("w{}", i)).collect();
    words.insert(3, "x".repeat(500));

    let result = layout(&words, &page, &measure);
    assert_eq!(result.skipped, vec![3]);
    assert_eq!(result.words_consumed, 10);
    assert_eq!(result.input_used(), words.len());
    assert_eq!(result.stop, StopReason::Exhausted);
    assert!(!texts(&result).contains(&words[3].as_str()));
}

#[test]
fn test_zero_usable_height_is_full_immediately() {
    let page = PageConfig::new(100, 100, 10).with_margins(0, 0, 60, 40);
    let result = layout(&["a"], &page, &MonospaceMeasure::new(5.0, 5.0));
    assert!(result.is_empty());
    assert_eq!(result.stop, StopReason::PageFull);
    assert!(page.validate().is_err());
}

#[test]
fn test_empty_word_list() {
    let page = PageConfig::new(100, 100, 10);
    let words: Vec<String> = Vec::new();
    let result = layout(&words, &page, &MonospaceMeasure::new(5.0, 5.0));
    assert!(result.is_empty());
    assert_eq!(result.stop, StopReason::Exhausted);
    assert_eq!(result.page_width, 100);
    assert_eq!(result.page_height, 100);
}
