//! Font selection strategies.
//!
//! Each generated image is rendered in exactly one font. A [`FontSelector`] maps the
//! 1-based image number to an index into the font collection.
//!
//! - [`ParitySplit`]: odd images use fonts at odd positions, even images fonts at even positions
//! - [`UniformRandom`]: any font
//! - [`RoundRobin`]: fonts in turn
//! - [`PerFontBlock`]: a block of consecutive images per font

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::{FontPolicy, GenerationMode, GeneratorConfig};

/// Picks the font for an image.
pub trait FontSelector: Send {
    /// Font index in `0..font_count` for the 1-based `image_number`.
    ///
    /// `font_count` is never zero.
    fn select(&mut self, image_number: usize, font_count: usize, rng: &mut StdRng) -> usize;

    /// Strategy name for logging.
    fn name(&self) -> &'static str;
}

/// Odd/even split of the collection by 1-based position.
///
/// Image 1 draws from fonts 1, 3, 5, ... (indices 0, 2, 4, ...), image 2 from fonts
/// 2, 4, ... When a half is empty (a single-font collection) every font is eligible.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParitySplit;

impl FontSelector for ParitySplit {
    fn select(&mut self, image_number: usize, font_count: usize, rng: &mut StdRng) -> usize {
        // 1-based odd positions are 0-based even indices
        let start = if image_number % 2 == 1 { 0 } else { 1 };
        let eligible: Vec<usize> = (start..font_count).step_by(2).collect();
        match eligible.choose(rng) {
            Some(&index) => index,
            None => rng.random_range(0..font_count),
        }
    }

    fn name(&self) -> &'static str {
        "parity"
    }
}

/// Uniform over the whole collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRandom;

impl FontSelector for UniformRandom {
    fn select(&mut self, _image_number: usize, font_count: usize, rng: &mut StdRng) -> usize {
        rng.random_range(0..font_count)
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}

/// One image per font, cycling.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl FontSelector for RoundRobin {
    fn select(&mut self, image_number: usize, font_count: usize, _rng: &mut StdRng) -> usize {
        image_number.saturating_sub(1) % font_count
    }

    fn name(&self) -> &'static str {
        "round-robin"
    }
}

/// `images_per_font` consecutive images per font.
#[derive(Debug, Clone, Copy)]
pub struct PerFontBlock {
    images_per_font: usize,
}

impl PerFontBlock {
    /// Blocks of `images_per_font` images; zero is treated as one.
    pub fn new(images_per_font: usize) -> Self {
        Self {
            images_per_font: images_per_font.max(1),
        }
    }
}

impl FontSelector for PerFontBlock {
    fn select(&mut self, image_number: usize, font_count: usize, _rng: &mut StdRng) -> usize {
        (image_number.saturating_sub(1) / self.images_per_font) % font_count
    }

    fn name(&self) -> &'static str {
        "per-font"
    }
}

/// Build the selector for `config`.
///
/// Fixed-count generation always renders `images_per_font` consecutive images per
/// font, so [`GenerationMode::FixedCountPerFont`] uses [`PerFontBlock`] whatever
/// `font_policy` says. Otherwise the selector follows `config.font_policy`.
pub fn create_selector(config: &GeneratorConfig) -> Box<dyn FontSelector> {
    if config.mode == GenerationMode::FixedCountPerFont {
        if config.font_policy != FontPolicy::PerFont {
            log::debug!(
                "Fixed-count generation ignores font policy {:?}",
                config.font_policy
            );
        }
        return Box::new(PerFontBlock::new(config.images_per_font));
    }
    match config.font_policy {
        FontPolicy::Parity => Box::new(ParitySplit),
        FontPolicy::Uniform => Box::new(UniformRandom),
        FontPolicy::RoundRobin => Box::new(RoundRobin),
        FontPolicy::PerFont => Box::new(PerFontBlock::new(config.images_per_font)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_parity_split_respects_parity() {
        let mut rng = rng();
        let mut selector = ParitySplit;
        for image in 1..=200 {
            let index = selector.select(image, 5, &mut rng);
            assert!(index < 5);
            // 1-based position parity matches image parity
            assert_eq!((index + 1) % 2, image % 2, "image {} got font {}", image, index);
        }
    }

    #[test]
    fn test_parity_split_single_font() {
        let mut rng = rng();
        let mut selector = ParitySplit;
        assert_eq!(selector.select(1, 1, &mut rng), 0);
        assert_eq!(selector.select(2, 1, &mut rng), 0);
    }

    #[test]
    fn test_uniform_covers_all_fonts() {
        let mut rng = rng();
        let mut selector = UniformRandom;
        let mut seen = [false; 4];
        for image in 1..=400 {
            seen[selector.select(image, 4, &mut rng)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_round_robin() {
        let mut rng = rng();
        let mut selector = RoundRobin;
        let picks: Vec<usize> = (1..=7).map(|n| selector.select(n, 3, &mut rng)).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_per_font_block() {
        let mut rng = rng();
        let mut selector = PerFontBlock::new(2);
        let picks: Vec<usize> = (1..=7).map(|n| selector.select(n, 3, &mut rng)).collect();
        assert_eq!(picks, vec![0, 0, 1, 1, 2, 2, 0]);
    }

    #[test]
    fn test_create_selector() {
        let config = GeneratorConfig::a4_300dpi();
        assert_eq!(create_selector(&config).name(), "parity");
        let config = config.with_font_policy(FontPolicy::PerFont);
        assert_eq!(create_selector(&config).name(), "per-font");
    }

    #[test]
    fn test_fixed_count_mode_uses_per_font_blocks_for_every_policy() {
        let policies = [
            FontPolicy::Parity,
            FontPolicy::Uniform,
            FontPolicy::RoundRobin,
            FontPolicy::PerFont,
        ];
        for policy in policies {
            let config = GeneratorConfig::a4_300dpi()
                .with_font_policy(policy)
                .with_mode(GenerationMode::FixedCountPerFont)
                .with_images_per_font(3);
            let mut selector = create_selector(&config);
            assert_eq!(selector.name(), "per-font", "{:?}", policy);

            let mut rng = rng();
            let picks: Vec<usize> = (1..=9).map(|n| selector.select(n, 3, &mut rng)).collect();
            assert_eq!(picks, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
        }
    }
}
