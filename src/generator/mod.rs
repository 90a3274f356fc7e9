//! Dataset generation driver.
//!
//! The [`Generator`] repeatedly plans a page (font, size, page size, margins), lays
//! out the front of the [`Backlog`] with the chosen font, renders the result and
//! hands it to a [`DatasetWriter`]. Images are numbered from 1 and the counter
//! only advances when a page is actually written.

mod backlog;
mod dataset;
mod selection;

pub use backlog::Backlog;
pub use dataset::{DatasetWriter, WrittenPage};
pub use selection::{
    create_selector, FontSelector, ParitySplit, PerFontBlock, RoundRobin, UniformRandom,
};

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::config::{GenerationMode, GeneratorConfig, PageSize};
use crate::error::{Error, Result};
use crate::fonts::{FontCollection, FontFile};
use crate::layout::{layout, LayoutResult, PageConfig};
use crate::rendering::{ImageFormat, PageRenderer, RenderOptions, RenderedImage};

/// Randomized choices for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// 1-based image number
    pub image_number: usize,
    /// Index into the font collection
    pub font_index: usize,
    /// Paper size the page was drawn from
    pub page_size: PageSize,
    /// Pixel geometry handed to the layout engine
    pub page: PageConfig,
}

/// A laid-out and rendered page, not yet written.
#[derive(Debug)]
pub struct GeneratedPage {
    /// Choices made for this page
    pub plan: PagePlan,
    /// Layout of the backlog prefix
    pub layout: LayoutResult,
    /// Encoded page, absent when nothing was placed
    pub image: Option<RenderedImage>,
    /// Encoded page with word boxes drawn, when debug output is configured
    pub debug: Option<RenderedImage>,
}

/// Totals for a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Images written
    pub images: usize,
    /// Words placed across all images
    pub words_placed: usize,
    /// Words skipped because they fit on no line
    pub words_dropped: usize,
    /// Words in the backlog
    pub total_words: usize,
    /// Times the backlog was restarted from the first word
    pub rewinds: usize,
}

/// Generates pages for a font collection under one configuration.
pub struct Generator<'c> {
    config: &'c GeneratorConfig,
    fonts: FontCollection,
    selector: Box<dyn FontSelector>,
    rng: StdRng,
    loaded: HashMap<usize, FontFile>,
    renderer: PageRenderer,
}

impl<'c> Generator<'c> {
    /// Validate `config` and prepare a generator over `fonts`.
    ///
    /// Uses the configured seed, or OS entropy when none is set.
    pub fn new(config: &'c GeneratorConfig, fonts: FontCollection) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let options = match config.image_format {
            ImageFormat::Png => RenderOptions::default(),
            ImageFormat::Jpeg => RenderOptions::default().as_jpeg(config.jpeg_quality),
        };
        let selector = create_selector(config);
        log::debug!(
            "Generator: {} fonts, {} selection, {:?}",
            fonts.len(),
            selector.name(),
            config.mode
        );

        Ok(Self {
            config,
            fonts,
            selector,
            rng,
            loaded: HashMap::new(),
            renderer: PageRenderer::new(options),
        })
    }

    /// Replace the font selection strategy.
    pub fn with_selector(mut self, selector: Box<dyn FontSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &GeneratorConfig {
        self.config
    }

    /// Font collection in use.
    pub fn fonts(&self) -> &FontCollection {
        &self.fonts
    }

    /// Pick font, font size, page size and margins for image `image_number`.
    pub fn plan_page(&mut self, image_number: usize) -> Result<PagePlan> {
        let config = self.config;
        let font_index = self
            .selector
            .select(image_number, self.fonts.len(), &mut self.rng);
        let page_size = *config
            .page_sizes
            .choose(&mut self.rng)
            .ok_or_else(|| Error::config("at least one page size is required"))?;
        let (width, height) = page_size.to_pixels(config.dpi);

        let (size_min, size_max) = config.font_size_px();
        let (left_min, left_max) = config.left_margin_px();
        let (right_min, right_max) = config.right_margin_px();
        let (top, bottom) = config.vertical_margins_px();

        let font_size = self.rng.random_range(size_min..=size_max);
        let left = self.rng.random_range(left_min..=left_max);
        let right = self.rng.random_range(right_min..=right_max);

        let page = PageConfig::new(width, height, font_size)
            .with_margins(left, right, top, bottom)
            .with_line_spacing(config.line_spacing())
            .with_word_spacing(config.word_spacing_px);
        page.validate()?;

        log::debug!(
            "Image {}: font {} at {}px, {:?} {}x{}, margins l={} r={} t={} b={}",
            image_number,
            font_index,
            font_size,
            page_size,
            width,
            height,
            left,
            right,
            top,
            bottom
        );

        Ok(PagePlan {
            image_number,
            font_index,
            page_size,
            page,
        })
    }

    /// Plan image `image_number`, lay out `words` and render the placed prefix.
    pub fn generate_page<S: AsRef<str>>(
        &mut self,
        words: &[S],
        image_number: usize,
    ) -> Result<GeneratedPage> {
        let plan = self.plan_page(image_number)?;
        let file = cached_font(&mut self.loaded, &self.fonts, plan.font_index)?;
        let font = file.at_size(plan.page.font_size)?;

        let result = layout(words, &plan.page, &font);
        if result.is_empty() {
            return Ok(GeneratedPage {
                plan,
                layout: result,
                image: None,
                debug: None,
            });
        }

        let mut pixmap = self.renderer.paint(&result, &font)?;
        let image = self.renderer.encode(&pixmap)?;
        let debug = if self.config.output.debug.is_some() {
            self.renderer.outline_words(&mut pixmap, &result);
            Some(self.renderer.encode(&pixmap)?)
        } else {
            None
        };

        Ok(GeneratedPage {
            plan,
            layout: result,
            image: Some(image),
            debug,
        })
    }

    /// Generate pages from `backlog` until the configured mode is satisfied.
    ///
    /// In [`GenerationMode::ExhaustOnce`] the run ends when every word has been
    /// consumed. In [`GenerationMode::FixedCountPerFont`] it ends after
    /// `fonts × images_per_font` images, restarting the backlog whenever it runs out.
    ///
    /// A word wider than the usable width is skipped with a warning and counted
    /// in [`RunSummary::words_dropped`]; the rest of its page is still filled.
    /// A page whose first line does not fit vertically, or a full pass over the
    /// word list that places nothing, is a configuration error.
    pub fn run(&mut self, backlog: &mut Backlog, writer: &DatasetWriter) -> Result<RunSummary> {
        let mut summary = RunSummary {
            total_words: backlog.len(),
            ..Default::default()
        };

        let target = match self.config.mode {
            GenerationMode::ExhaustOnce => None,
            GenerationMode::FixedCountPerFont => {
                if backlog.is_empty() {
                    return Err(Error::config(
                        "fixed-count generation needs a non-empty word list",
                    ));
                }
                Some(self.fonts.len() * self.config.images_per_font)
            },
        };
        if backlog.is_empty() {
            log::warn!("Word list is empty, nothing to generate");
            return Ok(summary);
        }

        let mut placed_this_pass = 0;
        loop {
            match target {
                Some(total) if summary.images >= total => break,
                None if backlog.is_exhausted() => break,
                _ => {},
            }
            if backlog.is_exhausted() {
                if placed_this_pass == 0 {
                    return Err(Error::config(
                        "no word in the list fits on a line with this configuration",
                    ));
                }
                backlog.rewind();
                summary.rewinds += 1;
                placed_this_pass = 0;
                log::info!("Word list exhausted, starting again ({} passes)", summary.rewinds);
            }

            let image_number = summary.images + 1;
            let page = self.generate_page(backlog.remaining(), image_number)?;

            for &index in &page.layout.skipped {
                let word = backlog.remaining().get(index).map(String::as_str).unwrap_or_default();
                log::warn!(
                    "Skipping '{}': wider than the line on a {}px page",
                    word,
                    page.plan.page.width
                );
            }
            summary.words_dropped += page.layout.skipped.len();

            let used = page.layout.input_used();
            if used == 0 {
                return Err(Error::config(format!(
                    "first line does not fit on a {}x{}px page at {}px",
                    page.plan.page.width, page.plan.page.height, page.plan.page.font_size
                )));
            }
            if page.layout.is_empty() {
                backlog.advance(used);
                continue;
            }

            let Some(image) = page.image.as_ref() else {
                return Err(Error::Render(format!(
                    "image {} placed words but was not rendered",
                    image_number
                )));
            };
            let written =
                writer.write_page(image_number, &page.layout, image, page.debug.as_ref())?;
            backlog.advance(used);
            placed_this_pass += page.layout.words_consumed;
            summary.images += 1;
            summary.words_placed += page.layout.words_consumed;

            log::info!(
                "{} ({} words, {} lines, font {}) {}/{} words used",
                written.image.display(),
                page.layout.words_consumed,
                page.layout.line_count(),
                self.fonts
                    .name(page.plan.font_index)
                    .unwrap_or_default(),
                backlog.position(),
                backlog.len()
            );
        }

        log::info!(
            "Generated {} images: {} words placed, {} dropped",
            summary.images,
            summary.words_placed,
            summary.words_dropped
        );
        Ok(summary)
    }
}

fn cached_font<'a>(
    loaded: &'a mut HashMap<usize, FontFile>,
    fonts: &FontCollection,
    index: usize,
) -> Result<&'a FontFile> {
    if !loaded.contains_key(&index) {
        let file = fonts.load(index)?;
        log::debug!("Loaded font {}", file.name());
        loaded.insert(index, file);
    }
    loaded
        .get(&index)
        .ok_or_else(|| Error::Font(format!("font {} not loaded", index)))
}

impl std::fmt::Debug for Generator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("fonts", &self.fonts)
            .field("selector", &self.selector.name())
            .field("loaded", &self.loaded.len())
            .finish()
    }
}
