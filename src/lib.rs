// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # page_synth
//!
//! Synthetic page images with word-level annotations, for training text detection
//! and OCR models on scripts that lack labelled scans (Khmer in particular).
//!
//! A backlog of words is poured onto pages one at a time: each page gets a font,
//! size and margins, words are wrapped greedily until the page is full, the page is
//! rendered, and every placed word is written out twice:
//!
//! - as a normalized `class cx cy w h` line (YOLO-style), and
//! - as a `paragraph → line → word` XML tree with integer pixel boxes.
//!
//! Both label files come from the same layout, so they always agree with each other
//! and with the rendered ink.
//!
//! ## Modules
//!
//! - [`layout`]: the page-filling engine and the [`TextMeasure`](layout::TextMeasure) seam
//! - [`fonts`]: font discovery, loading and shaped measurement
//! - [`rendering`]: painting laid-out pages and encoding them
//! - [`annotations`]: the two label exporters
//! - [`config`]: generation parameters and presets
//! - [`generator`]: the driver tying it all together
//!
//! ## Quick Start
//!
//! ```
//! use page_synth::layout::{layout, MonospaceMeasure, PageConfig, StopReason};
//! use page_synth::annotations::{build_document, yolo};
//!
//! let page = PageConfig::new(100, 100, 10).with_margins(25, 25, 25, 25);
//! let result = layout(&["A", "BB", "CCC"], &page, &MonospaceMeasure::new(10.0, 10.0));
//!
//! assert_eq!(result.words_consumed, 3);
//! assert_eq!(result.stop, StopReason::Exhausted);
//!
//! let labels = yolo::to_text(&result.placed, result.page_width, result.page_height);
//! assert_eq!(labels.lines().count(), 3);
//!
//! let doc = build_document(&result.placed, "page_1.png", 100, 100);
//! assert_eq!(doc.word_count(), 3);
//! ```
//!
//! Generating a dataset from a word list and a font directory:
//!
//! ```no_run
//! use page_synth::config::{GeneratorConfig, OutputDirs};
//! use page_synth::fonts::FontCollection;
//! use page_synth::generator::{Backlog, DatasetWriter, Generator};
//!
//! # fn main() -> page_synth::Result<()> {
//! let config = GeneratorConfig::a4_300dpi()
//!     .with_output(OutputDirs::under("out"))
//!     .with_seed(1);
//! let fonts = FontCollection::discover("fonts")?;
//! let mut backlog = Backlog::load("words.txt")?;
//! let writer = DatasetWriter::create(config.output.clone(), config.file_prefix.clone(), config.xml_indent)?;
//!
//! let summary = Generator::new(&config, fonts)?.run(&mut backlog, &writer)?;
//! println!("{} images", summary.images);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Geometry and layout
pub mod geometry;
pub mod layout;

// Fonts and rendering
pub mod fonts;
pub mod rendering;

// Label exporters
pub mod annotations;

// Generation
pub mod config;
pub mod generator;

pub use config::{GeneratorConfig, PageSize};
pub use error::{Error, Result};
pub use layout::{LayoutResult, PageConfig, PlacedWord, StopReason};
