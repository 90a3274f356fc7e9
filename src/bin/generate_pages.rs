//! Synthetic page dataset generator
//!
//! Pours a word list onto pages, renders them with fonts from a directory and
//! writes an image, a normalized-box label file and an XML label file per page.
//!
//! # Usage
//!
//! ```bash
//! # One pass over the word list, A4 at 300 DPI
//! generate_pages --words words.txt --fonts fonts/ --output dataset/
//!
//! # 100 images per font, reproducible
//! generate_pages --words words.txt --fonts fonts/ --output dataset/ \
//!     --mode per-font --images-per-font 100 --seed 7
//!
//! # Low-resolution pages with word boxes drawn for inspection
//! RUST_LOG=debug generate_pages --words words.txt --fonts fonts/ --output dataset/ \
//!     --preset a4-96 --debug-boxes
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use page_synth::config::{FontPolicy, GenerationMode, GeneratorConfig, OutputDirs};
use page_synth::fonts::FontCollection;
use page_synth::generator::{Backlog, DatasetWriter, Generator, RunSummary};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// A4, 300 DPI, 12-15 pt
    #[value(name = "a4-300")]
    A4At300,
    /// A4, 96 DPI, 9-13 px
    #[value(name = "a4-96")]
    A4At96,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Stop when every word has been used once
    Exhaust,
    /// Fixed number of images per font
    PerFont,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Odd images use odd fonts, even images even fonts
    Parity,
    /// Any font at random
    Uniform,
    /// Fonts in turn
    RoundRobin,
    /// Consecutive blocks of images per font
    PerFont,
}

/// Generate synthetic page images with word annotations
#[derive(Parser, Debug)]
#[command(name = "generate_pages")]
#[command(version, about, long_about = None)]
struct Args {
    /// Newline-delimited word list (UTF-8)
    #[arg(short, long)]
    words: PathBuf,

    /// Directory of .ttf/.otf fonts
    #[arg(short, long)]
    fonts: PathBuf,

    /// Dataset root; images/, labels/ and xml_labels/ are created inside
    #[arg(short, long, default_value = "dataset")]
    output: PathBuf,

    /// Built-in configuration
    #[arg(long, value_enum, default_value = "a4-300")]
    preset: Preset,

    /// JSON configuration file (replaces the preset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generation mode
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Images per font in per-font mode
    #[arg(long)]
    images_per_font: Option<usize>,

    /// Font selection policy
    #[arg(long, value_enum)]
    policy: Option<Policy>,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Space after each word in pixels
    #[arg(long)]
    word_spacing: Option<u32>,

    /// Write JPEG instead of PNG
    #[arg(long)]
    jpeg: bool,

    /// Also write pages with word boxes drawn to debug_boxes/
    #[arg(long)]
    debug_boxes: bool,

    /// File name prefix
    #[arg(long)]
    prefix: Option<String>,
}

impl Args {
    fn build_config(&self) -> page_synth::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)?,
            None => match self.preset {
                Preset::A4At300 => GeneratorConfig::a4_300dpi(),
                Preset::A4At96 => GeneratorConfig::a4_96dpi(),
            },
        };

        let mut output = OutputDirs::under(&self.output);
        if self.debug_boxes {
            output = output.with_debug();
        }
        config = config.with_output(output);

        if let Some(mode) = self.mode {
            config = config.with_mode(match mode {
                Mode::Exhaust => GenerationMode::ExhaustOnce,
                Mode::PerFont => GenerationMode::FixedCountPerFont,
            });
        }
        if let Some(count) = self.images_per_font {
            config = config.with_images_per_font(count);
        }
        if let Some(policy) = self.policy {
            config = config.with_font_policy(match policy {
                Policy::Parity => FontPolicy::Parity,
                Policy::Uniform => FontPolicy::Uniform,
                Policy::RoundRobin => FontPolicy::RoundRobin,
                Policy::PerFont => FontPolicy::PerFont,
            });
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(spacing) = self.word_spacing {
            config = config.with_word_spacing(spacing);
        }
        if self.jpeg {
            let quality = config.jpeg_quality;
            config = config.with_jpeg(quality);
        }
        if let Some(prefix) = &self.prefix {
            config.file_prefix = prefix.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(args: &Args) -> page_synth::Result<RunSummary> {
    let config = args.build_config()?;
    let fonts = FontCollection::discover(&args.fonts)?;
    let mut backlog = Backlog::load(&args.words)?;
    let writer = DatasetWriter::create(
        config.output.clone(),
        config.file_prefix.clone(),
        config.xml_indent,
    )?;

    println!("Words:  {} ({})", backlog.len(), args.words.display());
    println!("Fonts:  {} ({})", fonts.len(), args.fonts.display());
    println!("Output: {}", args.output.display());
    println!();

    let mut generator = Generator::new(&config, fonts)?;
    generator.run(&mut backlog, &writer)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let start = Instant::now();

    match run(&args) {
        Ok(summary) => {
            println!("Summary");
            println!("=======");
            println!("Images generated: {}", summary.images);
            println!("Words placed:     {}/{}", summary.words_placed, summary.total_words);
            println!("Words dropped:    {}", summary.words_dropped);
            if summary.rewinds > 0 {
                println!("Word list passes: {}", summary.rewinds + 1);
            }
            println!("Time:             {:.2?}", start.elapsed());
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
