//! Error types for the page generator.
//!
//! This module defines all error types that can occur while planning, laying out,
//! rendering and persisting synthetic pages. Dropped words are not errors; they are
//! reported through [`LayoutResult::skipped`](crate::layout::LayoutResult::skipped).

use std::path::PathBuf;

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during page generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Page or generator configuration that cannot produce a page
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Font file could not be parsed or resolved at the requested size
    #[error("Font error: {0}")]
    Font(String),

    /// Font directory contains no usable font files
    #[error("No .ttf/.otf fonts found in {}", .0.display())]
    EmptyFontCollection(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML serialization or parse error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed annotation document
    #[error("Invalid annotation document: {0}")]
    InvalidAnnotation(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Canvas allocation or painting error
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration file parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::Configuration`] with a formatted message.
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}
