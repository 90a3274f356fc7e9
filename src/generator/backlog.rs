//! The ordered word backlog fed to the layout engine.

use std::path::Path;

use crate::error::Result;

/// Words not yet consumed by a completed page, with a cursor.
///
/// The backlog never reorders words; pages take a prefix of [`remaining`](Backlog::remaining)
/// and [`advance`](Backlog::advance) past what they consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backlog {
    words: Vec<String>,
    cursor: usize,
}

impl Backlog {
    /// Backlog over the given words, in order.
    pub fn new(words: Vec<String>) -> Self {
        Self { words, cursor: 0 }
    }

    /// Parse newline-delimited words, trimming each line and skipping blank ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_synth::generator::Backlog;
    ///
    /// let backlog = Backlog::from_text("alpha\n\n  beta \r\ngamma\n");
    /// assert_eq!(backlog.remaining(), ["alpha", "beta", "gamma"]);
    /// ```
    pub fn from_text(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Read a newline-delimited UTF-8 word file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let backlog = Self::from_text(&text);
        log::info!(
            "Loaded {} words from {}",
            backlog.len(),
            path.as_ref().display()
        );
        Ok(backlog)
    }

    /// Total number of words, consumed or not.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the backlog holds no words at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Index of the next unconsumed word.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Unconsumed words in order.
    pub fn remaining(&self) -> &[String] {
        &self.words[self.cursor..]
    }

    /// True when every word has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.words.len()
    }

    /// Consume `count` words, stopping at the end.
    pub fn advance(&mut self, count: usize) {
        self.cursor = self.cursor.saturating_add(count).min(self.words.len());
    }

    /// Start again from the first word.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
