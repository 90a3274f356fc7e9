//! Normalized center-box export (YOLO label format).
//!
//! Each placed word becomes `0 x_center y_center width height`, all four values
//! divided by the page size and printed with six decimals.

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::layout::PlacedWord;

/// Class id written for every word.
pub const WORD_CLASS: u32 = 0;

/// A bounding box normalized to the page size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    /// Class id
    pub class_id: u32,
    /// Center x as a fraction of page width
    pub x_center: f64,
    /// Center y as a fraction of page height
    pub y_center: f64,
    /// Width as a fraction of page width
    pub width: f64,
    /// Height as a fraction of page height
    pub height: f64,
}

impl NormalizedBox {
    /// Normalize a pixel rectangle against the page dimensions.
    pub fn from_rect(rect: &Rect, page_width: u32, page_height: u32) -> Self {
        let (pw, ph) = (page_width as f64, page_height as f64);
        let (x_min, y_min) = (rect.left() as f64, rect.top() as f64);
        let (x_max, y_max) = (rect.right() as f64, rect.bottom() as f64);

        Self {
            class_id: WORD_CLASS,
            x_center: ((x_min + x_max) / 2.0) / pw,
            y_center: ((y_min + y_max) / 2.0) / ph,
            width: (x_max - x_min) / pw,
            height: (y_max - y_min) / ph,
        }
    }

    /// Scale back to a pixel rectangle.
    pub fn to_pixels(&self, page_width: u32, page_height: u32) -> Rect {
        let (pw, ph) = (page_width as f64, page_height as f64);
        let (w, h) = (self.width * pw, self.height * ph);
        let x_min = self.x_center * pw - w / 2.0;
        let y_min = self.y_center * ph - h / 2.0;
        Rect::new(x_min as f32, y_min as f32, w as f32, h as f32)
    }

    /// Format as one label line.
    pub fn to_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }

    /// Parse one label line.
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(Error::InvalidAnnotation(format!(
                "expected 5 fields, found {} in '{}'",
                fields.len(),
                line
            )));
        }

        let class_id = fields[0]
            .parse::<u32>()
            .map_err(|e| Error::InvalidAnnotation(format!("class '{}': {}", fields[0], e)))?;
        let mut values = [0.0f64; 4];
        for (slot, field) in values.iter_mut().zip(&fields[1..]) {
            *slot = field
                .parse::<f64>()
                .map_err(|e| Error::InvalidAnnotation(format!("value '{}': {}", field, e)))?;
        }

        Ok(Self {
            class_id,
            x_center: values[0],
            y_center: values[1],
            width: values[2],
            height: values[3],
        })
    }
}

/// Normalized boxes for `placed`, in the same order.
pub fn to_boxes(placed: &[PlacedWord], page_width: u32, page_height: u32) -> Vec<NormalizedBox> {
    placed
        .iter()
        .map(|word| NormalizedBox::from_rect(&word.rect, page_width, page_height))
        .collect()
}

/// One label line per placed word, in reading order.
pub fn to_lines(placed: &[PlacedWord], page_width: u32, page_height: u32) -> Vec<String> {
    to_boxes(placed, page_width, page_height)
        .iter()
        .map(NormalizedBox::to_line)
        .collect()
}

/// Label file contents: lines joined by `\n`, without a trailing newline.
pub fn to_text(placed: &[PlacedWord], page_width: u32, page_height: u32) -> String {
    to_lines(placed, page_width, page_height).join("\n")
}

/// Parse a label file, skipping blank lines.
pub fn parse_text(text: &str) -> Result<Vec<NormalizedBox>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(NormalizedBox::parse_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, rect: Rect) -> PlacedWord {
        PlacedWord {
            text: text.to_string(),
            rect,
            line_id: 1,
            paragraph_id: 1,
        }
    }

    #[test]
    fn test_from_rect() {
        let b = NormalizedBox::from_rect(&Rect::from_points(10.0, 20.0, 30.0, 60.0), 100, 200);
        assert_eq!(b.class_id, 0);
        assert!((b.x_center - 0.2).abs() < 1e-12);
        assert!((b.y_center - 0.2).abs() < 1e-12);
        assert!((b.width - 0.2).abs() < 1e-12);
        assert!((b.height - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_line_format() {
        let placed = vec![word("A", Rect::from_points(0.0, 0.0, 50.0, 25.0))];
        let lines = to_lines(&placed, 100, 100);
        assert_eq!(lines, vec!["0 0.250000 0.125000 0.500000 0.250000"]);
    }

    #[test]
    fn test_text_has_no_trailing_newline() {
        let placed = vec![
            word("A", Rect::new(0.0, 0.0, 10.0, 10.0)),
            word("B", Rect::new(10.0, 0.0, 10.0, 10.0)),
        ];
        let text = to_text(&placed, 100, 100);
        assert_eq!(text.lines().count(), 2);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_empty_page_is_empty_text() {
        assert_eq!(to_text(&[], 100, 100), "");
        assert!(parse_text("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_line() {
        let b = NormalizedBox::parse_line("0 0.250000 0.125000 0.500000 0.250000").unwrap();
        let rect = b.to_pixels(100, 100);
        assert!((rect.left() - 0.0).abs() < 1e-4);
        assert!((rect.right() - 50.0).abs() < 1e-4);
        assert!((rect.bottom() - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_parse_line_rejects_malformed() {
        assert!(NormalizedBox::parse_line("0 0.1 0.2 0.3").is_err());
        assert!(NormalizedBox::parse_line("x 0.1 0.2 0.3 0.4").is_err());
        assert!(NormalizedBox::parse_line("0 0.1 0.2 0.3 abc").is_err());
    }
}
