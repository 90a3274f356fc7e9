//! Annotation exporters for laid-out pages.
//!
//! Two sibling formats are produced from the same [`LayoutResult`](crate::layout::LayoutResult):
//!
//! - [`yolo`]: one normalized `class cx cy w h` line per word, flat, in reading order
//! - [`xml`]: a `metadata → paragraph → line → word` tree with integer pixel boxes
//!
//! Both exporters read geometry only from the placed words they are given; callers
//! must feed both from the same layout call so the two files never disagree.

pub mod xml;
pub mod yolo;

pub use xml::{build_document, AnnotationDocument, LineNode, ParagraphNode, WordNode};
pub use yolo::{NormalizedBox, WORD_CLASS};
