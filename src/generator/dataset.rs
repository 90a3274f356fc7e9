//! Writing images and their label files to disk.

use std::path::PathBuf;

use crate::annotations::{build_document, yolo};
use crate::config::OutputDirs;
use crate::error::Result;
use crate::layout::LayoutResult;
use crate::rendering::RenderedImage;

/// Paths of the files written for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    /// Rendered image
    pub image: PathBuf,
    /// Normalized-box label file
    pub labels: PathBuf,
    /// XML label file
    pub xml: PathBuf,
    /// Debug overlay, when one was written
    pub debug: Option<PathBuf>,
}

/// Writes `<prefix>_<n>` image, `.txt` and `.xml` triples into the output directories.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    dirs: OutputDirs,
    prefix: String,
    xml_indent: usize,
}

impl DatasetWriter {
    /// Create the output directories if needed.
    pub fn create(dirs: OutputDirs, prefix: impl Into<String>, xml_indent: usize) -> Result<Self> {
        std::fs::create_dir_all(&dirs.images)?;
        std::fs::create_dir_all(&dirs.labels)?;
        std::fs::create_dir_all(&dirs.xml_labels)?;
        if let Some(debug) = &dirs.debug {
            std::fs::create_dir_all(debug)?;
        }
        Ok(Self {
            dirs,
            prefix: prefix.into(),
            xml_indent,
        })
    }

    /// Output directories.
    pub fn dirs(&self) -> &OutputDirs {
        &self.dirs
    }

    /// File stem for image `number`, e.g. `kh_data_7`.
    pub fn base_name(&self, number: usize) -> String {
        format!("{}_{}", self.prefix, number)
    }

    /// Write image `number` and both label files from the same layout.
    ///
    /// Annotations always describe `layout`; the image is expected to have been
    /// rendered from it at the layout's page size.
    pub fn write_page(
        &self,
        number: usize,
        layout: &LayoutResult,
        image: &RenderedImage,
        debug: Option<&RenderedImage>,
    ) -> Result<WrittenPage> {
        let base = self.base_name(number);
        let image_name = format!("{}.{}", base, image.format.extension());

        let image_path = self.dirs.images.join(&image_name);
        image.save(&image_path)?;

        let labels_path = self.dirs.labels.join(format!("{}.txt", base));
        let labels = yolo::to_text(&layout.placed, layout.page_width, layout.page_height);
        std::fs::write(&labels_path, labels)?;

        let xml_path = self.dirs.xml_labels.join(format!("{}.xml", base));
        let document = build_document(
            &layout.placed,
            &image_name,
            layout.page_width,
            layout.page_height,
        );
        std::fs::write(&xml_path, document.to_xml_with_indent(self.xml_indent)?)?;

        let debug_path = match (debug, &self.dirs.debug) {
            (Some(overlay), Some(dir)) => {
                let path = dir.join(&image_name);
                overlay.save(&path)?;
                Some(path)
            }
            _ => None,
        };

        log::debug!("Wrote {} ({} words)", image_path.display(), layout.placed.len());
        Ok(WrittenPage {
            image: image_path,
            labels: labels_path,
            xml: xml_path,
            debug: debug_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotationDocument;
    use crate::layout::{layout, MonospaceMeasure, PageConfig};
    use crate::rendering::ImageFormat;

    fn fake_image(width: u32, height: u32) -> RenderedImage {
        RenderedImage {
            data: vec![0x89, b'P', b'N', b'G'],
            width,
            height,
            format: ImageFormat::Png,
        }
    }

    #[test]
    fn test_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::create(OutputDirs::under(dir.path()), "kh_data", 0).unwrap();
        assert_eq!(writer.base_name(12), "kh_data_12");
    }

    #[test]
    fn test_write_page_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::create(OutputDirs::under(dir.path()), "kh_data", 0).unwrap();
        let config = PageConfig::new(100, 100, 10).with_margins(25, 25, 25, 25);
        let result = layout(&["A", "BB", "CCC"], &config, &MonospaceMeasure::new(10.0, 10.0));

        let written = writer.write_page(1, &result, &fake_image(100, 100), None).unwrap();
        assert_eq!(written.image, dir.path().join("images/kh_data_1.png"));
        assert!(written.image.exists());
        assert!(written.debug.is_none());

        let labels = std::fs::read_to_string(&written.labels).unwrap();
        assert_eq!(labels.lines().count(), result.placed.len());
        assert!(!labels.ends_with('\n'));

        let xml = std::fs::read_to_string(&written.xml).unwrap();
        let doc = AnnotationDocument::from_xml(&xml).unwrap();
        assert_eq!(doc.image, "kh_data_1.png");
        assert_eq!(doc.word_count(), result.placed.len());
    }

    #[test]
    fn test_write_debug_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = OutputDirs::under(dir.path()).with_debug();
        let writer = DatasetWriter::create(dirs, "p", 0).unwrap();
        let config = PageConfig::new(50, 50, 10);
        let result = layout(&["x"], &config, &MonospaceMeasure::new(10.0, 10.0));
        let image = fake_image(50, 50);

        let written = writer.write_page(3, &result, &image, Some(&image)).unwrap();
        let debug = written.debug.unwrap();
        assert_eq!(debug, dir.path().join("debug_boxes/p_3.png"));
        assert!(debug.exists());
    }
}
