//! Font discovery and loading.
//!
//! Fonts come from a directory of `.ttf`/`.otf` files. The collection only holds
//! paths; a [`FontFile`] owns the bytes of one font and hands out
//! [`ShapedFont`]s, which measure and outline text at a pixel size.

mod shaped;

pub use shaped::{GlyphPosition, PathSink, ShapedFont, ShapedRun};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// An ordered set of font files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontCollection {
    paths: Vec<PathBuf>,
}

impl FontCollection {
    /// Enumerate font files in `dir`, sorted by path.
    ///
    /// Only regular files with a `.ttf` or `.otf` extension (any case) are
    /// considered; subdirectories are not searched.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_font_file(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(Error::EmptyFontCollection(dir.to_path_buf()));
        }

        log::info!("Loaded {} fonts from {}", paths.len(), dir.display());
        for (i, path) in paths.iter().enumerate() {
            log::debug!("  {}. {}", i + 1, path.display());
        }

        Ok(Self { paths })
    }

    /// Build a collection from known paths, keeping their order.
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self> {
        if paths.is_empty() {
            return Err(Error::EmptyFontCollection(PathBuf::new()));
        }
        Ok(Self { paths })
    }

    /// Number of fonts.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false; empty collections are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// All font paths in order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Path of font `index`.
    pub fn path(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    /// File name of font `index` without its extension.
    pub fn name(&self, index: usize) -> Option<String> {
        self.path(index).map(font_stem)
    }

    /// Read and validate font `index`.
    pub fn load(&self, index: usize) -> Result<FontFile> {
        let path = self.path(index).ok_or_else(|| {
            Error::config(format!(
                "font index {} out of range for {} fonts",
                index,
                self.len()
            ))
        })?;
        FontFile::load(path)
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FONT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn font_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// A font file held in memory.
#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
    data: Vec<u8>,
    family: Option<String>,
}

impl FontFile {
    /// Read a font from disk and check that it parses.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Self::from_bytes(path, data)
    }

    /// Wrap font bytes already in memory; `path` is used for naming only.
    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>) -> Result<Self> {
        let path = path.into();
        if data.is_empty() {
            return Err(Error::Font(format!("{} is empty", path.display())));
        }

        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| Error::Font(format!("{}: {}", path.display(), e)))?;
        if face.units_per_em() == 0 {
            return Err(Error::Font(format!("{}: units per em is 0", path.display())));
        }

        let family = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
            .find_map(|name| name.to_string());

        Ok(Self { path, data, family })
    }

    /// Path the font was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension.
    pub fn name(&self) -> String {
        font_stem(&self.path)
    }

    /// Family name from the `name` table, if present.
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Raw font bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Prepare the font for measuring and painting at `size_px` pixels per em.
    pub fn at_size(&self, size_px: u32) -> Result<ShapedFont<'_>> {
        ShapedFont::new(&self.data, size_px as f32).map_err(|e| match e {
            Error::Font(msg) => {
                Error::Font(format!("{} at {}px: {}", self.path.display(), size_px, msg))
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_font_file() {
        assert!(is_font_file(Path::new("fonts/Battambang.ttf")));
        assert!(is_font_file(Path::new("fonts/Hanuman.OTF")));
        assert!(!is_font_file(Path::new("fonts/readme.txt")));
        assert!(!is_font_file(Path::new("fonts/ttf")));
    }

    #[test]
    fn test_discover_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.ttf", "a.TTF", "c.otf", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.ttf")).unwrap();

        let fonts = FontCollection::discover(dir.path()).unwrap();
        let names: Vec<String> = (0..fonts.len()).filter_map(|i| fonts.name(i)).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_discover_empty_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = FontCollection::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::EmptyFontCollection(_)));
    }

    #[test]
    fn test_discover_missing_dir_is_io_error() {
        let err = FontCollection::discover("/definitely/not/a/font/dir").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_paths_rejects_empty() {
        assert!(FontCollection::from_paths(Vec::new()).is_err());
        let fonts = FontCollection::from_paths(vec![PathBuf::from("x.ttf")]).unwrap();
        assert_eq!(fonts.len(), 1);
        assert!(fonts.path(1).is_none());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let err = FontFile::from_bytes("bad.ttf", b"not a font".to_vec()).unwrap_err();
        assert!(matches!(err, Error::Font(_)));
        let err = FontFile::from_bytes("empty.ttf", Vec::new()).unwrap_err();
        assert!(format!("{}", err).contains("empty"));
    }
}
