//! Charset resolution
//!
//! Decides which codepoints get rasterized for a font: either the shared
//! override from the build configuration, or every codepoint the font maps
//! to a glyph.

use crate::error::FontError;
use crate::font::FontDescriptor;
use fontdue::{Font, FontSettings};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Ordered set of codepoints
pub type Charset = BTreeSet<char>;

/// Build a charset from the characters of a string
pub fn charset_from_str(s: &str) -> Charset {
    s.chars().collect()
}

/// Font file → codepoint to glyph index mapping
pub trait FontParser {
    fn glyph_map(&self, path: &Path) -> Result<BTreeMap<char, u16>, FontError>;
}

/// Font parser backed by fontdue
#[derive(Debug, Default, Clone, Copy)]
pub struct FontdueParser;

impl FontdueParser {
    /// Read and parse a font file
    pub fn load(path: &Path, scale: f32) -> Result<Font, FontError> {
        let data = Self::read(path)?;
        Self::parse(&data, path, scale)
    }

    /// Raw font file contents
    pub fn read(path: &Path) -> Result<Vec<u8>, FontError> {
        std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse font data already in memory; `path` is only used in errors
    pub fn parse(data: &[u8], path: &Path, scale: f32) -> Result<Font, FontError> {
        Font::from_bytes(
            data,
            FontSettings {
                scale,
                ..FontSettings::default()
            },
        )
        .map_err(|e| FontError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl FontParser for FontdueParser {
    fn glyph_map(&self, path: &Path) -> Result<BTreeMap<char, u16>, FontError> {
        let font = Self::load(path, FontSettings::default().scale)?;
        // fontdue only lists codepoints with a cmap entry, so unmapped
        // glyphs (ligatures, alternates) never show up here
        Ok(font
            .chars()
            .iter()
            .filter(|(ch, _)| **ch != '\0')
            .map(|(ch, index)| (*ch, index.get()))
            .collect())
    }
}

/// Resolves the charset of each font
pub struct CharsetResolver<'a> {
    parser: &'a dyn FontParser,
    override_charset: Option<&'a Charset>,
}

impl<'a> CharsetResolver<'a> {
    pub fn new(parser: &'a dyn FontParser, override_charset: Option<&'a Charset>) -> Self {
        Self {
            parser,
            override_charset,
        }
    }

    /// Codepoints to rasterize for `font`
    ///
    /// The override is returned unchanged for every font; otherwise the
    /// font's own glyph table decides.
    pub fn resolve(&self, font: &FontDescriptor) -> Result<Charset, FontError> {
        if let Some(charset) = self.override_charset {
            return Ok(charset.clone());
        }

        let map = self.parser.glyph_map(&font.source_path)?;
        debug!(
            "{}: {} mapped codepoints in {}",
            font.key(),
            map.len(),
            font.source_path.display()
        );
        Ok(map.into_keys().collect())
    }
}
