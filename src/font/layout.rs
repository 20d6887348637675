//! Per-font layout data
//!
//! BMFont-style JSON: glyph placement in the atlas plus the metadata
//! shared by all glyphs of the font.

use crate::config::FieldType;
use serde::{Deserialize, Serialize};

/// Glyph positions, metrics and texture metadata for one font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontLayoutData {
    /// Texture file names, indexed by `GlyphEntry::page`
    pub pages: Vec<String>,
    pub chars: Vec<GlyphEntry>,
    pub info: FontInfo,
    pub common: CommonInfo,
    pub distance_field: DistanceFieldInfo,
    pub kernings: Vec<KerningPair>,
}

impl FontLayoutData {
    /// Glyph entry for a codepoint
    pub fn glyph(&self, ch: char) -> Option<&GlyphEntry> {
        self.chars.iter().find(|g| g.id == ch as u32)
    }

    /// Codepoints with a glyph entry
    pub fn codepoints(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().filter_map(|g| char::from_u32(g.id))
    }
}

/// One glyph cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphEntry {
    /// Codepoint
    pub id: u32,
    /// Glyph index in the font
    pub index: u16,
    #[serde(rename = "char")]
    pub character: String,
    /// Cell size in pixels (0 for blank glyphs)
    pub width: u32,
    pub height: u32,
    pub xoffset: f32,
    pub yoffset: f32,
    pub xadvance: f32,
    /// Channel mask
    pub chnl: u32,
    /// Cell origin in the atlas
    pub x: u32,
    pub y: u32,
    pub page: u32,
}

impl GlyphEntry {
    /// Has pixels in the atlas
    pub fn is_packed(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Font-level information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontInfo {
    pub face: String,
    pub size: f32,
    pub bold: u32,
    pub italic: u32,
    pub charset: Vec<String>,
    pub unicode: u32,
    pub stretch_h: u32,
    pub smooth: u32,
    pub aa: u32,
    /// up, right, down, left
    pub padding: [u32; 4],
    /// horizontal, vertical
    pub spacing: [u32; 2],
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rtl: bool,
}

/// Texture-wide metadata; `scale_w`/`scale_h` are rewritten after cropping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonInfo {
    pub line_height: f32,
    pub base: f32,
    pub scale_w: u32,
    pub scale_h: u32,
    pub pages: u32,
    pub packed: u32,
    pub alpha_chnl: u32,
    pub red_chnl: u32,
    pub green_chnl: u32,
    pub blue_chnl: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceFieldInfo {
    pub field_type: FieldType,
    pub distance_range: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KerningPair {
    pub first: u32,
    pub second: u32,
    pub amount: f32,
}

/// Round to `decimals` places; `None` keeps full precision
pub fn round_metric(value: f32, decimals: Option<u32>) -> f32 {
    match decimals {
        Some(d) => {
            let factor = 10f64.powi(d.min(9) as i32);
            ((value as f64 * factor).round() / factor) as f32
        }
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_metric() {
        assert_eq!(round_metric(1.23456, Some(2)), 1.23);
        assert_eq!(round_metric(1.5, Some(0)), 2.0);
        assert_eq!(round_metric(1.23456, None), 1.23456);
    }

    #[test]
    fn test_serialized_field_names() {
        let common = CommonInfo {
            line_height: 48.0,
            base: 38.0,
            scale_w: 512,
            scale_h: 256,
            pages: 1,
            packed: 0,
            alpha_chnl: 0,
            red_chnl: 0,
            green_chnl: 0,
            blue_chnl: 0,
        };
        let json = serde_json::to_value(&common).unwrap();
        assert_eq!(json["scaleW"], 512);
        assert_eq!(json["lineHeight"], 48.0);

        let glyph = GlyphEntry {
            id: 65,
            index: 36,
            character: "A".to_string(),
            width: 30,
            height: 34,
            xoffset: -2.0,
            yoffset: 6.0,
            xadvance: 27.5,
            chnl: 15,
            x: 0,
            y: 0,
            page: 0,
        };
        let json = serde_json::to_value(&glyph).unwrap();
        assert_eq!(json["char"], "A");
        assert!(glyph.is_packed());
    }
}
