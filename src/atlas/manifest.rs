//! Atlas manifest
//!
//! Maps `name_weight` keys to each font's layout data. A key seen twice
//! keeps the later font.

use crate::atlas::packer::PackedFont;
use crate::font::FontLayoutData;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `name_weight` → layout data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AtlasManifest {
    fonts: BTreeMap<String, FontLayoutData>,
}

impl AtlasManifest {
    /// Merge packed fonts in packing order (last write wins)
    pub fn merge(packed: impl IntoIterator<Item = PackedFont>) -> Self {
        let mut fonts = BTreeMap::new();
        for font in packed {
            if fonts.insert(font.key.clone(), font.layout).is_some() {
                warn!(
                    "Duplicate manifest key {}: {} replaces the earlier font",
                    font.key,
                    font.font.source_path.display()
                );
            }
        }
        Self { fonts }
    }

    pub fn get(&self, key: &str) -> Option<&FontLayoutData> {
        self.fonts.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Pretty JSON, tab-indented
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }

    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldType;
    use crate::font::{CommonInfo, DistanceFieldInfo, FontDescriptor, FontInfo, FontWeight};
    use std::path::PathBuf;

    fn packed(name: &str, weight: FontWeight, line_height: f32) -> PackedFont {
        let font = FontDescriptor {
            name: name.to_string(),
            weight,
            source_path: PathBuf::from(format!("{}.ttf", name)),
        };
        PackedFont {
            key: font.key(),
            font,
            layout: FontLayoutData {
                pages: vec![],
                chars: vec![],
                info: FontInfo {
                    face: name.to_string(),
                    size: 42.0,
                    bold: 0,
                    italic: 0,
                    charset: vec![],
                    unicode: 1,
                    stretch_h: 100,
                    smooth: 1,
                    aa: 1,
                    padding: [0; 4],
                    spacing: [0; 2],
                    rtl: false,
                },
                common: CommonInfo {
                    line_height,
                    base: 0.0,
                    scale_w: 1,
                    scale_h: 1,
                    pages: 1,
                    packed: 0,
                    alpha_chnl: 0,
                    red_chnl: 0,
                    green_chnl: 0,
                    blue_chnl: 0,
                },
                distance_field: DistanceFieldInfo {
                    field_type: FieldType::Sdf,
                    distance_range: 4,
                },
                kernings: vec![],
            },
        }
    }

    #[test]
    fn test_merge_keys() {
        let manifest = AtlasManifest::merge(vec![
            packed("Roboto", FontWeight::Bold, 1.0),
            packed("Inter", FontWeight::Regular, 2.0),
        ]);
        assert_eq!(manifest.keys().collect::<Vec<_>>(), vec!["inter_regular", "roboto_bold"]);
    }

    #[test]
    fn test_last_write_wins() {
        let manifest = AtlasManifest::merge(vec![
            packed("Roboto", FontWeight::Bold, 1.0),
            packed("ROBOTO", FontWeight::Bold, 2.0),
        ]);
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.get("roboto_bold").unwrap().common.line_height, 2.0);
    }

    #[test]
    fn test_json_is_tab_indented() {
        let manifest = AtlasManifest::merge(vec![packed("Roboto", FontWeight::Bold, 1.0)]);
        let json = String::from_utf8(manifest.to_json().unwrap()).unwrap();
        assert!(json.starts_with("{\n\t\"roboto_bold\": {"));
        assert_eq!(AtlasManifest::from_json(json.as_bytes()).unwrap(), manifest);
    }
}
