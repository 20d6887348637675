//! Distance-field generator interface
//!
//! A generator rasterizes one font's charset into texture pages plus
//! layout data. Packing continues from a previous font only through a
//! settings snapshot on disk, referenced by `PackingState`.

use crate::atlas::shelf::ShelfCursor;
use crate::config::{AtlasConfig, FieldType};
use crate::error::GenerateError;
use crate::font::{Charset, FontDescriptor, FontLayoutData};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Continuation token: path of the settings snapshot written after the
/// previous font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingState {
    settings_path: PathBuf,
}

impl PackingState {
    /// Refer to a snapshot that has already been written to disk
    pub fn from_settings(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Texture referenced by a snapshot (relative to the snapshot)
    pub fn texture_path(&self, settings: &PackingSettings) -> PathBuf {
        match self.settings_path.parent() {
            Some(dir) => dir.join(&settings.texture),
            None => PathBuf::from(&settings.texture),
        }
    }
}

/// Settings snapshot persisted between fonts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingSettings {
    /// Texture file name, relative to the snapshot
    pub texture: String,
    pub texture_size: [u32; 2],
    pub field_type: FieldType,
    pub font_size: f32,
    pub distance_range: u32,
    pub texture_padding: u32,
    pub border: u32,
    pub cursor: ShelfCursor,
}

/// One texture page
#[derive(Debug, Clone)]
pub struct Texture {
    /// File stem, without extension
    pub filename: String,
    pub image: RgbaImage,
}

/// Generator output for one font
#[derive(Debug, Clone)]
pub struct GeneratedFont {
    pub textures: Vec<Texture>,
    pub layout: FontLayoutData,
    pub settings: PackingSettings,
}

/// Input of one generator call
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub font: &'a FontDescriptor,
    pub charset: &'a Charset,
    pub config: &'a AtlasConfig,
    /// Snapshot of the previous font, absent for the first one
    pub reuse: Option<&'a PackingState>,
}

/// Distance-field rasterizer and packer
pub trait FieldGenerator {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<GeneratedFont, GenerateError>;
}

/// Single-page generator result
#[derive(Debug, Clone)]
pub struct PackedPage {
    pub texture: Texture,
    pub layout: FontLayoutData,
    pub settings: PackingSettings,
}

/// Run the generator and enforce the single-atlas contract
///
/// More than one texture means the configured size cannot hold the
/// combined charset; that is reported as `GenerateError::Overflow`.
pub fn generate_page(
    generator: &dyn FieldGenerator,
    request: &GenerateRequest<'_>,
) -> Result<PackedPage, GenerateError> {
    let GeneratedFont {
        mut textures,
        layout,
        settings,
    } = generator.generate(request)?;

    let (width, height) = request.config.texture_size;
    if textures.is_empty() {
        return Err(GenerateError::NoTexture);
    }
    if textures.len() > 1 {
        return Err(GenerateError::Overflow {
            textures: textures.len(),
            width,
            height,
        });
    }

    let texture = textures.remove(0);
    Ok(PackedPage {
        texture,
        layout,
        settings,
    })
}
