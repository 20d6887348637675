//! Incremental atlas packing
//!
//! Fonts are packed strictly in order into one shared texture. After each
//! font the texture and its settings snapshot are staged, then renamed over
//! the previous font's pair; the next font resumes from that snapshot. A
//! font that fails is skipped, overflow stops the build.

use crate::atlas::generator::{
    generate_page, FieldGenerator, GenerateRequest, PackedPage, PackingState,
};
use crate::config::AtlasConfig;
use crate::constants::{SETTINGS_EXTENSION, STAGING_SUFFIX, TEXTURE_EXTENSION};
use crate::error::{AtlasError, FontProcessingError, GenerateError, TextureError};
use crate::font::{CharsetResolver, FontDescriptor, FontLayoutData, FontParser};
use crate::texture::write_texture;
use crate::utils::{remove_if_exists, write_durable};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

/// Layout of a font that made it into the atlas
#[derive(Debug, Clone)]
pub struct PackedFont {
    /// `name_weight`, lowercase
    pub key: String,
    pub font: FontDescriptor,
    pub layout: FontLayoutData,
}

/// A font dropped from the atlas, with the reason
#[derive(Debug)]
pub struct SkippedFont {
    pub key: String,
    pub font: FontDescriptor,
    pub error: FontProcessingError,
}

/// Intermediate files written while packing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackArtifacts {
    /// Texture after the last packed font
    pub texture_path: PathBuf,
    /// Settings snapshot after the last packed font
    pub settings_path: PathBuf,
}

/// Result of packing every font
#[derive(Debug, Default)]
pub struct PackResult {
    /// In packing order
    pub packed: Vec<PackedFont>,
    pub skipped: Vec<SkippedFont>,
    /// None when no font was packed
    pub artifacts: Option<PackArtifacts>,
    /// Every intermediate file written, for cleanup
    pub written: Vec<PathBuf>,
}

impl PackResult {
    fn record(&mut self, artifacts: &PackArtifacts) {
        for path in [&artifacts.texture_path, &artifacts.settings_path] {
            if !self.written.contains(path) {
                self.written.push(path.clone());
            }
        }
    }
}

/// Sequential packer over one generator
pub struct IncrementalPacker<'a> {
    generator: &'a dyn FieldGenerator,
    parser: &'a dyn FontParser,
    config: &'a AtlasConfig,
}

impl<'a> IncrementalPacker<'a> {
    pub fn new(
        generator: &'a dyn FieldGenerator,
        parser: &'a dyn FontParser,
        config: &'a AtlasConfig,
    ) -> Self {
        Self {
            generator,
            parser,
            config,
        }
    }

    /// Pack all fonts into one texture
    ///
    /// On overflow the intermediate files written so far are removed.
    pub fn pack_all(&self, fonts: &[FontDescriptor]) -> Result<PackResult, AtlasError> {
        let resolver = CharsetResolver::new(self.parser, self.config.charset.as_ref());
        let mut result = PackResult::default();
        let mut state: Option<PackingState> = None;

        for (i, font) in fonts.iter().enumerate() {
            let key = font.key();
            info!(
                "Packing font {}/{}: {} ({})",
                i + 1,
                fonts.len(),
                key,
                font.source_path.display()
            );

            match self.pack_one(font, &resolver, state.as_ref()) {
                Ok((layout, artifacts)) => {
                    result.record(&artifacts);
                    state = Some(PackingState::from_settings(&artifacts.settings_path));
                    result.artifacts = Some(artifacts);
                    result.packed.push(PackedFont {
                        key,
                        font: font.clone(),
                        layout,
                    });
                }
                Err(FontProcessingError::Generate(GenerateError::Overflow {
                    textures,
                    width,
                    height,
                })) => {
                    remove_artifacts(&result.written);
                    return Err(AtlasError::PackingOverflow {
                        font: key,
                        textures,
                        width,
                        height,
                    });
                }
                Err(e) => {
                    error!("Skipping font {}: {}", key, e);
                    result.skipped.push(SkippedFont {
                        key,
                        font: font.clone(),
                        error: e,
                    });
                }
            }
        }

        Ok(result)
    }

    fn pack_one(
        &self,
        font: &FontDescriptor,
        resolver: &CharsetResolver<'_>,
        reuse: Option<&PackingState>,
    ) -> Result<(FontLayoutData, PackArtifacts), FontProcessingError> {
        let charset = resolver.resolve(font)?;

        let request = GenerateRequest {
            font,
            charset: &charset,
            config: self.config,
            reuse,
        };
        let page = generate_page(self.generator, &request)?;

        let texture_path = self
            .config
            .artifact_path(&page.texture.filename, TEXTURE_EXTENSION);
        let settings_path = self
            .config
            .artifact_path(&page.texture.filename, SETTINGS_EXTENSION);
        let staged = PackArtifacts {
            texture_path: staging_path(&texture_path),
            settings_path: staging_path(&settings_path),
        };

        // The previous font's pair stays in place until both writes succeed
        let committed = PackArtifacts {
            texture_path,
            settings_path,
        };
        if let Err(e) = stage(&staged, &page).and_then(|()| commit(&staged, &committed)) {
            remove_artifacts(&[staged.texture_path, staged.settings_path]);
            return Err(e);
        }

        let cursor = page.settings.cursor;
        info!(
            "{}: {} glyphs, texture filled to row {} of {}",
            font.key(),
            page.layout.chars.len(),
            cursor.y + cursor.row_height,
            page.settings.texture_size[1]
        );

        Ok((page.layout, committed))
    }
}

/// Write texture and snapshot durably under their staging names
fn stage(staged: &PackArtifacts, page: &PackedPage) -> Result<(), FontProcessingError> {
    write_texture(&staged.texture_path, &page.texture.image)?;

    let snapshot = serde_json::to_vec_pretty(&page.settings).map_err(|e| {
        FontProcessingError::StateWrite {
            path: staged.settings_path.clone(),
            source: e.into(),
        }
    })?;
    write_durable(&staged.settings_path, &snapshot).map_err(|source| {
        FontProcessingError::StateWrite {
            path: staged.settings_path.clone(),
            source,
        }
    })
}

/// Move staged files over the committed names
fn commit(staged: &PackArtifacts, committed: &PackArtifacts) -> Result<(), FontProcessingError> {
    std::fs::rename(&staged.texture_path, &committed.texture_path).map_err(|source| {
        TextureError::Write {
            path: committed.texture_path.clone(),
            source,
        }
    })?;
    std::fs::rename(&staged.settings_path, &committed.settings_path).map_err(|source| {
        FontProcessingError::StateWrite {
            path: committed.settings_path.clone(),
            source,
        }
    })
}

/// `atlas.png` -> `atlas.png.tmp`
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}

/// Remove intermediate files, logging failures
pub fn remove_artifacts(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = remove_if_exists(path) {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
