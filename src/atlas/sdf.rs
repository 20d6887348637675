//! Built-in distance-field generator
//!
//! Rasterizes glyphs with fontdue and packs the cells with a shelf packer.
//! Single-channel distance comes from the coverage bitmap; msdf, mtsdf and
//! psdf also read the glyph outline through ttf-parser.

use crate::atlas::field::{glyph_cell, needs_outline, CellGeometry};
use crate::atlas::generator::{
    FieldGenerator, GenerateRequest, GeneratedFont, PackingSettings, PackingState, Texture,
};
use crate::atlas::shelf::ShelfPacker;
use crate::config::AtlasConfig;
use crate::constants::{CHANNEL_ALL, STRETCH_H};
use crate::error::{FontError, GenerateError};
use crate::font::layout::round_metric;
use crate::font::{
    CommonInfo, DistanceFieldInfo, FontInfo, FontLayoutData, FontdueParser, GlyphEntry,
    KerningPair,
};
use crate::texture::read_texture;
use fontdue::Font;
use image::{imageops, RgbaImage};
use log::{debug, info, trace};
use ttf_parser::Face;

/// Generator backed by fontdue rasterization
#[derive(Debug, Default, Clone, Copy)]
pub struct SdfGenerator;

impl FieldGenerator for SdfGenerator {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<GeneratedFont, GenerateError> {
        let config = request.config;
        if request.charset.is_empty() {
            return Err(GenerateError::EmptyCharset);
        }

        let path = &request.font.source_path;
        let data = FontdueParser::read(path)?;
        let font = FontdueParser::parse(&data, path, config.font_size)?;
        let face = if needs_outline(config.field_type) {
            let face = Face::parse(&data, 0).map_err(|e| FontError::Parse {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            Some(face)
        } else {
            None
        };

        let (width, height) = config.texture_size;
        let (mut pages, mut packer) = match request.reuse {
            Some(state) => resume(state, config)?,
            None => (
                vec![RgbaImage::new(width, height)],
                ShelfPacker::new(width, height, config.texture_padding, config.border),
            ),
        };

        let pad = (config.distance_range as f32 / 2.0).ceil() as u32;
        let size = config.font_size;
        let units_scale = face
            .as_ref()
            .map(|f| size as f64 / f.units_per_em().max(1) as f64)
            .unwrap_or(1.0);

        let line = font.horizontal_line_metrics(size);
        let ascent = line.map(|m| m.ascent).unwrap_or(size);
        let line_height = line.map(|m| m.new_line_size).unwrap_or(size);

        let mut chars = Vec::with_capacity(request.charset.len());
        let mut overflowed = false;

        for &ch in request.charset {
            let index = font.lookup_glyph_index(ch);
            if index == 0 {
                debug!("{}: no glyph for U+{:04X}", request.font.key(), ch as u32);
                continue;
            }

            let (metrics, bitmap) = font.rasterize_indexed(index, size);
            let mut entry = GlyphEntry {
                id: ch as u32,
                index,
                character: ch.to_string(),
                width: 0,
                height: 0,
                xoffset: round_metric(metrics.xmin as f32, config.round_decimal),
                yoffset: round_metric(
                    ascent - (metrics.ymin as f32 + metrics.height as f32),
                    config.round_decimal,
                ),
                xadvance: round_metric(metrics.advance_width, config.round_decimal),
                chnl: CHANNEL_ALL,
                x: 0,
                y: 0,
                page: 0,
            };

            if metrics.width > 0 && metrics.height > 0 {
                let geometry = CellGeometry {
                    bitmap_width: metrics.width,
                    bitmap_height: metrics.height,
                    pad,
                    xmin: metrics.xmin,
                    ymin: metrics.ymin,
                    scale: units_scale,
                };
                let (cell_w, cell_h) = (geometry.width(), geometry.height());

                let Some(placement) = packer.place(cell_w, cell_h) else {
                    // Larger than an empty page: report as a second page
                    pages.push(RgbaImage::new(width, height));
                    overflowed = true;
                    break;
                };
                while pages.len() <= placement.page as usize {
                    pages.push(RgbaImage::new(width, height));
                }

                let cell = glyph_cell(
                    config.field_type,
                    face.as_ref(),
                    index,
                    &bitmap,
                    &geometry,
                    config.distance_range,
                )?;
                imageops::replace(
                    &mut pages[placement.page as usize],
                    &cell,
                    placement.x as i64,
                    placement.y as i64,
                );

                entry.width = cell_w;
                entry.height = cell_h;
                entry.x = placement.x;
                entry.y = placement.y;
                entry.page = placement.page;
                entry.xoffset = round_metric(
                    metrics.xmin as f32 - pad as f32,
                    config.round_decimal,
                );
                entry.yoffset = round_metric(
                    ascent - (metrics.ymin as f32 + metrics.height as f32) - pad as f32,
                    config.round_decimal,
                );
            }

            trace!("{} U+{:04X} -> {:?}", request.font.key(), ch as u32, (entry.x, entry.y));
            chars.push(entry);
        }

        if overflowed || pages.len() > 1 {
            debug!("{}: charset spilled onto {} pages", request.font.key(), pages.len());
        }

        let kernings = kerning_pairs(&font, &chars, size, config.round_decimal);
        let textures = texture_pages(&config.file_name, pages);
        let page_names = textures
            .iter()
            .map(|t| format!("{}.png", t.filename))
            .collect::<Vec<_>>();

        info!(
            "{}: {} glyphs, {} kerning pairs",
            request.font.key(),
            chars.len(),
            kernings.len()
        );

        let layout = FontLayoutData {
            pages: page_names,
            info: font_info(request, pad),
            common: CommonInfo {
                line_height: round_metric(line_height, config.round_decimal),
                base: round_metric(ascent, config.round_decimal),
                scale_w: width,
                scale_h: height,
                pages: textures.len() as u32,
                packed: 0,
                alpha_chnl: 0,
                red_chnl: 0,
                green_chnl: 0,
                blue_chnl: 0,
            },
            distance_field: DistanceFieldInfo {
                field_type: config.field_type,
                distance_range: config.distance_range,
            },
            chars,
            kernings,
        };

        let settings = PackingSettings {
            texture: format!("{}.png", config.file_name),
            texture_size: [width, height],
            field_type: config.field_type,
            font_size: config.font_size,
            distance_range: config.distance_range,
            texture_padding: config.texture_padding,
            border: config.border,
            cursor: packer.cursor(),
        };

        Ok(GeneratedFont {
            textures,
            layout,
            settings,
        })
    }
}

/// Reload the previous page and cursor from a snapshot
fn resume(
    state: &PackingState,
    config: &AtlasConfig,
) -> Result<(Vec<RgbaImage>, ShelfPacker), GenerateError> {
    let path = state.settings_path();
    let content = std::fs::read_to_string(path).map_err(|source| GenerateError::StateRead {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: PackingSettings =
        serde_json::from_str(&content).map_err(|source| GenerateError::StateParse {
            path: path.to_path_buf(),
            source,
        })?;

    let (width, height) = config.texture_size;
    let incompatible = |reason: String| GenerateError::IncompatibleState {
        path: path.to_path_buf(),
        reason,
    };
    if settings.texture_size != [width, height] {
        return Err(incompatible(format!(
            "texture size {:?} differs from {}x{}",
            settings.texture_size, width, height
        )));
    }
    if settings.field_type != config.field_type {
        return Err(incompatible(format!(
            "field type {} differs from {}",
            settings.field_type, config.field_type
        )));
    }

    let page = read_texture(&state.texture_path(&settings))?;
    if page.dimensions() != (width, height) {
        return Err(incompatible(format!(
            "texture is {}x{}, expected {}x{}",
            page.width(),
            page.height(),
            width,
            height
        )));
    }

    debug!(
        "Resuming packing at ({}, {}) from {}",
        settings.cursor.x,
        settings.cursor.y,
        path.display()
    );

    let packer = ShelfPacker::resume(
        width,
        height,
        config.texture_padding,
        config.border,
        settings.cursor,
    );
    Ok((vec![page], packer))
}

/// Name pages `{file}`, `{file}.1`, `{file}.2`, ...
fn texture_pages(file_name: &str, pages: Vec<RgbaImage>) -> Vec<Texture> {
    pages
        .into_iter()
        .enumerate()
        .map(|(i, image)| Texture {
            filename: if i == 0 {
                file_name.to_string()
            } else {
                format!("{}.{}", file_name, i)
            },
            image,
        })
        .collect()
}

fn font_info(request: &GenerateRequest<'_>, pad: u32) -> FontInfo {
    let config = request.config;
    FontInfo {
        face: request.font.name.clone(),
        size: config.font_size,
        bold: 0,
        italic: 0,
        charset: request.charset.iter().map(|c| c.to_string()).collect(),
        unicode: 1,
        stretch_h: STRETCH_H,
        smooth: 1,
        aa: 1,
        padding: [pad; 4],
        spacing: [config.texture_padding; 2],
        rtl: config.rtl,
    }
}

/// Non-zero kerning between every pair of packed characters
fn kerning_pairs(
    font: &Font,
    chars: &[GlyphEntry],
    size: f32,
    decimals: Option<u32>,
) -> Vec<KerningPair> {
    let codepoints: Vec<char> = chars.iter().filter_map(|g| char::from_u32(g.id)).collect();
    let mut pairs = Vec::new();
    for &first in &codepoints {
        for &second in &codepoints {
            if let Some(amount) = font.horizontal_kern(first, second, size) {
                let amount = round_metric(amount, decimals);
                if amount != 0.0 {
                    pairs.push(KerningPair {
                        first: first as u32,
                        second: second as u32,
                        amount,
                    });
                }
            }
        }
    }
    pairs
}
